use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lingualens::config::Config;
use lingualens::languages;
use lingualens::pipeline::output::write_bundle;
use lingualens::pipeline::PipelineOrchestrator;
use lingualens::services::speech::AzureSpeech;
use lingualens::services::translator::AzureTranslator;
use lingualens::validation::validate_image;

/// Extract text from an image, translate it and speak both versions.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Image to read (PNG, JPEG or BMP)
    image: Option<PathBuf>,

    /// Target language display name
    #[arg(short, long, default_value = "Spanish")]
    language: String,

    /// Configuration file (TOML); environment variables override it
    #[arg(short, long, default_value = "lingualens.toml")]
    config: PathBuf,

    /// Directory for the produced artifacts
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Print the supported target languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Print the languages the remote translator supports and exit
    #[arg(long)]
    remote_languages: bool,

    /// Check that the speech service answers and exit
    #[arg(long)]
    verify_speech: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingualens=info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_languages {
        for profile in languages::LANGUAGES {
            println!(
                "{:<10} {:<4} {:<7} {}",
                profile.display_name, profile.translation_code, profile.speech_locale, profile.voice
            );
        }
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .with_env_overrides();

    if cli.remote_languages {
        let translator = AzureTranslator::new(&config.translator)?;
        for (code, name) in translator.available_languages().await? {
            println!("{:<8} {}", code, name);
        }
        return Ok(());
    }

    if cli.verify_speech {
        let speech = AzureSpeech::new(&config.speech)?;
        if !speech.verify().await {
            bail!("speech service verification failed");
        }
        println!("Speech service OK");
        return Ok(());
    }

    let Some(image_path) = cli.image else {
        bail!("no image given (see --help)");
    };
    let image = std::fs::read(&image_path)
        .with_context(|| format!("reading {}", image_path.display()))?;
    let info = validate_image(&image)?;
    tracing::info!("Image {:?} {}x{}", info.format, info.width, info.height);

    let orchestrator = PipelineOrchestrator::from_config(&config)?;
    let bundle = orchestrator.run(&image, &cli.language).await;

    for path in write_bundle(&bundle, &cli.output)? {
        println!("{}", path.display());
    }
    for failure in bundle.failures() {
        eprintln!("[{:?}] {}", failure.stage, failure.reason);
    }

    if bundle.extracted_text().is_none() {
        bail!("no text could be extracted from the image");
    }
    Ok(())
}
