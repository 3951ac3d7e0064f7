use lingualens::artifact::{AudioBytes, Text};
use lingualens::error::{ExtractionError, TranslationError};
use lingualens::pipeline::output::write_bundle;
use lingualens::pipeline::{ArtifactBundle, StageFailure, TranslationOutcome};
use tempfile::tempdir;

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_complete_bundle_writes_every_artifact() {
    let dir = tempdir().unwrap();
    let bundle = ArtifactBundle::assemble(
        Text::new("Hello", "en").unwrap(),
        Ok(AudioBytes::new(b"RIFFsource".to_vec(), "en-US")),
        TranslationOutcome::Translated {
            text: Text::new("Hola", "es").unwrap(),
            audio: Ok(AudioBytes::new(b"RIFFtarget".to_vec(), "es-ES")),
        },
    );

    let written = write_bundle(&bundle, dir.path()).unwrap();

    assert_eq!(
        file_names(&written),
        vec![
            "original_text.txt",
            "original_audio.wav",
            "translated_text_es.txt",
            "translated_audio_es.wav",
            "report.json",
        ]
    );
    let translated = std::fs::read_to_string(dir.path().join("translated_text_es.txt")).unwrap();
    assert_eq!(translated, "Hola");
    let audio = std::fs::read(dir.path().join("original_audio.wav")).unwrap();
    assert_eq!(audio, b"RIFFsource");
}

#[test]
fn test_partial_bundle_skips_missing_artifacts() {
    let dir = tempdir().unwrap();
    let failure = StageFailure::translation(&TranslationError::Transport {
        status: Some(503),
        body: "Service Unavailable".to_string(),
    });
    let bundle = ArtifactBundle::assemble(
        Text::new("Hello", "en").unwrap(),
        Ok(AudioBytes::new(b"RIFF".to_vec(), "en-US")),
        TranslationOutcome::Failed(failure),
    );

    let written = write_bundle(&bundle, dir.path()).unwrap();

    assert_eq!(
        file_names(&written),
        vec!["original_text.txt", "original_audio.wav", "report.json"]
    );
    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["extracted_text"], "Hello");
    assert_eq!(report["original_audio_bytes"], 4);
    assert!(report["translated_text"].is_null());
    assert_eq!(report["failures"][0]["stage"], "translation");
    assert_eq!(report["failures"][0]["kind"], "TranslationTransportError");
}

#[test]
fn test_extraction_failure_writes_report_only() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("nested").join("out");
    let bundle =
        ArtifactBundle::extraction_failed(StageFailure::extraction(&ExtractionError::NoTextFound));

    let written = write_bundle(&bundle, &target).unwrap();

    assert_eq!(file_names(&written), vec!["report.json"]);
    assert!(target.join("report.json").exists());
}
