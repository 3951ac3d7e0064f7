use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::bundle::ArtifactBundle;

/// Writes every present artifact into `dir`, plus `report.json`.
/// Returns the written paths in write order.
pub fn write_bundle(bundle: &ArtifactBundle, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if let Some(text) = bundle.extracted_text() {
        written.push(write_file(dir, "original_text.txt", text.as_str().as_bytes())?);
    }
    if let Some(audio) = bundle.original_audio() {
        written.push(write_file(dir, "original_audio.wav", audio.as_bytes())?);
    }
    if let Some(text) = bundle.translated_text() {
        let name = format!("translated_text_{}.txt", text.language());
        written.push(write_file(dir, &name, text.as_str().as_bytes())?);

        if let Some(audio) = bundle.translated_audio() {
            let name = format!("translated_audio_{}.wav", text.language());
            written.push(write_file(dir, &name, audio.as_bytes())?);
        }
    }

    let report = serde_json::to_vec_pretty(&bundle.report())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    written.push(write_file(dir, "report.json", &report)?);

    Ok(written)
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    info!("Saved {}", path.display());
    Ok(path)
}
