use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EngineError, Result};
use crate::index::Document;

/// A file that could not be turned into a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a corpus directory: what was read and what was not.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedDocument>,
}

/// Load every `*.txt` file directly under `dir`, sorted by file name. The
/// file name is the document id.
pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<LoadReport> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(EngineError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut report = LoadReport::default();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        match entry {
            Ok(e) => {
                let p = e.path();
                if e.file_type().is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
                    files.push(p.to_path_buf());
                }
            }
            Err(err) => report.skipped.push(SkippedDocument {
                path: err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
                reason: err.to_string(),
            }),
        }
    }

    for path in files {
        let Some(name) = path.file_name().and_then(|s| s.to_str()).map(str::to_string) else {
            report.skipped.push(SkippedDocument { path, reason: "file name is not valid UTF-8".into() });
            continue;
        };
        match fs::read(&path) {
            Ok(bytes) => {
                let text = decode_text(&path, bytes);
                report.documents.push(Document { name, text });
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable document");
                report.skipped.push(SkippedDocument { path, reason: err.to_string() });
            }
        }
    }

    tracing::info!(
        loaded = report.documents.len(),
        skipped = report.skipped.len(),
        dir = %dir.display(),
        "loaded corpus"
    );
    Ok(report)
}

/// UTF-8 first, Latin-1 as the fallback. Latin-1 maps every byte to a
/// code point, so decoding itself cannot fail.
fn decode_text(path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), "not valid UTF-8, decoding as Latin-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_txt_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "kedua").unwrap();
        fs::write(dir.path().join("a.txt"), "pertama").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "ignored").unwrap();

        let report = load_directory(dir.path()).unwrap();
        let names: Vec<&str> = report.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn falls_back_to_latin1() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cafe.txt"), b"caf\xe9").unwrap();
        let report = load_directory(dir.path()).unwrap();
        assert_eq!(report.documents[0].text, "caf\u{e9}");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = load_directory("/definitely/not/here").unwrap_err();
        assert!(matches!(err, EngineError::MissingDirectory(_)));
    }
}
