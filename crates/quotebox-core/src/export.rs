use crate::{models::Quote, Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default name for exported files
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// JSON import/export for quote collections
///
/// The file format is a bare array of `{ "text": ..., "category": ... }`
/// objects, no envelope and no schema version.
pub struct Exporter;

impl Exporter {
    /// Pretty-printed JSON, two-space indentation
    pub fn to_json(quotes: &[Quote]) -> Result<String> {
        Ok(serde_json::to_string_pretty(quotes)?)
    }

    pub fn export_to_file<P: AsRef<Path>>(quotes: &[Quote], path: P) -> Result<()> {
        let path = path.as_ref();
        let content = Self::to_json(quotes)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;

        debug!("Exported {} quotes to {}", quotes.len(), path.display());
        Ok(())
    }

    /// Parse an import document
    ///
    /// Anything that isn't an array of objects with string `text` and
    /// `category` fields is rejected as a whole.
    pub fn from_json(content: &str) -> Result<Vec<Quote>> {
        serde_json::from_str(content).map_err(|e| Error::MalformedData(e.to_string()))
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_uses_two_space_indent() {
        let json = Exporter::to_json(&[Quote::new("Carpe diem", "Latin")]).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"text\": \"Carpe diem\",\n    \"category\": \"Latin\"\n  }\n]"
        );
    }

    #[test]
    fn test_empty_collection_exports_empty_array() {
        assert_eq!(Exporter::to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_from_json_rejects_malformed_documents() {
        for bad in [
            "{not json",
            r#"{"text": "a", "category": "b"}"#,
            r#"[{"text": "a"}]"#,
            r#"[{"text": 1, "category": "b"}]"#,
        ] {
            assert!(
                matches!(Exporter::from_json(bad), Err(Error::MalformedData(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let quotes =
            Exporter::from_json(r#"[{"text": "a", "category": "b", "author": "c"}]"#).unwrap();
        assert_eq!(quotes, vec![Quote::new("a", "b")]);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        let quotes = vec![Quote::new("a", "b"), Quote::new("a", "b"), Quote::new("c", "d")];

        Exporter::export_to_file(&quotes, &path).unwrap();
        assert_eq!(Exporter::read_file(&path).unwrap(), quotes);
    }
}
