use crate::error::{CumulateError, Result};
use crate::model::ActivityRecord;
use std::path::Path;

/// Tolerant payload parse: source files sometimes wrap the JSON object in
/// export chatter, so everything before the first `{` is discarded before
/// handing the rest to serde. Returns `None` when no object can be parsed.
pub fn parse_record(raw: &str) -> Option<ActivityRecord> {
    let trimmed = raw.trim();
    let start = trimmed.find('{')?;
    serde_json::from_str(&trimmed[start..]).ok()
}

/// Read every `.{extension}` file in `dir` and parse it into an activity
/// record paired with its file name. The extension may be configured with or
/// without a leading dot. Files are taken in sorted name order so a batch
/// run is deterministic regardless of directory enumeration order.
/// Malformed payloads are skipped with a warning, never fatal.
pub fn load_directory(dir: &Path, extension: &str) -> Result<Vec<(String, ActivityRecord)>> {
    if !dir.is_dir() {
        return Err(CumulateError::InputDirNotFound(dir.display().to_string()));
    }
    let extension = extension.strip_prefix('.').unwrap_or(extension);

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == extension) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut records = Vec::with_capacity(names.len());
    for name in names {
        let raw = std::fs::read_to_string(dir.join(&name))?;
        match parse_record(&raw) {
            Some(record) => records.push((name, record)),
            None => tracing::warn!(file = %name, "skipping file with unparsable payload"),
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{"activityinfo": {"activityNo": "1", "activityTitle": "Intro"}}"#;

    #[test]
    fn parses_clean_payload() {
        let record = parse_record(VALID).unwrap();
        assert_eq!(record.activity_info.activity_no, "1");
    }

    #[test]
    fn strips_wrapper_text_before_first_brace() {
        let wrapped = format!("Export generated 2024-01-01\n\n{VALID}");
        let record = parse_record(&wrapped).unwrap();
        assert_eq!(record.activity_info.activity_title, "Intro");
    }

    #[test]
    fn rejects_payload_without_object() {
        assert!(parse_record("no json here").is_none());
        assert!(parse_record("").is_none());
        assert!(parse_record("{truncated").is_none());
    }

    #[test]
    fn loads_matching_files_in_sorted_name_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.json"), VALID).unwrap();
        std::fs::write(dir.path().join("a.json"), VALID).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let records = load_directory(dir.path(), "json").unwrap();
        let names: Vec<&str> = records.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a.json", "b.json"]);
    }

    #[test]
    fn leading_dot_in_configured_extension_still_matches() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.json"), VALID).unwrap();
        let records = load_directory(dir.path(), ".json").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn skips_malformed_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.json"), VALID).unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json at all").unwrap();
        let records = load_directory(dir.path(), "json").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "good.json");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = load_directory(Path::new("/nonexistent/input"), "json").unwrap_err();
        assert!(matches!(err, CumulateError::InputDirNotFound(_)));
    }
}
