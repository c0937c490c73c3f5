//! Append-only NDJSON files (one JSON object per line).

use crate::error::{PromptlabError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Serialize `record` as a single JSON line and append it to `path`.
///
/// The file and its parent directory are created if missing. The write is
/// synced before returning.
pub fn append_json_line<T: Serialize, P: AsRef<Path>>(path: P, record: &T) -> Result<()> {
    let path = path.as_ref();

    let line = serde_json::to_string(record).map_err(|e| {
        PromptlabError::StoreError(format!("failed to serialize record: {}", e))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            PromptlabError::StoreError(format!("failed to open '{}': {}", path.display(), e))
        })?;

    writeln!(file, "{}", line)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            PromptlabError::StoreError(format!("failed to append to '{}': {}", path.display(), e))
        })?;

    Ok(())
}

/// Read every record from an NDJSON file.
///
/// A missing file reads as empty. Blank lines are skipped; any other line
/// that fails to parse is a store error naming the line number.
pub fn read_json_lines<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(PromptlabError::StoreError(format!(
                "failed to read '{}': {}",
                path.display(),
                e
            )));
        }
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                PromptlabError::StoreError(format!(
                    "malformed record at {}:{}: {}",
                    path.display(),
                    idx + 1,
                    e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        n: u32,
        text: String,
    }

    #[test]
    fn test_append_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("versions").join("PROMPT-001.ndjson");

        append_json_line(&path, &Row { n: 1, text: "a\nb".into() }).unwrap();
        append_json_line(&path, &Row { n: 2, text: "c".into() }).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));

        let rows: Vec<Row> = read_json_lines(&path).unwrap();
        assert_eq!(rows[0], Row { n: 1, text: "a\nb".into() });
        assert_eq!(rows[1].n, 2);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<Row> = read_json_lines(temp_dir.path().join("none.ndjson")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.ndjson");
        fs::write(&path, "{\"n\":1,\"text\":\"x\"}\n\n   \n").unwrap();

        let rows: Vec<Row> = read_json_lines(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rows.ndjson");
        fs::write(&path, "{\"n\":1,\"text\":\"x\"}\nnot json\n").unwrap();

        let err = read_json_lines::<Row, _>(&path).unwrap_err();
        assert!(matches!(err, PromptlabError::StoreError(_)));
        assert!(err.to_string().contains(":2:"));
    }
}
