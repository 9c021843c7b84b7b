//! Append-only JSON-lines files.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::StoreError;

/// A file where every record is one JSON document on its own line.
///
/// Each append reopens the path, writes one line and flushes, so a file
/// that disappears or becomes unwritable mid-run fails the next append.
pub struct JsonLinesFile {
    path: PathBuf,
}

impl JsonLinesFile {
    /// Create the file and its directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let file = Self { path };
        file.open_append()?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let meta = fs::metadata(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(meta.len() == 0)
    }

    pub fn append<T: Serialize>(&mut self, record: &T) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.open_append()?;
        file.write_all(&line)
            .and_then(|_| file.flush())
            .map_err(|e| StoreError::io(&self.path, e))
    }

    fn open_append(&self) -> Result<File, StoreError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

/// Write a pretty-printed JSON document, replacing any previous content.
pub fn write_json_file<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), StoreError> {
    let path = path.as_ref();
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
pub(crate) fn read_json_lines<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_append_one_record_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("log.jsonl");

        let mut file = JsonLinesFile::open(&path).unwrap();
        assert!(file.is_empty().unwrap());
        file.append(&json!({"n": 1})).unwrap();
        file.append(&json!({"n": 2})).unwrap();
        assert!(!file.is_empty().unwrap());

        let records: Vec<Value> = read_json_lines(&path);
        assert_eq!(records, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");

        JsonLinesFile::open(&path).unwrap().append(&json!("first")).unwrap();
        JsonLinesFile::open(&path).unwrap().append(&json!("second")).unwrap();

        let records: Vec<Value> = read_json_lines(&path);
        assert_eq!(records, vec![json!("first"), json!("second")]);
    }

    #[test]
    fn test_append_fails_once_path_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");

        let mut file = JsonLinesFile::open(&path).unwrap();
        file.append(&json!(1)).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert!(matches!(file.append(&json!(2)), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_write_json_file_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_json_file(&path, &json!({"run": 1})).unwrap();
        write_json_file(&path, &json!({"run": 2})).unwrap();

        let content: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(content, json!({"run": 2}));
    }
}
