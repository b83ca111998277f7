// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage and retrieval of outcome records across runs.

use crate::{errors::PersistenceError, record::OutcomeRecord};
use camino::{Utf8Path, Utf8PathBuf};
use std::{
    fs,
    io::{self, BufWriter, Write},
};

/// The default file name of the result store.
pub const DEFAULT_STORE_FILE_NAME: &str = "test-result.json";

/// Manages persistence of outcome records, stored as a JSON array in a single
/// file.
#[derive(Clone, Debug)]
pub struct ResultStore {
    /// Path to the store file.
    path: Utf8PathBuf,

    /// Whether to pretty-print the JSON on save.
    pretty: bool,
}

impl ResultStore {
    /// Creates a new result store backed by the given file.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    /// Sets whether the store is written as pretty-printed JSON. Defaults to
    /// compact output.
    pub fn set_pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Loads the records from disk.
    ///
    /// Returns `Ok(None)` if the store does not exist yet.
    pub fn load(&self) -> Result<Option<Vec<OutcomeRecord>>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    error,
                });
            }
        };

        let mut deserializer = serde_json::Deserializer::from_str(&contents);
        let records: Vec<OutcomeRecord> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| PersistenceError::Parse {
                path: self.path.clone(),
                error,
            })?;
        deserializer
            .end()
            .map_err(|error| PersistenceError::TrailingData {
                path: self.path.clone(),
                error,
            })?;

        tracing::debug!(path = %self.path, count = records.len(), "loaded result store");
        Ok(Some(records))
    }

    /// Saves the records to disk, replacing any existing content.
    ///
    /// The write is atomic: either the full new content lands, or the old
    /// content remains.
    pub fn save(&self, records: &[OutcomeRecord]) -> Result<(), PersistenceError> {
        // Ensure the parent directory exists
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| PersistenceError::CreateDir {
                path: parent.to_owned(),
                error,
            })?;
        }

        let pretty = self.pretty;
        atomicwrites::AtomicFile::new(&self.path, atomicwrites::AllowOverwrite)
            .write(|file| {
                let mut writer = BufWriter::new(file);
                if pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writer.flush()
            })
            .map_err(|error| PersistenceError::Write {
                path: self.path.clone(),
                error,
            })?;

        tracing::debug!(path = %self.path, count = records.len(), "saved result store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Label, RecordStatus};
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;

    fn record(name: &str, status: RecordStatus) -> OutcomeRecord {
        OutcomeRecord {
            id: format!("id-{name}"),
            class_name: name.to_owned(),
            method_name: name.to_owned(),
            display_name: name.to_owned(),
            labels: vec![Label::tag(Some("R-001".to_owned()))],
            start_time: 10,
            end_time: 20,
            status,
            environment: "Desktop Chrome".to_owned(),
        }
    }

    #[test]
    fn test_store_lifecycle() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let store = ResultStore::new(temp_dir.path().join("nested/dir/test-result.json"));

        // Initially, there should be no store
        assert!(store.load().unwrap().is_none());

        let records = vec![
            record("Suite testA", RecordStatus::Successful),
            record("Suite testB", RecordStatus::Failed),
        ];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), Some(records.clone()));

        // Saving again replaces the content.
        store.save(&records[1..]).unwrap();
        assert_eq!(store.load().unwrap(), Some(records[1..].to_vec()));
    }

    #[test]
    fn compact_and_pretty_output() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_STORE_FILE_NAME);
        let records = vec![record("Suite testA", RecordStatus::Successful)];

        let mut store = ResultStore::new(&path);
        store.save(&records).unwrap();
        let compact = fs::read_to_string(&path).unwrap();
        assert!(compact.starts_with(r#"[{"id":"id-Suite testA","className":"Suite testA""#));
        assert!(!compact.contains('\n'));

        store.set_pretty(true).save(&records).unwrap();
        let pretty = fs::read_to_string(&path).unwrap();
        assert!(pretty.starts_with("[\n  {\n    \"id\": \"id-Suite testA\""));
        assert_eq!(store.load().unwrap(), Some(records));
    }

    #[test]
    fn empty_array_is_an_empty_store() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_STORE_FILE_NAME);
        fs::write(&path, "[]").unwrap();

        assert_eq!(ResultStore::new(&path).load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn parse_error_names_path() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_STORE_FILE_NAME);
        fs::write(
            &path,
            r#"[{"id":"a","className":"n","methodName":"n","displayName":"n","labels":[],"startTime":"soon","endTime":0,"status":"FAILED","environment":"e"}]"#,
        )
        .unwrap();

        let error = ResultStore::new(&path).load().unwrap_err();
        let PersistenceError::Parse { path: err_path, error } = error else {
            panic!("expected parse error, found {error:?}");
        };
        assert_eq!(err_path, path);
        assert_eq!(error.path().to_string(), "[0].startTime");
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let temp_dir = Utf8TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_STORE_FILE_NAME);
        fs::write(&path, "[] []").unwrap();

        let error = ResultStore::new(&path).load().unwrap_err();
        assert!(
            matches!(error, PersistenceError::TrailingData { .. }),
            "{error:?}"
        );
    }

    #[test]
    fn failed_write_keeps_previous_content() {
        let temp_dir = Utf8TempDir::new().unwrap();
        // The store's parent is a regular file, so neither the directory nor
        // the temporary file can be created.
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = ResultStore::new(blocker.join(DEFAULT_STORE_FILE_NAME));
        let error = store
            .save(&[record("Suite testA", RecordStatus::Successful)])
            .unwrap_err();
        assert!(
            matches!(error, PersistenceError::CreateDir { .. }),
            "{error:?}"
        );
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }
}
