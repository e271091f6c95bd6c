//! File-based data source.
//!
//! Polls a JSON file holding an orchestrator response, such as the saved
//! output of `GET /v2/groups?embed=group.groups&embed=group.apps`.

use std::fmt::Debug;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use tracing::warn;

use super::DataSource;

/// A data source that reads snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated. Parsing doubles as schema
/// validation: a file that does not match `T` is reported via `error()`.
#[derive(Debug)]
pub struct FileSource<T> {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T> FileSource<T> {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            _snapshot: PhantomData,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }
}

impl<T: DeserializeOwned> FileSource<T> {
    fn read_file(&mut self) -> Option<T> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|content| {
                serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(snapshot) => {
                self.last_error = None;
                Some(snapshot)
            }
            Err(e) => {
                warn!(source = %self.description, error = %e, "Failed to load snapshot");
                self.last_error = Some(e);
                None
            }
        }
    }
}

impl<T> DataSource<T> for FileSource<T>
where
    T: DeserializeOwned + Debug,
{
    fn poll(&mut self) -> Option<T> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, don't update
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(snapshot) = self.read_file() {
                self.last_modified = current_modified;
                return Some(snapshot);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
