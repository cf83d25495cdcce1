use super::{EXTENSION, PlaybookStore};
use crate::error::StoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A store backed by one `.json` file per playbook in a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

fn io_error(name: &str, e: std::io::Error) -> StoreError {
    StoreError::Io {
        name: name.to_string(),
        message: e.to_string(),
    }
}

impl FileStore {
    /// The directory is created on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl PlaybookStore for FileStore {
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(dir = %self.dir.display(), error = %e, "cannot read playbook directory");
                }
                return Ok(Vec::new());
            }
        };

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(EXTENSION))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn write(&mut self, key: &str, json: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        // Write beside the target, then swap it in.
        let target = self.path(key);
        let tmp = self.path(&format!(".{}.tmp", key));
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(key, e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(key, e));
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
