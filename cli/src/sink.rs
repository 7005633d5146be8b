//! Writes downloaded spreadsheets into a local directory.

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use export_manager::workflow::driver::{ArtifactSink, SinkError};

pub struct DirectorySink {
    dir: PathBuf,
    written: Mutex<Vec<PathBuf>>,
}

impl DirectorySink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, written: Mutex::new(Vec::new()) }
    }

    /// Target path for `file_name`. Any directory components in the name are
    /// dropped so a backend-supplied name cannot escape `dir`.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        let base = Path::new(file_name).file_name().unwrap_or(OsStr::new(file_name));
        self.dir.join(base)
    }

    /// Paths written so far, oldest first.
    pub fn written(&self) -> Vec<PathBuf> {
        self.written.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let write_err = |err: std::io::Error| SinkError::Write { file_name: file_name.to_owned(), message: err.to_string() };
        if Path::new(file_name).file_name().is_none() {
            return Err(SinkError::Write { file_name: file_name.to_owned(), message: "not a file name".to_owned() });
        }
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let path = self.path_for(file_name);
        fs::write(&path, bytes).map_err(write_err)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "artifact written");
        self.written.lock().unwrap_or_else(PoisonError::into_inner).push(path);
        Ok(())
    }
}
