//! Scoped location for the highpass-filtered copy

use crate::error::{ProbeError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PREFIX: &str = "loudprobe-";

/// A fresh private directory plus the path of the filtered copy inside it
///
/// The directory and everything in it are removed when this value is
/// dropped, whichever way the probe returns. Removal failures are logged,
/// never reported.
#[derive(Debug)]
pub struct ScratchCopy {
    dir: Option<TempDir>,
    file: PathBuf,
}

impl ScratchCopy {
    /// Create the directory; the copy keeps `source`'s file name so sox
    /// picks the same output format
    pub fn create(source: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir()
            .map_err(ProbeError::TempResource)?;

        let name = source
            .file_name()
            .map_or_else(|| OsString::from("filtered.wav"), ToOwned::to_owned);
        let file = dir.path().join(name);

        tracing::debug!("Created scratch directory {}", dir.path().display());
        Ok(Self {
            dir: Some(dir),
            file,
        })
    }

    /// Where the filtered copy is written
    pub fn path(&self) -> &Path {
        &self.file
    }
}

impl Drop for ScratchCopy {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let location = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!(
                    "Failed to remove scratch directory {}: {}",
                    location.display(),
                    e
                );
            }
        }
    }
}
