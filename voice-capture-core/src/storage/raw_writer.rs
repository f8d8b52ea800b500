use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::error::CaptureError;

/// Append-only writer for a headerless raw capture file.
///
/// ## File Format
///
/// ```text
/// [chunk 1 bytes][chunk 2 bytes]...
/// ```
///
/// No framing or length prefixes; chunks are concatenated in arrival order.
/// Every chunk is handed to the OS as soon as it arrives so an interrupted
/// session keeps everything received up to that point.
pub struct RawCaptureWriter {
    file_path: PathBuf,
    file: Option<File>,
    total_bytes_written: u64,
}

impl RawCaptureWriter {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            file: None,
            total_bytes_written: 0,
        }
    }

    /// Create (or truncate) the file.
    pub fn open(&mut self) -> Result<(), CaptureError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(&self.file_path)
            .map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;

        self.file = Some(file);
        self.total_bytes_written = 0;
        Ok(())
    }

    /// Append one chunk.
    pub fn write(&mut self, data: &[u8]) -> Result<(), CaptureError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| CaptureError::StorageError("file is not open for writing".into()))?;
        file.write_all(data)
            .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
        self.total_bytes_written += data.len() as u64;
        Ok(())
    }

    /// Flush to disk and release the handle. Returns total bytes written.
    ///
    /// Closing an already-closed writer is a no-op.
    pub fn close(&mut self) -> Result<u64, CaptureError> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| CaptureError::StorageError(e.to_string()))?;
            file.sync_all().map_err(|e| CaptureError::StorageError(e.to_string()))?;
        }
        Ok(self.total_bytes_written)
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.total_bytes_written
    }

    /// Path of the output file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl Drop for RawCaptureWriter {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(e) = self.close() {
                log::error!("Failed to close {}: {}", self.file_path.display(), e);
            }
        }
    }
}
