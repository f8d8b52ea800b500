use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while capturing or containerizing voice data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("cannot open {path} (is another program using it, or is the device unplugged?): {reason}")]
    ConnectionFailed { path: String, reason: String },

    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("payload of {len} bytes is not a whole number of {block_align}-byte frames")]
    MisalignedPayload { len: usize, block_align: usize },

    #[error("payload of {0} bytes does not fit in a RIFF container")]
    PayloadTooLarge(usize),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("device I/O error: {0}")]
    DeviceIo(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("invalid WAV header: {0}")]
    InvalidHeader(String),
}

impl CaptureError {
    /// True for the "file not found" condition reported by the converter.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InputNotFound(_))
    }
}
