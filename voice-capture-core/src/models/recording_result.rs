use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::config::PcmFormat;

/// Why a capture loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The operator cancelled the session (Ctrl-C).
    Cancelled,
    /// Cancelled while the link was settling. The raw file was never
    /// opened, so a capture left by an earlier run is untouched.
    CancelledBeforeCapture,
}

/// Running counters for a capture session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub bytes_written: u64,
    /// Number of non-empty reads; one progress marker each.
    pub chunks: u64,
    pub polls: u64,
}

/// Result returned when a capture session ends normally.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub raw_path: PathBuf,
    pub stats: CaptureStats,
    pub elapsed_secs: f64,
    pub stop_reason: StopReason,
}

impl CaptureResult {
    pub fn bytes_written(&self) -> u64 {
        self.stats.bytes_written
    }

    /// Whether `raw_path` was (re)written by this session.
    pub fn raw_file_written(&self) -> bool {
        self.stop_reason != StopReason::CancelledBeforeCapture
    }
}

/// Result returned when a raw capture has been wrapped in a WAV container.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub wav_path: PathBuf,
    pub format: PcmFormat,
    pub payload_bytes: usize,
    /// Whole frames in the payload; a trailing partial frame is not counted.
    pub frame_count: u64,
    pub duration_secs: f64,
    /// SHA-256 hex digest of the complete container file.
    pub checksum: String,
    pub is_aligned: bool,
}

/// Metadata stored alongside a converted recording.
///
/// Serializable for a JSON sidecar next to the WAV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub source_path: String,
    pub file_path: String,
    pub format: PcmFormat,
    pub payload_bytes: usize,
    pub duration_secs: f64,
    pub checksum: String,
}

impl RecordingMetadata {
    pub fn from_conversion(result: &ConversionResult, source_path: &Path) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            source_path: source_path.to_string_lossy().into_owned(),
            file_path: result.wav_path.to_string_lossy().into_owned(),
            format: result.format,
            payload_bytes: result.payload_bytes,
            duration_secs: result.duration_secs,
            checksum: result.checksum.clone(),
        }
    }
}
