//! JSON sidecar written next to a converted recording.
//!
//! `voice_record.wav` gets `voice_record.metadata.json` beside it. The
//! sidecar carries the SHA-256 of the container, so a WAV that was
//! rewritten after the sidecar can be told apart with [`is_current`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::models::recording_result::RecordingMetadata;
use crate::storage::container_writer::hex_encode;

const SIDECAR_EXTENSION: &str = "metadata.json";

/// Sidecar path for a recording: `voice_record.wav` → `voice_record.metadata.json`.
pub fn metadata_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension(SIDECAR_EXTENSION)
}

/// Write the sidecar for `recording_path` and return where it went.
pub fn write_metadata(metadata: &RecordingMetadata, recording_path: &Path) -> Result<PathBuf, CaptureError> {
    let path = metadata_path(recording_path);
    let json = serde_json::to_vec_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| {
        CaptureError::StorageError(format!("failed to write {}: {}", path.display(), e))
    })?;
    log::debug!("Wrote sidecar {}", path.display());
    Ok(path)
}

/// Load the sidecar for `recording_path`.
///
/// A recording converted without `--metadata` has no sidecar; that case is
/// reported as [`CaptureError::InputNotFound`] naming the sidecar path.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, CaptureError> {
    let path = metadata_path(recording_path);
    let json = match fs::read(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CaptureError::InputNotFound(path)),
        Err(e) => {
            return Err(CaptureError::StorageError(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };
    serde_json::from_slice(&json)
        .map_err(|e| CaptureError::StorageError(format!("malformed sidecar {}: {}", path.display(), e)))
}

/// Whether `recording_path` still hashes to the checksum in `metadata`.
pub fn is_current(metadata: &RecordingMetadata, recording_path: &Path) -> Result<bool, CaptureError> {
    let data = fs::read(recording_path).map_err(|e| {
        CaptureError::StorageError(format!("failed to read {}: {}", recording_path.display(), e))
    })?;
    Ok(hex_encode(&Sha256::digest(&data)) == metadata.checksum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{AlignmentPolicy, PcmFormat};
    use crate::storage::container_writer::write_container;

    fn converted(dir: &tempfile::TempDir) -> (PathBuf, RecordingMetadata) {
        let wav = dir.path().join("voice_record.wav");
        let result = write_container(&wav, &PcmFormat::default(), &[0u8; 640], AlignmentPolicy::Warn).unwrap();
        let meta = RecordingMetadata::from_conversion(&result, &dir.path().join("voice_record.raw"));
        (wav, meta)
    }

    #[test]
    fn sidecar_sits_next_to_the_wav() {
        assert_eq!(
            metadata_path(Path::new("takes/voice_record.wav")),
            PathBuf::from("takes/voice_record.metadata.json")
        );
    }

    #[test]
    fn written_sidecar_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let (wav, meta) = converted(&dir);

        let path = write_metadata(&meta, &wav).unwrap();
        assert_eq!(path, dir.path().join("voice_record.metadata.json"));

        let loaded = read_metadata(&wav).unwrap();
        assert_eq!(loaded, meta);
        assert!(loaded.source_path.ends_with("voice_record.raw"));
        assert!((loaded.duration_secs - 0.02).abs() < 1e-9);
    }

    #[test]
    fn missing_sidecar_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("voice_record.wav");

        let err = read_metadata(&wav).unwrap_err();
        assert_eq!(err, CaptureError::InputNotFound(metadata_path(&wav)));
    }

    #[test]
    fn malformed_sidecar_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("voice_record.wav");
        fs::write(metadata_path(&wav), b"{ not json").unwrap();

        assert!(matches!(read_metadata(&wav), Err(CaptureError::StorageError(_))));
    }

    #[test]
    fn rewritten_wav_no_longer_matches_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let (wav, meta) = converted(&dir);
        assert!(is_current(&meta, &wav).unwrap());

        write_container(&wav, &PcmFormat::default(), &[1u8; 640], AlignmentPolicy::Warn).unwrap();
        assert!(!is_current(&meta, &wav).unwrap());
    }
}
