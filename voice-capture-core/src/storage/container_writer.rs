use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::models::config::{AlignmentPolicy, CaptureConfiguration, PcmFormat};
use crate::models::error::CaptureError;
use crate::models::recording_result::{ConversionResult, RecordingMetadata};
use crate::processing::wav_format::{self, MAX_DATA_SIZE};
use crate::storage::metadata;

/// Wrap a raw capture in a WAV container using the configured paths.
///
/// Writes the metadata sidecar too when `config.write_metadata` is set.
/// Serial settings play no part here and are not validated.
pub fn convert(config: &CaptureConfiguration) -> Result<ConversionResult, CaptureError> {
    config.validate_conversion()?;
    let result = convert_file(&config.raw_path, &config.wav_path, &config.format, config.alignment)?;

    if config.write_metadata {
        let meta = RecordingMetadata::from_conversion(&result, &config.raw_path);
        metadata::write_metadata(&meta, &result.wav_path)?;
    }

    Ok(result)
}

/// Read `raw_path` whole and write it verbatim after a PCM header to `wav_path`.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [raw capture bytes, unchanged]
/// ```
///
/// A missing input yields [`CaptureError::InputNotFound`] and no output file.
pub fn convert_file(
    raw_path: &Path,
    wav_path: &Path,
    format: &PcmFormat,
    alignment: AlignmentPolicy,
) -> Result<ConversionResult, CaptureError> {
    let payload = match fs::read(raw_path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::error!("Raw capture {} not found", raw_path.display());
            return Err(CaptureError::InputNotFound(raw_path.to_path_buf()));
        }
        Err(e) => {
            return Err(CaptureError::StorageError(format!(
                "failed to read {}: {}",
                raw_path.display(),
                e
            )))
        }
    };

    let result = write_container(wav_path, format, &payload, alignment)?;
    log::info!(
        "Converted {} -> {} ({} bytes, {:.2}s)",
        raw_path.display(),
        wav_path.display(),
        result.payload_bytes,
        result.duration_secs
    );
    Ok(result)
}

/// Write `payload` as the data chunk of a new WAV file at `wav_path`.
pub fn write_container(
    wav_path: &Path,
    format: &PcmFormat,
    payload: &[u8],
    alignment: AlignmentPolicy,
) -> Result<ConversionResult, CaptureError> {
    format.validate().map_err(CaptureError::ConfigurationFailed)?;

    let block_align = format.block_align() as usize;
    let is_aligned = payload.len() % block_align == 0;
    if !is_aligned {
        match alignment {
            AlignmentPolicy::Warn => log::warn!(
                "Payload of {} bytes leaves a partial {}-byte frame; writing it unchanged",
                payload.len(),
                block_align
            ),
            AlignmentPolicy::Reject => {
                return Err(CaptureError::MisalignedPayload {
                    len: payload.len(),
                    block_align,
                })
            }
        }
    }

    let data_size = u32::try_from(payload.len())
        .ok()
        .filter(|size| *size <= MAX_DATA_SIZE)
        .ok_or(CaptureError::PayloadTooLarge(payload.len()))?;

    let header = wav_format::generate_wav_header(format, data_size);

    let mut file = File::create(wav_path)
        .map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;
    file.write_all(&header)
        .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
    file.write_all(payload)
        .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))?;
    file.flush().map_err(|e| CaptureError::StorageError(e.to_string()))?;
    drop(file);

    let mut hasher = Sha256::new();
    hasher.update(header);
    hasher.update(payload);
    let checksum = hex_encode(&hasher.finalize());

    let frame_count = (payload.len() / block_align) as u64;
    Ok(ConversionResult {
        wav_path: wav_path.to_path_buf(),
        format: *format,
        payload_bytes: payload.len(),
        frame_count,
        duration_secs: frame_count as f64 / format.frame_rate as f64,
        checksum,
        is_aligned,
    })
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
