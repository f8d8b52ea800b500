//! WAV file format utilities.
//!
//! Generates and parses the standard 44-byte RIFF WAV header used for
//! uncompressed PCM.

use crate::models::config::PcmFormat;
use crate::models::error::CaptureError;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Largest payload a RIFF chunk size field can describe.
pub const MAX_DATA_SIZE: u32 = u32::MAX - 36;

const PCM_FORMAT_CODE: u16 = 1;
const PCM_FMT_CHUNK_SIZE: u32 = 16;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  frame_rate
/// [28-31]  byte_rate = frame_rate * channels * sample_width
/// [32-33]  block_align = channels * sample_width
/// [34-35]  bits_per_sample
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(format: &PcmFormat, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&PCM_FMT_CHUNK_SIZE.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_CODE.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.frame_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample().to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Fields decoded from a 44-byte PCM WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub format: PcmFormat,
    pub byte_rate: u32,
    pub block_align: u16,
    pub data_size: u32,
}

/// Parse a canonical 44-byte PCM header.
///
/// Only the layout written by [`generate_wav_header`] is accepted; files with
/// extra chunks (LIST, fact) are rejected.
pub fn parse_wav_header(bytes: &[u8]) -> Result<WavHeader, CaptureError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(CaptureError::InvalidHeader(format!(
            "expected {} bytes, got {}",
            WAV_HEADER_SIZE,
            bytes.len()
        )));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(CaptureError::InvalidHeader("missing RIFF/WAVE magic".into()));
    }
    if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
        return Err(CaptureError::InvalidHeader("non-canonical chunk layout".into()));
    }
    if read_u32(bytes, 16) != PCM_FMT_CHUNK_SIZE || read_u16(bytes, 20) != PCM_FORMAT_CODE {
        return Err(CaptureError::InvalidHeader("not uncompressed PCM".into()));
    }

    let bits = read_u16(bytes, 34);
    if bits % 8 != 0 {
        return Err(CaptureError::InvalidHeader(format!("unsupported bit depth: {}", bits)));
    }

    Ok(WavHeader {
        chunk_size: read_u32(bytes, 4),
        format: PcmFormat {
            channels: read_u16(bytes, 22),
            sample_width: bits / 8,
            frame_rate: read_u32(bytes, 24),
        },
        byte_rate: read_u32(bytes, 28),
        block_align: read_u16(bytes, 32),
        data_size: read_u32(bytes, 40),
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}
