use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Default device path of the XIAO nRF52840 on macOS.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/cu.usbmodem1101";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_RAW_FILENAME: &str = "voice_record.raw";
pub const DEFAULT_WAV_FILENAME: &str = "voice_record.wav";

/// Serial connection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Platform-specific device path (e.g. `/dev/cu.usbmodem1101`, `COM3`).
    pub device_path: String,

    /// Line speed in baud (default: 115200).
    pub baud_rate: u32,

    /// Read timeout applied to the port (default: 500 ms).
    pub read_timeout: Duration,

    /// Wait after opening before the stale input is discarded (default: 1 s).
    pub settle_delay: Duration,

    /// Sleep between polls when no bytes are waiting. Zero busy-polls.
    pub idle_poll_interval: Duration,
}

impl SerialSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.device_path.trim().is_empty() {
            return Err("device path must not be empty".into());
        }
        if self.baud_rate == 0 {
            return Err("baud rate must be positive".into());
        }
        if self.read_timeout.is_zero() {
            return Err("read timeout must be positive".into());
        }
        Ok(())
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(500),
            settle_delay: Duration::from_secs(1),
            idle_poll_interval: Duration::from_millis(2),
        }
    }
}

/// PCM layout of the captured samples. Must match the firmware settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Number of interleaved channels (default: 1).
    pub channels: u16,

    /// Bytes per sample (default: 2, i.e. 16-bit).
    pub sample_width: u16,

    /// Frames per second (default: 16000).
    pub frame_rate: u32,
}

impl PcmFormat {
    pub fn block_align(&self) -> u16 {
        self.channels * self.sample_width
    }

    /// Only meaningful for a format that passed [`PcmFormat::validate`].
    pub fn byte_rate(&self) -> u32 {
        self.frame_rate * self.block_align() as u32
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    pub fn validate(&self) -> Result<(), String> {
        if ![1, 2].contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if ![1, 2, 3, 4].contains(&self.sample_width) {
            return Err(format!("unsupported sample width: {} bytes", self.sample_width));
        }
        if self.frame_rate == 0 {
            return Err("frame rate must be positive".into());
        }
        // The header stores byte_rate in 32 bits.
        if self.frame_rate.checked_mul(self.block_align() as u32).is_none() {
            return Err(format!(
                "frame rate {} with {}-byte frames overflows the header byte rate",
                self.frame_rate,
                self.block_align()
            ));
        }
        Ok(())
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_width: 2,
            frame_rate: 16_000,
        }
    }
}

/// What the converter does with a payload that is not a whole number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentPolicy {
    /// Log a warning and write the payload unchanged.
    #[default]
    Warn,
    /// Refuse to write the container.
    Reject,
}

/// Configuration for a capture session and the follow-up conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfiguration {
    pub serial: SerialSettings,

    pub format: PcmFormat,

    /// Headerless capture output and converter input.
    pub raw_path: PathBuf,

    /// Converter output.
    pub wav_path: PathBuf,

    pub alignment: AlignmentPolicy,

    /// Write a `<wav>.metadata.json` sidecar after conversion (default: false).
    pub write_metadata: bool,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), CaptureError> {
        self.serial.validate().map_err(CaptureError::ConfigurationFailed)?;
        self.validate_conversion()
    }

    /// Checks only what the converter reads. Serial settings are ignored so
    /// an offline conversion is not blocked by a capture-side setting.
    pub fn validate_conversion(&self) -> Result<(), CaptureError> {
        self.format.validate().map_err(CaptureError::ConfigurationFailed)?;
        if self.raw_path.as_os_str().is_empty() || self.wav_path.as_os_str().is_empty() {
            return Err(CaptureError::ConfigurationFailed("output paths must not be empty".into()));
        }
        if self.raw_path == self.wav_path {
            return Err(CaptureError::ConfigurationFailed(
                "raw and wav paths must differ".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            format: PcmFormat::default(),
            raw_path: PathBuf::from(DEFAULT_RAW_FILENAME),
            wav_path: PathBuf::from(DEFAULT_WAV_FILENAME),
            alignment: AlignmentPolicy::default(),
            write_metadata: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_firmware() {
        let config = CaptureConfiguration::default();
        assert_eq!(config.serial.device_path, "/dev/cu.usbmodem1101");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.serial.read_timeout, Duration::from_millis(500));
        assert_eq!(config.serial.settle_delay, Duration::from_secs(1));
        assert_eq!(config.format, PcmFormat { channels: 1, sample_width: 2, frame_rate: 16_000 });
        assert_eq!(config.raw_path, PathBuf::from("voice_record.raw"));
        assert_eq!(config.wav_path, PathBuf::from("voice_record.wav"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn derived_format_fields() {
        let format = PcmFormat::default();
        assert_eq!(format.block_align(), 2);
        assert_eq!(format.byte_rate(), 32_000);
        assert_eq!(format.bits_per_sample(), 16);

        let stereo = PcmFormat { channels: 2, sample_width: 3, frame_rate: 48_000 };
        assert_eq!(stereo.block_align(), 6);
        assert_eq!(stereo.byte_rate(), 288_000);
    }

    #[test]
    fn rejects_empty_device_path() {
        let mut config = CaptureConfiguration::default();
        config.serial.device_path = "  ".into();
        assert!(matches!(config.validate(), Err(CaptureError::ConfigurationFailed(_))));
    }

    #[test]
    fn rejects_zero_baud_and_timeout() {
        let mut serial = SerialSettings { baud_rate: 0, ..Default::default() };
        assert!(serial.validate().is_err());
        serial.baud_rate = 9600;
        serial.read_timeout = Duration::ZERO;
        assert!(serial.validate().is_err());
    }

    #[test]
    fn rejects_bad_format() {
        assert!(PcmFormat { channels: 0, ..Default::default() }.validate().is_err());
        assert!(PcmFormat { sample_width: 5, ..Default::default() }.validate().is_err());
        assert!(PcmFormat { frame_rate: 0, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn rejects_byte_rate_beyond_u32() {
        let format = PcmFormat { channels: 2, sample_width: 4, frame_rate: 1_000_000_000 };
        let err = format.validate().unwrap_err();
        assert!(err.contains("byte rate"));

        // 8-byte frames at the largest rate that still fits.
        let edge = PcmFormat { channels: 2, sample_width: 4, frame_rate: u32::MAX / 8 };
        assert!(edge.validate().is_ok());
        assert_eq!(edge.byte_rate(), (u32::MAX / 8) * 8);
    }

    #[test]
    fn conversion_check_ignores_serial_settings() {
        let mut config = CaptureConfiguration::default();
        config.serial.baud_rate = 0;
        config.serial.device_path = String::new();
        assert!(config.validate().is_err());
        assert!(config.validate_conversion().is_ok());

        config.wav_path = config.raw_path.clone();
        assert!(config.validate_conversion().is_err());
    }

    #[test]
    fn rejects_same_raw_and_wav_path() {
        let config = CaptureConfiguration {
            wav_path: PathBuf::from(DEFAULT_RAW_FILENAME),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
