//! `serialport`-backed byte source.
//!
//! Opens the board's USB CDC port and exposes it through the core
//! `ByteSource` trait so `CaptureSession` can poll it.

use std::io::{self, Read};

use serialport::{ClearBuffer, ErrorKind, SerialPort};

use voice_capture_core::models::config::SerialSettings;
use voice_capture_core::models::error::CaptureError;
use voice_capture_core::traits::byte_source::ByteSource;

/// A serial port opened for capture.
pub struct SerialPortSource {
    device_path: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortSource {
    /// Open `settings.device_path` at the configured baud rate and timeout.
    pub fn open(settings: &SerialSettings) -> Result<Self, CaptureError> {
        let port = serialport::new(&settings.device_path, settings.baud_rate)
            .timeout(settings.read_timeout)
            .open()
            .map_err(|e| CaptureError::ConnectionFailed {
                path: settings.device_path.clone(),
                reason: describe_open_error(&e),
            })?;

        Ok(Self::from_port(settings.device_path.clone(), port))
    }

    /// Wrap an already-open port.
    pub fn from_port(device_path: String, port: Box<dyn SerialPort>) -> Self {
        Self {
            device_path,
            port: Some(port),
        }
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, CaptureError> {
        self.port
            .as_mut()
            .ok_or_else(|| CaptureError::DeviceIo(format!("{} is closed", self.device_path)))
    }
}

impl ByteSource for SerialPortSource {
    fn bytes_available(&mut self) -> Result<usize, CaptureError> {
        let count = self
            .port_mut()?
            .bytes_to_read()
            .map_err(|e| CaptureError::DeviceIo(e.to_string()))?;
        Ok(count as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError> {
        match self.port_mut()?.read(buf) {
            Ok(n) => Ok(n),
            // Timeout is expected for serial reads
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(CaptureError::DeviceIo(e.to_string())),
        }
    }

    fn clear_input(&mut self) -> Result<(), CaptureError> {
        self.port_mut()?
            .clear(ClearBuffer::Input)
            .map_err(|e| CaptureError::DeviceIo(format!("failed to clear input buffer: {}", e)))
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            log::debug!("Released {}", self.device_path);
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn name(&self) -> String {
        self.device_path.clone()
    }
}

/// Turn a `serialport` open error into an operator-facing reason.
pub fn describe_open_error(error: &serialport::Error) -> String {
    let hint = match error.kind() {
        ErrorKind::NoDevice => "device not found or busy",
        ErrorKind::InvalidInput => "invalid port settings",
        ErrorKind::Io(io::ErrorKind::NotFound) => "no such device",
        ErrorKind::Io(io::ErrorKind::PermissionDenied) => "permission denied",
        _ => "open failed",
    };
    format!("{}: {}", hint, error.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn describes_missing_device() {
        let err = serialport::Error::new(ErrorKind::NoDevice, "No such file or directory");
        assert_eq!(describe_open_error(&err), "device not found or busy: No such file or directory");
    }

    #[test]
    fn describes_permission_problem() {
        let err = serialport::Error::new(
            ErrorKind::Io(io::ErrorKind::PermissionDenied),
            "Permission denied",
        );
        assert!(describe_open_error(&err).starts_with("permission denied"));
    }

    #[cfg(unix)]
    #[test]
    fn open_nonexistent_port_fails_with_connection_error() {
        let settings = SerialSettings {
            device_path: "/dev/voice-capture-test-no-such-port".into(),
            read_timeout: Duration::from_millis(50),
            ..Default::default()
        };

        match SerialPortSource::open(&settings) {
            Err(CaptureError::ConnectionFailed { path, .. }) => assert_eq!(path, settings.device_path),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opened a port that does not exist"),
        }
    }
}
