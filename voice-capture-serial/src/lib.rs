//! # voice-capture-serial
//!
//! Serial-port backend and command-line tools for voice-capture.
//!
//! Provides:
//! - `SerialPortSource` — `ByteSource` over a `serialport` handle
//! - `device_enumerator` — available port listing for diagnostics
//! - `ConsoleProgress` — `.`-per-chunk progress delegate
//! - `signal` — Ctrl-C to `CancellationToken` bridge
//!
//! ## Usage
//! ```ignore
//! use voice_capture_core::{CancellationToken, CaptureConfiguration, CaptureSession};
//! use voice_capture_serial::SerialPortSource;
//!
//! let session = CaptureSession::new(CaptureConfiguration::default())?;
//! let cancel = CancellationToken::new();
//! session.run(SerialPortSource::open, &cancel)?;
//! ```

pub mod device_enumerator;
pub mod progress;
pub mod serial_source;
pub mod signal;

pub use device_enumerator::{list_ports, PortInfo};
pub use progress::ConsoleProgress;
pub use serial_source::SerialPortSource;
