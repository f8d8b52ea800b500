//! # voice-capture-core
//!
//! Device-agnostic core for capturing raw PCM bytes from a microcontroller
//! and wrapping them in a WAV container.
//!
//! Device backends (serial today) implement the `ByteSource` trait and plug
//! into the generic `CaptureSession`. Conversion is a separate offline pass
//! over the finished raw file.
//!
//! ## Architecture
//!
//! ```text
//! voice-capture-core (this crate)
//! ├── traits/       ← ByteSource, CaptureDelegate
//! ├── models/       ← CaptureError, CaptureState, CaptureConfiguration, PcmFormat, results
//! ├── processing/   ← WAV header generation and parsing
//! ├── session/      ← CaptureSession (poll → append loop)
//! └── storage/      ← RawCaptureWriter, container writer, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{AlignmentPolicy, CaptureConfiguration, PcmFormat, SerialSettings};
pub use models::error::CaptureError;
pub use models::recording_result::{
    CaptureResult, CaptureStats, ConversionResult, RecordingMetadata, StopReason,
};
pub use models::state::CaptureState;
pub use session::capture::CaptureSession;
pub use storage::container_writer::{convert, convert_file, write_container};
pub use storage::raw_writer::RawCaptureWriter;
pub use traits::byte_source::ByteSource;
pub use traits::capture_delegate::CaptureDelegate;

pub use tokio_util::sync::CancellationToken;
