use crate::models::error::CaptureError;

/// A polled, byte-oriented input channel such as a serial port.
///
/// Implemented by:
/// - `SerialPortSource` (voice-capture-serial)
/// - scripted sources in tests
///
/// A source is owned by exactly one capture session. `close` must be
/// idempotent; the session calls it on every exit path.
pub trait ByteSource: Send {
    /// Number of bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> Result<usize, CaptureError>;

    /// Read up to `buf.len()` bytes. Returns the number of bytes read,
    /// which may be zero if the read timed out.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError>;

    /// Discard anything the driver buffered before the session started.
    fn clear_input(&mut self) -> Result<(), CaptureError>;

    /// Release the underlying handle.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Human-readable identifier for logs (device path, test name).
    fn name(&self) -> String;
}
