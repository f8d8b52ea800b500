use crate::models::error::CaptureError;
use crate::models::recording_result::CaptureResult;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// All methods are called from the capture loop thread. Keep them short;
/// the loop does not read the device while a callback runs.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, _state: &CaptureState) {}

    /// Called once per non-empty read, after the chunk reached the file.
    fn on_chunk_written(&self, chunk_len: usize, total_bytes: u64);

    /// Called when the session ends with an error.
    fn on_error(&self, _error: &CaptureError) {}

    /// Called when the operator stopped the session and the file is closed.
    fn on_capture_finished(&self, _result: &CaptureResult) {}
}
