use super::error::CaptureError;
use super::recording_result::CaptureResult;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → opening → capturing → completed / failed
///           ↓
///         failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Opening,
    Capturing { bytes_written: u64 },
    Completed(Box<CaptureResult>),
    Failed(CaptureError),
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }

    /// Bytes persisted so far, if the state tracks it.
    pub fn bytes_written(&self) -> Option<u64> {
        match self {
            Self::Capturing { bytes_written } => Some(*bytes_written),
            Self::Completed(result) => Some(result.bytes_written()),
            _ => None,
        }
    }
}
