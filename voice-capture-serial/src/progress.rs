//! Console progress reporting for the capture binary.

use std::io::Write;

use parking_lot::Mutex;

use voice_capture_core::models::recording_result::CaptureResult;
use voice_capture_core::models::state::CaptureState;
use voice_capture_core::traits::capture_delegate::CaptureDelegate;

/// Prints one `.` per chunk written, plus status lines on state changes.
pub struct ConsoleProgress<W: Write + Send> {
    out: Mutex<W>,
    device_path: String,
}

impl<W: Write + Send> ConsoleProgress<W> {
    pub fn new(out: W, device_path: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(out),
            device_path: device_path.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock();
        // Progress output is best-effort; a closed stdout must not stop the capture.
        let _ = out.write_all(text.as_bytes()).and_then(|_| out.flush());
    }
}

impl<W: Write + Send> CaptureDelegate for ConsoleProgress<W> {
    fn on_state_changed(&self, state: &CaptureState) {
        if let CaptureState::Capturing { bytes_written: 0 } = state {
            self.emit(&format!(
                "Connected to {}\nRecording... (Ctrl+C to stop)\n",
                self.device_path
            ));
        }
    }

    fn on_chunk_written(&self, _chunk_len: usize, _total_bytes: u64) {
        self.emit(".");
    }

    fn on_capture_finished(&self, result: &CaptureResult) {
        if !result.raw_file_written() {
            self.emit(&format!(
                "\nStopped before recording started; {} left unchanged.\n",
                result.raw_path.display()
            ));
            return;
        }
        self.emit(&format!(
            "\nRecording complete! {} written ({} bytes).\n",
            result.raw_path.display(),
            result.bytes_written()
        ));
    }
}
