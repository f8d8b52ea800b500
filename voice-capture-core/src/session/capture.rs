use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::models::config::{CaptureConfiguration, SerialSettings};
use crate::models::error::CaptureError;
use crate::models::recording_result::{CaptureResult, CaptureStats, StopReason};
use crate::models::state::CaptureState;
use crate::storage::raw_writer::RawCaptureWriter;
use crate::traits::byte_source::ByteSource;
use crate::traits::capture_delegate::CaptureDelegate;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    state: CaptureState,
    stats: CaptureStats,
    capture_start: Option<Instant>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            stats: CaptureStats::default(),
            capture_start: None,
        }
    }

    fn elapsed_secs(&self) -> f64 {
        self.capture_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Closes the source when the capture loop exits, however it exits.
struct SourceGuard<S: ByteSource>(S);

impl<S: ByteSource> Deref for SourceGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: ByteSource> DerefMut for SourceGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: ByteSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        if self.0.is_open() {
            log::info!("Closing {}", self.0.name());
        }
        self.0.close();
    }
}

/// Copies everything a [`ByteSource`] produces into a raw capture file.
///
/// Data flow:
/// ```text
/// [ByteSource] → poll bytes_available → read all → [RawCaptureWriter] → voice_record.raw
/// ```
///
/// The loop has no natural end. It stops when the cancellation token fires
/// (normal completion) or when the device or disk fails (error).
pub struct CaptureSession {
    config: CaptureConfiguration,
    session_state: Arc<Mutex<SessionState>>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
}

impl CaptureSession {
    pub fn new(config: CaptureConfiguration) -> Result<Self, CaptureError> {
        config.validate()?;
        Ok(Self {
            config,
            session_state: Arc::new(Mutex::new(SessionState::new())),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &CaptureConfiguration {
        &self.config
    }

    pub fn state(&self) -> CaptureState {
        self.session_state.lock().state.clone()
    }

    pub fn stats(&self) -> CaptureStats {
        self.session_state.lock().stats
    }

    /// Open the source with `open`, then capture until `cancel` fires.
    ///
    /// If `open` fails the raw file is not touched. The source is closed on
    /// every path once it has been opened.
    pub fn run<S, F>(&self, open: F, cancel: &CancellationToken) -> Result<CaptureResult, CaptureError>
    where
        S: ByteSource,
        F: FnOnce(&SerialSettings) -> Result<S, CaptureError>,
    {
        {
            let s = self.session_state.lock();
            if !s.state.is_idle() {
                return Err(CaptureError::ConfigurationFailed(
                    "a session can only run once".into(),
                ));
            }
        }

        self.set_state(CaptureState::Opening);

        let source = match open(&self.config.serial) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Failed to open {}: {}", self.config.serial.device_path, e);
                return Err(self.fail(e));
            }
        };
        let mut source = SourceGuard(source);
        log::info!(
            "Opened {} at {} baud",
            source.name(),
            self.config.serial.baud_rate
        );

        match self.capture_loop(&mut source, cancel) {
            Ok(result) => {
                drop(source);
                log::info!(
                    "Capture finished: {} bytes in {} chunks -> {}",
                    result.stats.bytes_written,
                    result.stats.chunks,
                    result.raw_path.display()
                );
                self.set_state(CaptureState::Completed(Box::new(result.clone())));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_capture_finished(&result);
                }
                Ok(result)
            }
            Err(e) => {
                drop(source);
                log::error!("Capture aborted: {}", e);
                Err(self.fail(e))
            }
        }
    }

    // --- Internal helpers ---

    fn capture_loop<S: ByteSource>(
        &self,
        source: &mut SourceGuard<S>,
        cancel: &CancellationToken,
    ) -> Result<CaptureResult, CaptureError> {
        let settings = &self.config.serial;

        // Let the USB CDC link settle, then drop whatever the board sent
        // before we were listening.
        settle(settings.settle_delay, cancel);
        source.clear_input()?;

        // Opening the writer truncates the raw file. Nothing has been
        // captured yet, so a stop here must leave the previous file alone.
        if cancel.is_cancelled() {
            log::info!(
                "Cancelled before capture started; {} left unchanged",
                self.config.raw_path.display()
            );
            return Ok(CaptureResult {
                raw_path: self.config.raw_path.clone(),
                stats: CaptureStats::default(),
                elapsed_secs: 0.0,
                stop_reason: StopReason::CancelledBeforeCapture,
            });
        }

        let mut writer = RawCaptureWriter::new(self.config.raw_path.clone());
        writer.open()?;

        {
            let mut s = self.session_state.lock();
            s.capture_start = Some(Instant::now());
            s.stats = CaptureStats::default();
        }
        self.set_state(CaptureState::Capturing { bytes_written: 0 });

        let mut buf = Vec::new();
        while !cancel.is_cancelled() {
            self.session_state.lock().stats.polls += 1;

            let available = source.bytes_available()?;
            if available == 0 {
                if !settings.idle_poll_interval.is_zero() {
                    thread::sleep(settings.idle_poll_interval);
                }
                continue;
            }

            buf.resize(available, 0);
            let n = source.read(&mut buf)?;
            if n == 0 {
                continue;
            }
            writer.write(&buf[..n])?;

            let total = {
                let mut s = self.session_state.lock();
                s.stats.bytes_written += n as u64;
                s.stats.chunks += 1;
                s.state = CaptureState::Capturing {
                    bytes_written: s.stats.bytes_written,
                };
                s.stats.bytes_written
            };
            log::debug!("Wrote {} bytes ({} total)", n, total);

            if let Some(ref delegate) = self.delegate {
                delegate.on_chunk_written(n, total);
            }
        }

        writer.close()?;

        let s = self.session_state.lock();
        Ok(CaptureResult {
            raw_path: writer.file_path().to_path_buf(),
            stats: s.stats,
            elapsed_secs: s.elapsed_secs(),
            stop_reason: StopReason::Cancelled,
        })
    }

    fn set_state(&self, new_state: CaptureState) {
        {
            let mut s = self.session_state.lock();
            s.state = new_state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn fail(&self, error: CaptureError) -> CaptureError {
        self.set_state(CaptureState::Failed(error.clone()));
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
        error
    }
}

const SETTLE_SLICE: Duration = Duration::from_millis(20);

/// Sleep for `delay`, waking early once `cancel` fires.
fn settle(delay: Duration, cancel: &CancellationToken) {
    let deadline = Instant::now() + delay;
    while !cancel.is_cancelled() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(SETTLE_SLICE));
    }
}
