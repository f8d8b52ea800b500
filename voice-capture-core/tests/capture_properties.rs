//! Capture loop behaviour against an in-memory device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use voice_capture_core::{
    convert, ByteSource, CancellationToken, CaptureConfiguration, CaptureError, CaptureSession,
};

/// Hands out one chunk per poll, then cancels the session.
struct ChunkedDevice {
    chunks: Vec<Vec<u8>>,
    current: Option<Vec<u8>>,
    cancel: CancellationToken,
    closed: Arc<AtomicBool>,
}

impl ChunkedDevice {
    fn new(mut chunks: Vec<Vec<u8>>, cancel: CancellationToken) -> Self {
        chunks.reverse();
        Self {
            chunks,
            current: None,
            cancel,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl ByteSource for ChunkedDevice {
    fn bytes_available(&mut self) -> Result<usize, CaptureError> {
        if self.current.is_none() {
            self.current = self.chunks.pop();
        }
        match &self.current {
            Some(chunk) => Ok(chunk.len()),
            None => {
                self.cancel.cancel();
                Ok(0)
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError> {
        let chunk = self.current.take().unwrap_or_default();
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn clear_input(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn name(&self) -> String {
        "chunked".into()
    }
}

fn fast_config(dir: &tempfile::TempDir) -> CaptureConfiguration {
    let mut config = CaptureConfiguration {
        raw_path: dir.path().join("voice_record.raw"),
        wav_path: dir.path().join("voice_record.wav"),
        ..Default::default()
    };
    config.serial.settle_delay = Duration::ZERO;
    config.serial.idle_poll_interval = Duration::ZERO;
    config
}

#[test]
fn capture_file_is_concatenation_of_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    let c1 = vec![0x10; 7];
    let c2 = vec![0x20; 1];
    let c3 = (0..=200u8).collect::<Vec<_>>();
    let device = ChunkedDevice::new(vec![c1.clone(), c2.clone(), c3.clone()], cancel.clone());
    let closed = Arc::clone(&device.closed);

    let session = CaptureSession::new(fast_config(&dir)).unwrap();
    let result = session.run(|_| Ok(device), &cancel).unwrap();

    let expected = [c1, c2, c3].concat();
    assert_eq!(std::fs::read(&result.raw_path).unwrap(), expected);
    assert_eq!(result.bytes_written(), expected.len() as u64);
    assert!(closed.load(Ordering::SeqCst));
}

#[test]
fn capture_then_convert_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    let chunks = vec![vec![1, 0, 2, 0], vec![3, 0], vec![4, 0, 5, 0, 6, 0]];
    let device = ChunkedDevice::new(chunks.clone(), cancel.clone());
    let config = fast_config(&dir);

    let session = CaptureSession::new(config.clone()).unwrap();
    session.run(|_| Ok(device), &cancel).unwrap();
    let converted = convert(&config).unwrap();

    assert_eq!(converted.frame_count, 6);
    let data = std::fs::read(&config.wav_path).unwrap();
    assert_eq!(&data[44..], chunks.concat().as_slice());
}
