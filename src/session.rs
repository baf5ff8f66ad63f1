//! Capture-loop driver.
//!
//! The engine itself owns no threads. [`ScanSession`] is a reference driver
//! that moves an engine onto a background thread, feeds it every N-th frame
//! from a frame source and forwards accepted detections over a channel.

use crate::models::{DetectionCandidate, OwnedFrame};
use crate::pipeline::ScanEngine;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info};

/// Scan every N-th frame of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    every: u64,
    seen: u64,
}

impl FrameSampler {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            seen: 0,
        }
    }

    /// Count one frame; true when it should be scanned
    pub fn tick(&mut self) -> bool {
        let scan = self.seen % self.every == 0;
        self.seen += 1;
        scan
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Counters reported when a capture loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_seen: u64,
    pub frames_scanned: u64,
    pub detections: u64,
}

/// Drive `engine` over `frames` until the source ends, a stop signal
/// arrives or the receiving side hangs up.
///
/// Starts a fresh gate session before the first frame.
pub fn run_capture_loop<I>(
    engine: &mut ScanEngine,
    frames: I,
    mut sampler: FrameSampler,
    results: &mpsc::Sender<DetectionCandidate>,
    stop: &mpsc::Receiver<()>,
) -> SessionSummary
where
    I: IntoIterator<Item = OwnedFrame>,
{
    engine.start_session();
    let mut summary = SessionSummary::default();

    for frame in frames {
        if stop.try_recv().is_ok() {
            info!("scan session stop signal received");
            break;
        }

        summary.frames_seen += 1;
        if !sampler.tick() {
            continue;
        }
        summary.frames_scanned += 1;

        let Some(candidate) = engine.scan_detailed_at(&frame.as_frame(), Instant::now()) else {
            continue;
        };
        summary.detections += 1;
        if results.send(candidate).is_err() {
            debug!("detection receiver dropped, ending session");
            break;
        }
    }

    info!(
        frames_seen = summary.frames_seen,
        frames_scanned = summary.frames_scanned,
        detections = summary.detections,
        "scan session ended"
    );
    summary
}

/// Background scanning thread with a detection channel
pub struct ScanSession {
    results: mpsc::Receiver<DetectionCandidate>,
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<(ScanEngine, SessionSummary)>>,
}

impl ScanSession {
    /// Move `engine` onto a new thread and scan `frames` there
    pub fn spawn<I>(mut engine: ScanEngine, frames: I, sampler: FrameSampler) -> Self
    where
        I: IntoIterator<Item = OwnedFrame> + Send + 'static,
    {
        let (result_tx, results) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let summary = run_capture_loop(&mut engine, frames, sampler, &result_tx, &stop_rx);
            (engine, summary)
        });

        Self {
            results,
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Next detection if one is waiting
    pub fn try_recv(&self) -> Option<DetectionCandidate> {
        self.results.try_recv().ok()
    }

    /// Block until the next detection or the end of the session
    pub fn recv(&self) -> Option<DetectionCandidate> {
        self.results.recv().ok()
    }

    /// Ask the loop to stop after the current frame
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }

    /// Wait for the loop to end and hand the engine back.
    ///
    /// Returns `None` if the scanning thread panicked.
    pub fn join(mut self) -> Option<(ScanEngine, SessionSummary)> {
        self.handle.take()?.join().ok()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop();
    }
}
