//! Repeat suppression for continuous scanning.

use crate::models::DetectionCandidate;
use std::time::{Duration, Instant};
use tracing::trace;

/// Session-scoped memory of the last reported detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerState {
    last_reported_payload: Option<String>,
    last_reported_at: Option<Instant>,
    cooldown: Duration,
}

impl ScannerState {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_reported_payload: None,
            last_reported_at: None,
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_reported_payload(&self) -> Option<&str> {
        self.last_reported_payload.as_deref()
    }

    pub fn last_reported_at(&self) -> Option<Instant> {
        self.last_reported_at
    }

    /// Forget the last detection (new session)
    pub fn reset(&mut self) {
        self.last_reported_payload = None;
        self.last_reported_at = None;
    }

    /// False when `candidate` repeats the last payload inside the cooldown
    pub fn should_report(&self, candidate: &DetectionCandidate, now: Instant) -> bool {
        match (&self.last_reported_payload, self.last_reported_at) {
            (Some(last), Some(at)) if *last == candidate.payload => {
                now.saturating_duration_since(at) >= self.cooldown
            }
            _ => true,
        }
    }

    pub fn record(&mut self, candidate: &DetectionCandidate, now: Instant) {
        self.last_reported_payload = Some(candidate.payload.clone());
        self.last_reported_at = Some(now);
    }

    /// `should_report` and, when accepted, `record`
    pub fn admit(&mut self, candidate: &DetectionCandidate, now: Instant) -> bool {
        if !self.should_report(candidate, now) {
            trace!(payload = %candidate.payload, "suppressed repeat inside cooldown");
            return false;
        }
        self.record(candidate, now);
        true
    }
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
