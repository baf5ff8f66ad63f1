use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Which decode path produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// A certified symbol decoder backend
    Library,
    /// Heuristic decoding of a real symbology value
    Heuristic,
    /// Pseudo-code synthesised from bar pattern and region statistics
    FallbackSynthesis,
}

impl DetectionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionSource::Library => "library",
            DetectionSource::Heuristic => "heuristic",
            DetectionSource::FallbackSynthesis => "fallback_synthesis",
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload produced by one decode attempt
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCandidate {
    pub payload: String,
    pub source: DetectionSource,
    /// Preprocessed variant the payload came from
    pub variant: &'static str,
    pub timestamp: Instant,
}

impl DetectionCandidate {
    pub fn new(
        payload: impl Into<String>,
        source: DetectionSource,
        variant: &'static str,
        timestamp: Instant,
    ) -> Self {
        Self {
            payload: payload.into(),
            source,
            variant,
            timestamp,
        }
    }
}
