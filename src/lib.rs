//! RustScan - optical code detection for camera frames and still images
//!
//! Extracts a product-identifying code string from a frame through a cascade
//! of strategies that degrades with the available backends:
//! - certified symbol decoding (`rqrr`, behind the default `rqrr` feature)
//! - heuristic bar-pattern detection with deterministic fallback codes
//! - an enhanced-preprocessing retry pass in QR mode
//!
//! Accepted payloads pass a plausibility check and a per-session cooldown
//! gate so a code held in front of the camera is reported once.
//!
//! ```no_run
//! use rust_scan::{Frame, ScanConfig, ScanEngine};
//!
//! let pixels = vec![255u8; 320 * 240];
//! let frame = Frame::gray(&pixels, 320, 240).unwrap();
//! let mut engine = ScanEngine::new(ScanConfig::from_env());
//! if let Some(code) = engine.scan(&frame) {
//!     println!("{code}");
//! }
//! ```

/// Capability probing, symbol decoders, heuristics, plausibility, config
pub mod decoder;
/// Region proposal (connected components, bar-like region filtering)
pub mod detector;
/// Error types
pub mod error;
/// Repeat suppression
pub mod gate;
/// Core data structures (frames, planes, regions, patterns, candidates)
pub mod models;
/// Scan orchestration
pub mod pipeline;
/// Frame preprocessing
pub mod preprocess;
/// Capture-loop driver
pub mod session;
/// Image loading and synthetic frames
pub mod tools;
/// Utility functions (grayscale, binarization, filters, statistics, hashing)
pub mod utils;

pub use decoder::{
    CapabilitySet, CodeCatalog, GateConfig, PatternLimits, PreprocessConfig, RegionLimits,
    ScanConfig, ScanMode, SymbolDecoder, detect_capabilities,
};
pub use error::{DecodeError, FrameError, ScanError};
pub use gate::ScannerState;
pub use models::{
    CandidateRegion, DetectionCandidate, DetectionSource, Frame, GrayPlane, OwnedFrame,
    PixelLayout, Rect, RunLengthPattern,
};
pub use pipeline::{DecodeStrategy, RecommendedMethod, ScanEngine, ScannerStatus};
pub use preprocess::{PreprocessedVariant, VariantKind, preprocess};

/// Scan an RGB image once with the default configuration.
///
/// No cooldown applies. Returns `None` when the buffer does not match the
/// dimensions or nothing is detected.
pub fn scan_rgb(image: &[u8], width: usize, height: usize) -> Option<String> {
    let frame = Frame::rgb(image, width, height).ok()?;
    ScanEngine::new(ScanConfig::default())
        .scan_once(&frame)
        .map(|c| c.payload)
}
