//! Decoding modules
//!
//! This module contains everything that turns pixels into payload strings:
//! - Capability probing for the optional backends
//! - The library adapter around certified symbol decoders
//! - Bar pattern extraction, validation and fallback synthesis
//! - Content plausibility rules
//! - Engine configuration

/// Backend capability probing
pub mod capability;
pub mod config;
/// Heuristic region decoding and fallback synthesis
pub mod heuristic;
/// Symbol decoder trait and backends
pub mod library;
/// Run-length pattern extraction and validation
pub mod pattern;
/// Payload plausibility rules
pub mod plausibility;

pub use capability::{CapabilitySet, detect_capabilities};
pub use config::{GateConfig, PatternLimits, PreprocessConfig, RegionLimits, ScanConfig, ScanMode};
pub use library::{SymbolDecoder, default_decoder};
pub use plausibility::{CodeCatalog, Plausibility};
