//! Scan orchestration.
//!
//! A [`ScanEngine`] resolves its decode strategies once, from the capability
//! set it was built with, and then runs them in priority order on every
//! frame: certified library decode, heuristic bar patterns, and in QR mode
//! a library retry on enhanced variants. Each strategy's plausible candidate
//! goes through the detection gate; the first one admitted is the result.

use crate::decoder::capability::{CapabilitySet, detect_capabilities};
use crate::decoder::config::{ScanConfig, ScanMode};
use crate::decoder::heuristic::try_heuristic_decode;
use crate::decoder::library::{SymbolDecoder, default_decoder, try_library_decode, try_variants};
use crate::decoder::plausibility::{CodeCatalog, Plausibility};
use crate::gate::ScannerState;
use crate::models::{DetectionCandidate, Frame};
use crate::preprocess::{PreprocessedVariant, preprocess, preprocess_enhanced};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Inputs shared by every strategy for one frame
pub struct ScanContext<'a> {
    pub frame: Frame<'a>,
    pub variants: &'a [PreprocessedVariant],
    pub config: &'a ScanConfig,
    pub plausibility: Plausibility<'a>,
    pub now: Instant,
}

/// One step of the decode cascade
pub trait DecodeStrategy: Send {
    fn name(&self) -> &'static str;

    /// First plausible candidate this strategy finds, if any
    fn attempt(&self, ctx: &ScanContext<'_>) -> Option<DetectionCandidate>;
}

/// Certified backend on the raw frame and the standard variants
pub struct LibraryStrategy {
    decoder: Arc<dyn SymbolDecoder>,
}

impl DecodeStrategy for LibraryStrategy {
    fn name(&self) -> &'static str {
        "library"
    }

    fn attempt(&self, ctx: &ScanContext<'_>) -> Option<DetectionCandidate> {
        try_library_decode(
            self.decoder.as_ref(),
            &ctx.frame,
            ctx.variants,
            &ctx.plausibility,
            ctx.now,
        )
    }
}

/// Region proposal plus bar-pattern fallback synthesis
pub struct HeuristicStrategy;

impl DecodeStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn attempt(&self, ctx: &ScanContext<'_>) -> Option<DetectionCandidate> {
        try_heuristic_decode(
            ctx.variants,
            &ctx.config.region,
            &ctx.config.pattern,
            &ctx.plausibility,
            ctx.now,
        )
    }
}

/// Library retry on the heavier QR preprocessing set
pub struct EnhancedLibraryStrategy {
    decoder: Arc<dyn SymbolDecoder>,
}

impl DecodeStrategy for EnhancedLibraryStrategy {
    fn name(&self) -> &'static str {
        "enhanced_library"
    }

    fn attempt(&self, ctx: &ScanContext<'_>) -> Option<DetectionCandidate> {
        let enhanced = preprocess_enhanced(&ctx.frame, &ctx.config.preprocess);
        try_variants(self.decoder.as_ref(), &enhanced, &ctx.plausibility, ctx.now)
    }
}

/// Method the scanner recommends given its capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedMethod {
    Library,
    Heuristic,
    ManualEntry,
}

/// Capability report for UIs and logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerStatus {
    pub capabilities: CapabilitySet,
    pub mode: ScanMode,
    /// Active strategies in priority order
    pub methods: Vec<String>,
    pub recommended: RecommendedMethod,
}

/// Per-session scan engine
pub struct ScanEngine {
    config: ScanConfig,
    capabilities: CapabilitySet,
    strategies: Vec<Box<dyn DecodeStrategy>>,
    catalog: Option<Arc<dyn CodeCatalog>>,
    state: ScannerState,
}

impl ScanEngine {
    /// Engine over the probed process capabilities
    pub fn new(config: ScanConfig) -> Self {
        Self::with_capabilities(config, detect_capabilities())
    }

    /// Engine over an explicit capability set and the compiled-in backend
    pub fn with_capabilities(config: ScanConfig, capabilities: CapabilitySet) -> Self {
        let decoder: Option<Arc<dyn SymbolDecoder>> = default_decoder().map(Arc::from);
        Self::with_backend(config, capabilities, decoder)
    }

    /// Engine over an explicit capability set and symbol decoder.
    ///
    /// The library capability only counts when a decoder is supplied.
    pub fn with_backend(
        config: ScanConfig,
        capabilities: CapabilitySet,
        decoder: Option<Arc<dyn SymbolDecoder>>,
    ) -> Self {
        let mut capabilities = capabilities.masked(&config);
        if decoder.is_none() {
            capabilities.library_decoder_available = false;
        }

        let mut strategies: Vec<Box<dyn DecodeStrategy>> = Vec::new();
        if let Some(decoder) = decoder.as_ref().filter(|_| capabilities.library_decoder_available) {
            strategies.push(Box::new(LibraryStrategy {
                decoder: Arc::clone(decoder),
            }));
        }
        if capabilities.image_toolkit_available {
            strategies.push(Box::new(HeuristicStrategy));
        }
        if config.mode == ScanMode::Qr && capabilities.image_toolkit_available {
            if let Some(decoder) = decoder.filter(|_| capabilities.library_decoder_available) {
                strategies.push(Box::new(EnhancedLibraryStrategy { decoder }));
            }
        }

        debug!(
            strategies = ?strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "scan engine ready"
        );

        let state = ScannerState::new(config.gate.cooldown);
        Self {
            config,
            capabilities,
            strategies,
            catalog: None,
            state,
        }
    }

    /// Consult `catalog` for the "known product key" plausibility rule
    pub fn with_catalog(mut self, catalog: Arc<dyn CodeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Names of the active strategies in priority order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Start a new scanning session: forget the last reported detection
    pub fn start_session(&mut self) {
        self.state.reset();
    }

    /// Scan one frame against the wall clock
    pub fn scan(&mut self, frame: &Frame<'_>) -> Option<String> {
        self.scan_at(frame, Instant::now())
    }

    /// Scan one frame at an explicit instant
    pub fn scan_at(&mut self, frame: &Frame<'_>, now: Instant) -> Option<String> {
        self.scan_detailed_at(frame, now).map(|c| c.payload)
    }

    /// Scan one frame and return the gated candidate with its provenance.
    ///
    /// Each strategy's candidate goes through the gate in turn; a suppressed
    /// repeat falls through to the next strategy.
    pub fn scan_detailed_at(
        &mut self,
        frame: &Frame<'_>,
        now: Instant,
    ) -> Option<DetectionCandidate> {
        let state = &mut self.state;
        let candidate = run_cascade(
            &self.strategies,
            &self.config,
            self.capabilities,
            self.catalog.as_deref(),
            frame,
            now,
            |candidate| state.admit(candidate, now),
        )?;
        debug!(
            payload = %candidate.payload,
            source = %candidate.source,
            variant = candidate.variant,
            "detection reported"
        );
        Some(candidate)
    }

    /// Scan one frame without the cooldown gate (single-shot scans)
    pub fn scan_once(&self, frame: &Frame<'_>) -> Option<DetectionCandidate> {
        run_cascade(
            &self.strategies,
            &self.config,
            self.capabilities,
            self.catalog.as_deref(),
            frame,
            Instant::now(),
            |_| true,
        )
    }

    pub fn status(&self) -> ScannerStatus {
        let caps = self.capabilities;
        let recommended = if caps.library_decoder_available {
            RecommendedMethod::Library
        } else if caps.image_toolkit_available {
            RecommendedMethod::Heuristic
        } else {
            RecommendedMethod::ManualEntry
        };
        ScannerStatus {
            capabilities: caps,
            mode: self.config.mode,
            methods: self.strategy_names().into_iter().map(String::from).collect(),
            recommended,
        }
    }
}

/// Preprocess `frame` once and run `strategies` in order, returning the
/// first candidate `accept` admits.
fn run_cascade(
    strategies: &[Box<dyn DecodeStrategy>],
    config: &ScanConfig,
    capabilities: CapabilitySet,
    catalog: Option<&dyn CodeCatalog>,
    frame: &Frame<'_>,
    now: Instant,
    mut accept: impl FnMut(&DetectionCandidate) -> bool,
) -> Option<DetectionCandidate> {
    if frame.is_empty() || strategies.is_empty() {
        return None;
    }

    let variants = preprocess(frame, capabilities.image_toolkit_available, &config.preprocess);
    let ctx = ScanContext {
        frame: *frame,
        variants: &variants,
        config,
        plausibility: Plausibility::new(&config.gate, catalog),
        now,
    };

    let found = strategies
        .iter()
        .filter_map(|s| s.attempt(&ctx))
        .find(|candidate| accept(candidate));
    if found.is_none() {
        trace!("no detection in frame");
    }
    found
}
