//! Content plausibility checks shared by every decode path.
//!
//! A payload is accepted outright when it looks like something a product
//! label carries (URL, e-mail, phone number, retail barcode, product code)
//! or when the product store already knows it. Anything else must fall
//! inside the configured length window.

use super::config::GateConfig;
use crate::models::DetectionSource;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

/// Lookup into the external product store
pub trait CodeCatalog: Send + Sync {
    /// True when `code` is a known product key
    fn contains_code(&self, code: &str) -> bool;
}

impl CodeCatalog for HashSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code) || self.iter().any(|known| known.eq_ignore_ascii_case(code))
    }
}

impl CodeCatalog for BTreeSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code) || self.iter().any(|known| known.eq_ignore_ascii_case(code))
    }
}

/// Recognised payload shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeShape {
    Url,
    Email,
    Phone,
    UpcA,
    Ean13,
    Ean8,
    Code39,
    ProductCode,
}

fn shape_patterns() -> &'static [(CodeShape, Regex)] {
    static PATTERNS: OnceLock<Vec<(CodeShape, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (CodeShape::Url, r"^(?i)(https?://|www\.|ftp://)"),
            (CodeShape::Email, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"),
            (CodeShape::UpcA, r"^\d{12}$"),
            (CodeShape::Ean13, r"^\d{13}$"),
            (CodeShape::Ean8, r"^\d{8}$"),
            (CodeShape::Phone, r"^\+?[\d\s\-()]{7,}$"),
            (CodeShape::Code39, r"^[A-Z0-9\-. $/+%]{1,43}$"),
            (CodeShape::ProductCode, r"^(?i)[A-Z0-9\-_.]{3,50}$"),
        ]
        .into_iter()
        .filter_map(|(shape, pattern)| Regex::new(pattern).ok().map(|rx| (shape, rx)))
        .collect()
    })
}

/// First shape `payload` matches, in the order URL, e-mail, UPC-A, EAN-13,
/// EAN-8, phone, Code 39, product code.
pub fn classify_shape(payload: &str) -> Option<CodeShape> {
    shape_patterns()
        .iter()
        .find(|(_, rx)| rx.is_match(payload))
        .map(|(shape, _)| *shape)
}

/// Plausibility rules bound to a config and an optional product store
#[derive(Clone, Copy)]
pub struct Plausibility<'a> {
    config: &'a GateConfig,
    catalog: Option<&'a dyn CodeCatalog>,
}

impl<'a> Plausibility<'a> {
    pub fn new(config: &'a GateConfig, catalog: Option<&'a dyn CodeCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Minimum trimmed length for payloads from `source`
    pub fn min_len(&self, source: DetectionSource) -> usize {
        match source {
            DetectionSource::Library => self.config.min_library_len,
            DetectionSource::Heuristic | DetectionSource::FallbackSynthesis => {
                self.config.min_heuristic_len
            }
        }
    }

    pub fn check(&self, payload: &str, source: DetectionSource) -> bool {
        let payload = payload.trim();
        if payload.is_empty() {
            return false;
        }

        let len = payload.chars().count();
        if len < self.min_len(source) {
            return false;
        }

        if len > self.config.diversity_len && distinct_chars(payload) < 2 {
            return false;
        }

        if classify_shape(payload).is_some() {
            return true;
        }
        if self.catalog.is_some_and(|catalog| catalog.contains_code(payload)) {
            return true;
        }

        (self.config.min_text_len..=self.config.max_text_len).contains(&len)
    }
}

/// Check `payload` against the default rules without a product store
pub fn is_plausible(payload: &str, source: DetectionSource, config: &GateConfig) -> bool {
    Plausibility::new(config, None).check(payload, source)
}

fn distinct_chars(s: &str) -> usize {
    s.chars().collect::<HashSet<_>>().len()
}
