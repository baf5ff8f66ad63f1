//! Engine configuration.
//!
//! Every threshold is empirical; defaults follow the values the scanner has
//! shipped with. `ScanConfig::from_env` overlays `SCAN_*` environment
//! variables on top of the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which code family the session is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// 1-D barcodes: library decode, then heuristic bar patterns
    #[default]
    Barcode,
    /// QR codes: additionally retries the library on enhanced variants
    Qr,
}

/// Size and shape bounds for proposed regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionLimits {
    /// Width must exceed `min_aspect * height`
    pub min_aspect: f32,
    pub min_width: usize,
    pub min_height: usize,
    /// Area must be strictly greater than this
    pub min_area: usize,
    /// Area must be strictly below this share of the variant area
    pub max_area_fraction: f32,
    pub max_width_fraction: f32,
    pub max_height_fraction: f32,
    /// Horizontal ink gaps up to this many pixels are fused before labelling
    pub merge_gap: usize,
    /// Regions kept per variant after ranking
    pub max_regions: usize,
}

impl Default for RegionLimits {
    fn default() -> Self {
        Self {
            min_aspect: 3.0,
            min_width: 40,
            min_height: 10,
            min_area: 600,
            max_area_fraction: 0.8,
            max_width_fraction: 0.9,
            max_height_fraction: 0.5,
            merge_gap: 16,
            max_regions: 8,
        }
    }
}

/// Shape heuristics for run-length patterns and regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternLimits {
    pub min_runs: usize,
    pub max_runs: usize,
    pub min_distinct_widths: usize,
    /// Longest allowed streak of equal neighbouring widths
    pub max_equal_streak: usize,
    pub max_width_ratio: f32,
    /// Scan lines sampled across the middle third of a region
    pub band_rows: usize,
    /// Per-run width difference tolerated between band lines
    pub band_tolerance: u32,
    /// Minimum intensity standard deviation of a region
    pub contrast_floor: f64,
    /// Column-sum spread must exceed row-sum spread by this factor
    pub axis_variance_margin: f64,
    /// Leading runs that feed the fallback hash
    pub hash_runs: usize,
    /// Length of the synthesised numeric code
    pub fallback_digits: usize,
}

impl Default for PatternLimits {
    fn default() -> Self {
        Self {
            min_runs: 10,
            max_runs: 200,
            min_distinct_widths: 3,
            max_equal_streak: 2,
            max_width_ratio: 10.0,
            band_rows: 5,
            band_tolerance: 2,
            contrast_floor: 30.0,
            axis_variance_margin: 2.0,
            hash_runs: 30,
            fallback_digits: 12,
        }
    }
}

/// Plausibility and cooldown settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum time before the same payload is reported again
    #[serde(with = "duration_ms")]
    pub cooldown: Duration,
    pub min_library_len: usize,
    pub min_heuristic_len: usize,
    /// Payloads longer than this need at least two distinct characters
    pub diversity_len: usize,
    pub min_text_len: usize,
    pub max_text_len: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(2),
            min_library_len: 2,
            min_heuristic_len: 4,
            diversity_len: 10,
            min_text_len: 3,
            max_text_len: 500,
        }
    }
}

/// Preprocessing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub fixed_threshold: u8,
    pub adaptive_block: usize,
    pub adaptive_offset: i32,
    pub edge_threshold: u32,
    pub contrast_alpha: f32,
    pub contrast_beta: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            fixed_threshold: 127,
            adaptive_block: 11,
            adaptive_offset: 2,
            edge_threshold: 200,
            contrast_alpha: 1.2,
            contrast_beta: 10.0,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub mode: ScanMode,
    pub preprocess: PreprocessConfig,
    pub region: RegionLimits,
    pub pattern: PatternLimits,
    pub gate: GateConfig,
    /// Masks the library capability off when false
    pub allow_library: bool,
    /// Masks the toolkit capability off when false
    pub allow_toolkit: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            preprocess: PreprocessConfig::default(),
            region: RegionLimits::default(),
            pattern: PatternLimits::default(),
            gate: GateConfig::default(),
            allow_library: true,
            allow_toolkit: true,
        }
    }
}

impl ScanConfig {
    /// Defaults tuned for QR scanning
    pub fn qr() -> Self {
        Self {
            mode: ScanMode::Qr,
            ..Self::default()
        }
    }

    /// Defaults with `SCAN_*` environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `SCAN_*` environment overrides onto this config
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Overlay `SCAN_*` overrides resolved through `lookup`.
    ///
    /// Unparsable values keep the current setting. Band rows are clamped to
    /// 1..=15, fallback digits to 4..=32 and the aspect floor to at least 1.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let gate = &mut self.gate;
        gate.cooldown = Duration::from_millis(parse_env_u64(
            lookup("SCAN_COOLDOWN_MS"),
            gate.cooldown.as_millis() as u64,
        ));

        let region = &mut self.region;
        region.min_aspect = parse_env_f32(lookup("SCAN_MIN_ASPECT"), region.min_aspect).max(1.0);
        region.merge_gap = parse_env_usize(lookup("SCAN_MERGE_GAP"), region.merge_gap);

        let pattern = &mut self.pattern;
        pattern.contrast_floor =
            parse_env_f32(lookup("SCAN_CONTRAST_FLOOR"), pattern.contrast_floor as f32) as f64;
        pattern.band_rows =
            parse_env_usize(lookup("SCAN_BAND_ROWS"), pattern.band_rows).clamp(1, 15);
        pattern.fallback_digits =
            parse_env_usize(lookup("SCAN_FALLBACK_DIGITS"), pattern.fallback_digits).clamp(4, 32);

        if let Some(mode) = lookup("SCAN_MODE") {
            match mode.trim().to_ascii_lowercase().as_str() {
                "qr" => self.mode = ScanMode::Qr,
                "barcode" => self.mode = ScanMode::Barcode,
                _ => {}
            }
        }
        self.allow_library =
            !parse_env_bool_u8(lookup("SCAN_DISABLE_LIBRARY"), !self.allow_library);
        self.allow_toolkit =
            !parse_env_bool_u8(lookup("SCAN_DISABLE_TOOLKIT"), !self.allow_toolkit);
    }
}

fn parse_env_u64(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(value: Option<String>, default: f32) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_bool_u8(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
