//! Heuristic decoding of bar-like regions.
//!
//! No symbology is decoded here. A region that carries a stable, barcode
//! shaped bar pattern is turned into a deterministic numeric identifier
//! derived from the pattern and the region statistics. Two different
//! symbols with the same leading widths and statistics map to the same
//! identifier.

use super::config::{PatternLimits, RegionLimits};
use super::pattern::{extract_run_pattern, validate_pattern};
use super::plausibility::Plausibility;
use crate::detector::propose_regions;
use crate::models::{
    CandidateRegion, DetectionCandidate, DetectionSource, GrayPlane, RunLengthPattern,
};
use crate::preprocess::PreprocessedVariant;
use crate::utils::hash::numeric_digest;
use crate::utils::stats::{column_sums, mean_std, plane_mean_std, row_sums};
use std::fmt::Write;
use std::time::Instant;
use tracing::{debug, trace};

/// Rows sampled across the middle third of a region of `height` rows
pub fn band_rows(height: usize, count: usize) -> Vec<usize> {
    if height == 0 || count == 0 {
        return Vec::new();
    }
    let start = height / 3;
    let end = (2 * height / 3).max(start + 1);
    let span = end - start;
    let count = count.min(span);
    if count == 1 {
        return vec![start + span / 2];
    }
    (0..count)
        .map(|i| start + i * (span - 1) / (count - 1))
        .collect()
}

/// Extract the bar pattern of a region from a band of scan lines.
///
/// Every sampled line must validate on its own and agree with the others:
/// same run count, same leading state and per-run widths within
/// `band_tolerance`. Returns the pattern of the middle line.
pub fn sample_band(pixels: &GrayPlane, limits: &PatternLimits) -> Option<RunLengthPattern> {
    let rows = band_rows(pixels.height(), limits.band_rows);
    let mut patterns = Vec::with_capacity(rows.len());
    for y in rows {
        let pattern = extract_run_pattern(pixels.row(y));
        if let Err(reason) = validate_pattern(&pattern, limits) {
            trace!(row = y, "scan line rejected: {reason}");
            return None;
        }
        patterns.push(pattern);
    }

    let reference = patterns.get(patterns.len() / 2)?;
    let agree = patterns.iter().all(|p| lines_agree(p, reference, limits.band_tolerance));
    if !agree {
        trace!("scan lines disagree across the band");
        return None;
    }
    Some(reference.clone())
}

fn lines_agree(a: &RunLengthPattern, b: &RunLengthPattern, tolerance: u32) -> bool {
    a.len() == b.len()
        && a.runs().first().map(|r| r.state) == b.runs().first().map(|r| r.state)
        && a.widths().zip(b.widths()).all(|(x, y)| x.abs_diff(y) <= tolerance)
}

/// Contrast and orientation checks on the region pixels.
///
/// Requires enough intensity spread, and the column profile must vary much
/// more than the row profile (vertical bars stacked horizontally).
pub fn validate_region(pixels: &GrayPlane, limits: &PatternLimits) -> bool {
    let (_, std) = plane_mean_std(pixels);
    if std < limits.contrast_floor {
        return false;
    }

    let (_, column_std) = mean_std(column_sums(pixels));
    let (_, row_std) = mean_std(row_sums(pixels));
    column_std > limits.axis_variance_margin * row_std
}

/// Deterministic numeric identifier for a validated region
pub fn synthesize_payload(
    pattern: &RunLengthPattern,
    pixels: &GrayPlane,
    limits: &PatternLimits,
) -> String {
    let mut key = String::new();
    for width in pattern.widths().take(limits.hash_runs) {
        let _ = write!(key, "{width}");
    }
    let (mean, std) = plane_mean_std(pixels);
    let _ = write!(
        key,
        "_{mean:.1}_{std:.1}_{}x{}",
        pixels.height(),
        pixels.width()
    );
    numeric_digest(key.as_bytes(), limits.fallback_digits)
}

/// Full heuristic pipeline on one proposed region
pub fn decode_region(region: &CandidateRegion, limits: &PatternLimits) -> Option<String> {
    let pattern = sample_band(&region.pixels, limits)?;
    if !validate_region(&region.pixels, limits) {
        trace!(rect = ?region.rect, "region failed contrast/orientation checks");
        return None;
    }
    Some(synthesize_payload(&pattern, &region.pixels, limits))
}

/// Walk the variants in order and their ranked regions until one yields a
/// plausible fallback identifier.
pub fn try_heuristic_decode(
    variants: &[PreprocessedVariant],
    region_limits: &RegionLimits,
    pattern_limits: &PatternLimits,
    plausibility: &Plausibility<'_>,
    now: Instant,
) -> Option<DetectionCandidate> {
    for variant in variants {
        for region in propose_regions(variant, region_limits) {
            let Some(payload) = decode_region(&region, pattern_limits) else {
                continue;
            };
            if !plausibility.check(&payload, DetectionSource::FallbackSynthesis) {
                debug!(variant = variant.name(), "implausible fallback payload dropped");
                continue;
            }
            debug!(
                variant = variant.name(),
                rect = ?region.rect,
                "heuristic decode accepted"
            );
            return Some(DetectionCandidate::new(
                payload,
                DetectionSource::FallbackSynthesis,
                variant.name(),
                now,
            ));
        }
    }
    None
}
