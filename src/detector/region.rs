use crate::decoder::config::RegionLimits;
use crate::detector::connected_components::find_ink_components;
use crate::models::{CandidateRegion, Rect};
use crate::preprocess::PreprocessedVariant;
use std::cmp::Reverse;
use tracing::trace;

pub struct RegionProposer;

impl RegionProposer {
    /// Propose wide, bar-like regions of one variant.
    ///
    /// Components of the variant's ink mask are filtered by the size and
    /// shape bounds in `limits`, ranked by descending area (ties broken by
    /// position) and truncated to `limits.max_regions`. Never fails; a
    /// variant without plausible regions yields an empty list.
    pub fn propose(variant: &PreprocessedVariant, limits: &RegionLimits) -> Vec<CandidateRegion> {
        let plane = &variant.plane;
        if plane.is_empty() {
            return Vec::new();
        }

        let mask = variant.ink_mask(limits.merge_gap);
        let mut rects: Vec<Rect> = find_ink_components(&mask)
            .into_iter()
            .filter(|rect| within_bounds(rect, plane.width(), plane.height(), limits))
            .collect();

        rects.sort_by_key(|r| (Reverse(r.area()), r.y, r.x, r.width));
        rects.truncate(limits.max_regions);

        trace!(
            variant = variant.name(),
            regions = rects.len(),
            "proposed regions"
        );

        rects
            .into_iter()
            .map(|rect| CandidateRegion {
                rect,
                pixels: plane.crop(&rect),
            })
            .collect()
    }
}

/// Shorthand for [`RegionProposer::propose`]
pub fn propose_regions(
    variant: &PreprocessedVariant,
    limits: &RegionLimits,
) -> Vec<CandidateRegion> {
    RegionProposer::propose(variant, limits)
}

/// True when `rect` is barcode-shaped and sized for a `width` x `height`
/// variant.
pub fn within_bounds(rect: &Rect, width: usize, height: usize, limits: &RegionLimits) -> bool {
    let (w, h) = (rect.width as f32, rect.height as f32);
    let area = rect.area();
    let frame_area = (width * height) as f32;

    w > limits.min_aspect * h
        && rect.width >= limits.min_width
        && rect.height >= limits.min_height
        && area > limits.min_area
        && (area as f32) < limits.max_area_fraction * frame_area
        && w <= limits.max_width_fraction * width as f32
        && h <= limits.max_height_fraction * height as f32
}
