//! Frame preprocessing.
//!
//! One frame fans out into an ordered list of single-channel variants. Both
//! the library adapter and the region proposer walk the list in order, so
//! the order is part of the contract: `raw`, `gray`, `threshold`,
//! `adaptive_threshold`, `blurred`, `opened`, `edges`, `equalized`.

use crate::decoder::config::PreprocessConfig;
use crate::models::{BitMatrix, Frame, GrayPlane};
use crate::utils::binarization::{adaptive_threshold_plane, mask_where, otsu_mask, threshold_plane};
use crate::utils::filters::{
    close3, equalize_histogram, gaussian_blur3, open3, scale_contrast, sobel_edges,
};

/// Named transform that produced a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Raw,
    Gray,
    Threshold,
    AdaptiveThreshold,
    Blurred,
    Opened,
    Edges,
    Equalized,
    /// Linear contrast stretch (enhanced pass)
    Contrast,
    /// Open then close of the adaptive threshold (enhanced pass)
    Cleaned,
    /// Equalised then blurred (enhanced pass)
    Enhanced,
}

impl VariantKind {
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::Raw => "raw",
            VariantKind::Gray => "gray",
            VariantKind::Threshold => "threshold",
            VariantKind::AdaptiveThreshold => "adaptive_threshold",
            VariantKind::Blurred => "blurred",
            VariantKind::Opened => "opened",
            VariantKind::Edges => "edges",
            VariantKind::Equalized => "equalized",
            VariantKind::Contrast => "contrast",
            VariantKind::Cleaned => "cleaned",
            VariantKind::Enhanced => "enhanced",
        }
    }

    /// Variants whose pixels are only 0 or 255 with dark = ink
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            VariantKind::Threshold | VariantKind::AdaptiveThreshold | VariantKind::Cleaned
        )
    }
}

/// One transformed view of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedVariant {
    pub kind: VariantKind,
    pub plane: GrayPlane,
}

impl PreprocessedVariant {
    pub fn new(kind: VariantKind, plane: GrayPlane) -> Self {
        Self { kind, plane }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Foreground mask used for region proposal.
    ///
    /// Binary variants mark 0 as ink, the edge map marks any non-zero
    /// response, everything else splits at its Otsu level. Horizontal gaps of
    /// at most `merge_gap` pixels are then closed so neighbouring bars fuse.
    pub fn ink_mask(&self, merge_gap: usize) -> BitMatrix {
        let mut mask = match self.kind {
            kind if kind.is_binary() => mask_where(&self.plane, |p| p == 0),
            VariantKind::Edges => mask_where(&self.plane, |p| p > 0),
            _ => otsu_mask(&self.plane),
        };
        mask.close_horizontal(merge_gap);
        mask
    }
}

/// Produce the ordered variant list for `frame`.
///
/// Without the image toolkit only `raw` is returned. An empty frame yields
/// an empty list.
pub fn preprocess(
    frame: &Frame<'_>,
    toolkit_available: bool,
    config: &PreprocessConfig,
) -> Vec<PreprocessedVariant> {
    if frame.is_empty() {
        return Vec::new();
    }

    let raw = PreprocessedVariant::new(VariantKind::Raw, frame.raw_plane());
    if !toolkit_available {
        return vec![raw];
    }

    let gray = frame.luma_plane();
    let threshold = threshold_plane(&gray, config.fixed_threshold);
    let adaptive =
        adaptive_threshold_plane(&gray, config.adaptive_block, config.adaptive_offset);
    let blurred = gaussian_blur3(&gray);
    let opened = open3(&gray);
    let edges = sobel_edges(&gray, config.edge_threshold);
    let equalized = equalize_histogram(&gray);

    vec![
        raw,
        PreprocessedVariant::new(VariantKind::Gray, gray),
        PreprocessedVariant::new(VariantKind::Threshold, threshold),
        PreprocessedVariant::new(VariantKind::AdaptiveThreshold, adaptive),
        PreprocessedVariant::new(VariantKind::Blurred, blurred),
        PreprocessedVariant::new(VariantKind::Opened, opened),
        PreprocessedVariant::new(VariantKind::Edges, edges),
        PreprocessedVariant::new(VariantKind::Equalized, equalized),
    ]
}

/// Heavier variants for the QR retry pass: `contrast`, `enhanced`,
/// `adaptive_threshold`, `cleaned`.
pub fn preprocess_enhanced(
    frame: &Frame<'_>,
    config: &PreprocessConfig,
) -> Vec<PreprocessedVariant> {
    if frame.is_empty() {
        return Vec::new();
    }

    let gray = frame.luma_plane();
    let contrast = scale_contrast(&gray, config.contrast_alpha, config.contrast_beta);
    let enhanced = gaussian_blur3(&equalize_histogram(&gray));
    let adaptive =
        adaptive_threshold_plane(&gray, config.adaptive_block, config.adaptive_offset);
    let cleaned = close3(&open3(&adaptive));

    vec![
        PreprocessedVariant::new(VariantKind::Contrast, contrast),
        PreprocessedVariant::new(VariantKind::Enhanced, enhanced),
        PreprocessedVariant::new(VariantKind::AdaptiveThreshold, adaptive),
        PreprocessedVariant::new(VariantKind::Cleaned, cleaned),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame() -> Vec<u8> {
        (0..40 * 20).map(|i| ((i % 40) * 6) as u8).collect()
    }

    #[test]
    fn test_variant_order() {
        let data = gradient_frame();
        let frame = Frame::gray(&data, 40, 20).unwrap();
        let names: Vec<_> = preprocess(&frame, true, &PreprocessConfig::default())
            .iter()
            .map(|v| v.name())
            .collect();
        assert_eq!(
            names,
            [
                "raw",
                "gray",
                "threshold",
                "adaptive_threshold",
                "blurred",
                "opened",
                "edges",
                "equalized"
            ]
        );
    }

    #[test]
    fn test_without_toolkit_only_raw() {
        let data = gradient_frame();
        let frame = Frame::gray(&data, 40, 20).unwrap();
        let variants = preprocess(&frame, false, &PreprocessConfig::default());
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].kind, VariantKind::Raw);
        assert_eq!(variants[0].plane.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let data: Vec<u8> = (0..30 * 10 * 3).map(|i| (i * 37 % 251) as u8).collect();
        let frame = Frame::bgr(&data, 30, 10).unwrap();
        let config = PreprocessConfig::default();
        assert_eq!(preprocess(&frame, true, &config), preprocess(&frame, true, &config));
        assert_eq!(
            preprocess_enhanced(&frame, &config),
            preprocess_enhanced(&frame, &config)
        );
    }

    #[test]
    fn test_variants_keep_frame_size() {
        let data = gradient_frame();
        let frame = Frame::gray(&data, 40, 20).unwrap();
        for variant in preprocess(&frame, true, &PreprocessConfig::default()) {
            assert_eq!(variant.plane.width(), 40, "{}", variant.name());
            assert_eq!(variant.plane.height(), 20, "{}", variant.name());
        }
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::gray(&[], 0, 0).unwrap();
        assert!(preprocess(&frame, true, &PreprocessConfig::default()).is_empty());
    }

    #[test]
    fn test_threshold_ink_is_dark() {
        let plane = GrayPlane::from_raw(4, 1, vec![0, 255, 255, 0]).unwrap();
        let variant = PreprocessedVariant::new(VariantKind::Threshold, plane);
        let mask = variant.ink_mask(0);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(3, 0));
    }
}
