//! Adapter around certified symbol decoder backends.
//!
//! Backends sit behind [`SymbolDecoder`]. Every call goes through
//! [`decode_guarded`], so a backend that errors or panics only costs the
//! variant it was given.

use super::plausibility::Plausibility;
use crate::error::DecodeError;
use crate::models::{DetectionCandidate, DetectionSource, Frame, GrayPlane};
use crate::preprocess::{PreprocessedVariant, VariantKind};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;
use tracing::debug;

/// A backend that turns a grayscale image into zero or more payloads
pub trait SymbolDecoder: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Decode every symbol found in `plane`, in backend order
    fn decode(&self, plane: &GrayPlane) -> Result<Vec<String>, DecodeError>;
}

/// QR decoding through `rqrr`
#[cfg(feature = "rqrr")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

#[cfg(feature = "rqrr")]
impl RqrrDecoder {
    fn decode_grids(
        plane: &GrayPlane,
        pixel: impl Fn(u8) -> u8,
    ) -> (Vec<String>, Option<DecodeError>) {
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(plane.width(), plane.height(), |x, y| {
                pixel(plane.get(x, y))
            });

        let mut payloads = Vec::new();
        let mut last_error = None;
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => payloads.push(content),
                Err(e) => {
                    last_error = Some(DecodeError::Backend {
                        backend: "rqrr",
                        message: e.to_string(),
                    })
                }
            }
        }
        (payloads, last_error)
    }
}

#[cfg(feature = "rqrr")]
impl SymbolDecoder for RqrrDecoder {
    fn name(&self) -> &'static str {
        "rqrr"
    }

    fn decode(&self, plane: &GrayPlane) -> Result<Vec<String>, DecodeError> {
        if plane.is_empty() {
            return Ok(Vec::new());
        }

        let (payloads, error) = Self::decode_grids(plane, |p| p);
        if !payloads.is_empty() {
            return Ok(payloads);
        }

        // Light-on-dark symbols
        let (payloads, inverted_error) = Self::decode_grids(plane, |p| 255 - p);
        if !payloads.is_empty() {
            return Ok(payloads);
        }

        match inverted_error.or(error) {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }
}

/// The backend compiled into this build, if any
pub fn default_decoder() -> Option<Box<dyn SymbolDecoder>> {
    #[cfg(feature = "rqrr")]
    {
        Some(Box::new(RqrrDecoder))
    }
    #[cfg(not(feature = "rqrr"))]
    {
        None
    }
}

/// Run `decoder` with panics converted into [`DecodeError::Panicked`]
pub fn decode_guarded(
    decoder: &dyn SymbolDecoder,
    plane: &GrayPlane,
) -> Result<Vec<String>, DecodeError> {
    catch_unwind(AssertUnwindSafe(|| decoder.decode(plane)))
        .unwrap_or_else(|_| Err(DecodeError::Panicked(decoder.name())))
}

/// Try the backend on the raw frame, then on every preprocessed variant.
///
/// Returns the first payload that passes the plausibility rules. Backend
/// failures are logged and treated as "nothing on this variant".
pub fn try_library_decode(
    decoder: &dyn SymbolDecoder,
    frame: &Frame<'_>,
    variants: &[PreprocessedVariant],
    plausibility: &Plausibility<'_>,
    now: Instant,
) -> Option<DetectionCandidate> {
    if frame.is_empty() {
        return None;
    }

    let raw = match variants.first() {
        Some(first) if first.kind == VariantKind::Raw => {
            decode_plane(decoder, VariantKind::Raw.name(), &first.plane, plausibility, now)
        }
        _ => decode_plane(
            decoder,
            VariantKind::Raw.name(),
            &frame.raw_plane(),
            plausibility,
            now,
        ),
    };
    if raw.is_some() {
        return raw;
    }

    variants
        .iter()
        .filter(|v| v.kind != VariantKind::Raw)
        .find_map(|v| decode_plane(decoder, v.name(), &v.plane, plausibility, now))
}

/// Try the backend on each variant in order, without a raw pass
pub fn try_variants(
    decoder: &dyn SymbolDecoder,
    variants: &[PreprocessedVariant],
    plausibility: &Plausibility<'_>,
    now: Instant,
) -> Option<DetectionCandidate> {
    variants
        .iter()
        .find_map(|v| decode_plane(decoder, v.name(), &v.plane, plausibility, now))
}

fn decode_plane(
    decoder: &dyn SymbolDecoder,
    variant: &'static str,
    plane: &GrayPlane,
    plausibility: &Plausibility<'_>,
    now: Instant,
) -> Option<DetectionCandidate> {
    let payloads = match decode_guarded(decoder, plane) {
        Ok(payloads) => payloads,
        Err(e) => {
            debug!(variant, "library decode failed: {e}");
            return None;
        }
    };

    for payload in payloads {
        let payload = payload.trim();
        if plausibility.check(payload, DetectionSource::Library) {
            debug!(variant, backend = decoder.name(), "library decode accepted");
            return Some(DetectionCandidate::new(
                payload,
                DetectionSource::Library,
                variant,
                now,
            ));
        }
        debug!(variant, "implausible library payload dropped");
    }
    None
}
