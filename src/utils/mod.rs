//! Utility functions for image processing
//!
//! This module provides the pixel-level building blocks of the engine:
//! - Grayscale conversion (RGB/BGR to luminance)
//! - Binarization (Otsu, global and adaptive thresholds, ink masks)
//! - Neighbourhood filters (blur, morphology, edges, equalisation)
//! - Statistics (mean/std, row and column profiles)
//! - Stable hashing for fallback code synthesis

pub mod binarization;
pub mod filters;
pub mod grayscale;
pub mod hash;
pub mod stats;
