//! Neighbourhood filters used by the preprocessing stage.
//!
//! All filters clamp at the borders and return a new plane of the same size.

use crate::models::GrayPlane;
use rayon::prelude::*;

/// Apply a 3x3 neighbourhood reduction to every pixel, rows in parallel
fn map_3x3(plane: &GrayPlane, reduce: impl Fn([u8; 9]) -> u8 + Sync) -> GrayPlane {
    let (w, h) = (plane.width(), plane.height());
    let mut out = vec![0u8; w * h];
    if w == 0 {
        return plane.clone();
    }

    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        let y = y as isize;
        for (x, px) in row.iter_mut().enumerate() {
            let x = x as isize;
            let mut window = [0u8; 9];
            let mut i = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    window[i] = plane.get_clamped(x + dx, y + dy);
                    i += 1;
                }
            }
            *px = reduce(window);
        }
    });

    GrayPlane::from_raw(w, h, out).unwrap_or_default()
}

/// 3x3 Gaussian blur with the [1 2 1] binomial kernel
pub fn gaussian_blur3(plane: &GrayPlane) -> GrayPlane {
    const KERNEL: [u32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];
    map_3x3(plane, |win| {
        let sum: u32 = win.iter().zip(KERNEL).map(|(&p, k)| p as u32 * k).sum();
        ((sum + 8) / 16) as u8
    })
}

/// 3x3 grayscale erosion (minimum)
pub fn erode3(plane: &GrayPlane) -> GrayPlane {
    map_3x3(plane, |win| win.into_iter().min().unwrap_or(0))
}

/// 3x3 grayscale dilation (maximum)
pub fn dilate3(plane: &GrayPlane) -> GrayPlane {
    map_3x3(plane, |win| win.into_iter().max().unwrap_or(0))
}

/// Morphological opening: erosion then dilation
pub fn open3(plane: &GrayPlane) -> GrayPlane {
    dilate3(&erode3(plane))
}

/// Morphological closing: dilation then erosion
pub fn close3(plane: &GrayPlane) -> GrayPlane {
    erode3(&dilate3(plane))
}

/// Sobel gradient magnitude thresholded to a binary edge map (edge = 255)
pub fn sobel_edges(plane: &GrayPlane, magnitude_threshold: u32) -> GrayPlane {
    map_3x3(plane, |w| {
        let p = w.map(|v| v as i32);
        let gx = (p[2] + 2 * p[5] + p[8]) - (p[0] + 2 * p[3] + p[6]);
        let gy = (p[6] + 2 * p[7] + p[8]) - (p[0] + 2 * p[1] + p[2]);
        let magnitude = gx.unsigned_abs() + gy.unsigned_abs();
        if magnitude >= magnitude_threshold {
            255
        } else {
            0
        }
    })
}

/// Global histogram equalisation
pub fn equalize_histogram(plane: &GrayPlane) -> GrayPlane {
    let total = plane.area() as u64;
    if total == 0 {
        return plane.clone();
    }

    let mut histogram = [0u64; 256];
    for &p in plane.as_bytes() {
        histogram[p as usize] += 1;
    }

    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (i, &count) in histogram.iter().enumerate() {
        running += count;
        cdf[i] = running;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    if total == cdf_min {
        // Single intensity: nothing to stretch
        return plane.clone();
    }

    let span = total - cdf_min;
    let mut lut = [0u8; 256];
    for (i, value) in lut.iter_mut().enumerate() {
        let scaled = (cdf[i].saturating_sub(cdf_min) * 255 + span / 2) / span;
        *value = scaled.min(255) as u8;
    }
    plane.map(|p| lut[p as usize])
}

/// Linear contrast scaling `alpha * p + beta`, saturating to 0..=255
pub fn scale_contrast(plane: &GrayPlane, alpha: f32, beta: f32) -> GrayPlane {
    plane.map(|p| (p as f32 * alpha + beta).round().clamp(0.0, 255.0) as u8)
}
