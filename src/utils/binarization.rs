use crate::models::{BitMatrix, GrayPlane};

/// Calculate Otsu's optimal threshold.
///
/// Pixels strictly below the returned level form the dark class. A
/// single-valued histogram has no split and yields 128.
pub fn otsu_level(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0.0f64;
    let mut class1_sum = 0.0f64;

    // Level t puts intensities 0..t into class 1
    for threshold in 1..=255usize {
        let count = histogram[threshold - 1] as f64;
        class1_pixels += count;
        class1_sum += (threshold - 1) as f64 * count;

        let class2_pixels = total_pixels - class1_pixels;
        if class1_pixels == 0.0 || class2_pixels == 0.0 {
            continue;
        }

        let class1_mean = class1_sum / class1_pixels;
        let class2_mean = (total_sum - class1_sum) / class2_pixels;

        let weight1 = class1_pixels / total_pixels;
        let weight2 = class2_pixels / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Global binary threshold: pixels above `level` become 255, the rest 0
pub fn threshold_plane(plane: &GrayPlane, level: u8) -> GrayPlane {
    plane.map(|p| if p > level { 255 } else { 0 })
}

/// Summed-area table with one row/column of zero padding
fn integral_image(plane: &GrayPlane) -> Vec<u64> {
    let (w, h) = (plane.width(), plane.height());
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += plane.get(x, y) as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}

/// Local-mean adaptive threshold.
///
/// A pixel becomes 255 when it is brighter than the mean of its
/// `block` x `block` neighbourhood minus `offset`, otherwise 0. The
/// neighbourhood is clipped at the borders.
pub fn adaptive_threshold_plane(plane: &GrayPlane, block: usize, offset: i32) -> GrayPlane {
    let (w, h) = (plane.width(), plane.height());
    if plane.is_empty() {
        return plane.clone();
    }
    let radius = (block.max(1) / 2) as isize;
    let integral = integral_image(plane);
    let stride = w + 1;

    let mut out = Vec::with_capacity(w * h);
    for y in 0..h {
        let y0 = (y as isize - radius).max(0) as usize;
        let y1 = ((y as isize + radius) as usize).min(h - 1) + 1;
        for x in 0..w {
            let x0 = (x as isize - radius).max(0) as usize;
            let x1 = ((x as isize + radius) as usize).min(w - 1) + 1;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((x1 - x0) * (y1 - y0)) as i64;
            let mean = sum as i64 / count;
            let value = plane.get(x, y) as i64;
            out.push(if value > mean - offset as i64 { 255 } else { 0 });
        }
    }
    GrayPlane::from_raw(w, h, out).unwrap_or_default()
}

/// Ink mask from Otsu's level: true where the pixel is in the dark class
pub fn otsu_mask(plane: &GrayPlane) -> BitMatrix {
    let level = otsu_level(plane.as_bytes());
    BitMatrix::from_fn(plane.width(), plane.height(), |x, y| plane.get(x, y) < level)
}

/// Ink mask from an arbitrary per-pixel predicate
pub fn mask_where(plane: &GrayPlane, is_ink: impl Fn(u8) -> bool) -> BitMatrix {
    BitMatrix::from_fn(plane.width(), plane.height(), |x, y| is_ink(plane.get(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_plane() {
        let gray = GrayPlane::from_raw(2, 2, vec![100, 150, 200, 50]).unwrap();
        let binary = threshold_plane(&gray, 127);
        assert_eq!(binary.as_bytes(), &[0, 255, 255, 0]);
    }

    #[test]
    fn test_otsu_mask() {
        // Create a simple two-class image
        let mut gray = vec![50u8; 50]; // Dark class
        gray.extend(vec![200u8; 50]); // Light class
        let plane = GrayPlane::from_raw(10, 10, gray).unwrap();

        let mask = otsu_mask(&plane);

        // Top half dark (ink), bottom half light
        assert!(mask.get(0, 0));
        assert!(!mask.get(0, 7));
        assert_eq!(mask.count_ones(), 50);
    }

    #[test]
    fn test_otsu_uniform_image_has_no_ink_when_bright() {
        let plane = GrayPlane::filled(8, 8, 255);
        assert_eq!(otsu_level(plane.as_bytes()), 128);
        assert_eq!(otsu_mask(&plane).count_ones(), 0);
    }

    #[test]
    fn test_adaptive_threshold_uniform_is_white() {
        let plane = GrayPlane::filled(16, 16, 90);
        let out = adaptive_threshold_plane(&plane, 11, 2);
        assert!(out.as_bytes().iter().all(|&p| p == 255));
    }

    #[test]
    fn test_adaptive_threshold_marks_thin_dark_line() {
        let plane = GrayPlane::from_raw(9, 1, vec![200, 200, 200, 200, 20, 200, 200, 200, 200])
            .unwrap();
        let out = adaptive_threshold_plane(&plane, 5, 2);
        assert_eq!(out.get(4, 0), 0);
        assert_eq!(out.get(0, 0), 255);
    }
}
