/// Grayscale conversion for 3-channel frames
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
///
/// Rows are converted in parallel with rayon; output is identical to a
/// sequential pass.
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert one interleaved 3-channel buffer; `order` gives the byte offsets
/// of R, G and B inside each pixel.
fn convert_rows(src: &[u8], width: usize, height: usize, order: [usize; 3]) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * 3;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * 3;
            *out = luma(src[idx + order[0]], src[idx + order[1]], src[idx + order[2]]);
        }
    });

    gray
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_rows(rgb, width, height, [0, 1, 2])
}

/// Convert BGR image (OpenCV / camera order) to grayscale
pub fn bgr_to_grayscale(bgr: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert_rows(bgr, width, height, [2, 1, 0])
}

/// Unweighted channel mean; channel order does not matter
pub fn channel_mean(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    src.chunks_exact(3)
        .take(width * height)
        .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let white = vec![255, 255, 255];
        let gray = rgb_to_grayscale(&white, 1, 1);
        assert!(gray[0] >= 254);

        // Pure black
        let black = vec![0, 0, 0];
        let gray = rgb_to_grayscale(&black, 1, 1);
        assert_eq!(gray[0], 0);

        // Pure red
        let red = vec![255, 0, 0];
        let gray = rgb_to_grayscale(&red, 1, 1);
        assert!(gray[0] < 255);
        assert!(gray[0] > 0);

        // Pure green
        let green = vec![0, 255, 0];
        let gray = rgb_to_grayscale(&green, 1, 1);
        assert!(gray[0] > 100);

        // 2x2 image
        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray.len(), 4);
    }

    #[test]
    fn test_bgr_swaps_red_and_blue() {
        let blue_in_bgr = vec![255, 0, 0];
        let blue_in_rgb = vec![0, 0, 255];
        assert_eq!(
            bgr_to_grayscale(&blue_in_bgr, 1, 1),
            rgb_to_grayscale(&blue_in_rgb, 1, 1)
        );
    }

    #[test]
    fn test_zero_width() {
        assert!(rgb_to_grayscale(&[], 0, 5).is_empty());
    }

    #[test]
    fn test_channel_mean() {
        assert_eq!(channel_mean(&[0, 3, 6, 255, 255, 255], 2, 1), vec![3, 255]);
    }
}
