//! Synthetic grayscale frames for tests, benches and demos.
//!
//! Everything here is deterministic: random content comes from a seeded
//! `StdRng`.

use crate::models::{GrayPlane, OwnedFrame};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default element widths in modules, bar first. Varied widths, no three
/// equal neighbours.
pub const DEFAULT_MODULES: [u32; 31] = [
    2, 1, 1, 3, 1, 2, 2, 1, 3, 1, 1, 2, 4, 1, 2, 3, 1, 1, 2, 1, 3, 2, 1, 1, 2, 1, 4, 2, 1, 2, 1,
];

/// A printed 1-D bar pattern on a white frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeSpec {
    /// Element widths in modules, starting with a bar
    pub modules: Vec<u32>,
    /// Pixels per module
    pub module_px: usize,
    pub bar_height: usize,
    pub frame_width: usize,
    pub frame_height: usize,
}

impl Default for BarcodeSpec {
    fn default() -> Self {
        Self {
            modules: DEFAULT_MODULES.to_vec(),
            module_px: 3,
            bar_height: 50,
            frame_width: 320,
            frame_height: 240,
        }
    }
}

impl BarcodeSpec {
    /// Width of the bar pattern in pixels
    pub fn symbol_width(&self) -> usize {
        self.modules.iter().map(|&m| m as usize).sum::<usize>() * self.module_px
    }

    /// Render black bars centred on a white frame
    pub fn render(&self) -> OwnedFrame {
        let (w, h) = (self.frame_width, self.frame_height);
        let mut data = vec![255u8; w * h];

        let x0 = w.saturating_sub(self.symbol_width()) / 2;
        let y0 = h.saturating_sub(self.bar_height) / 2;
        let mut x = x0;
        for (i, &modules) in self.modules.iter().enumerate() {
            let run = modules as usize * self.module_px;
            if i % 2 == 0 {
                for y in y0..(y0 + self.bar_height).min(h) {
                    let row = &mut data[y * w..(y + 1) * w];
                    for px in row.iter_mut().take((x + run).min(w)).skip(x) {
                        *px = 0;
                    }
                }
            }
            x += run;
        }

        frame_from(w, h, data)
    }
}

/// The default synthetic barcode
pub fn barcode_frame() -> OwnedFrame {
    BarcodeSpec::default().render()
}

/// Uniform frame
pub fn blank_frame(width: usize, height: usize, value: u8) -> OwnedFrame {
    OwnedFrame::from_plane(GrayPlane::filled(width, height, value))
}

/// Uniform random pixels
pub fn noise_frame(width: usize, height: usize, seed: u64) -> OwnedFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height).map(|_| rng.r#gen::<u8>()).collect();
    frame_from(width, height, data)
}

/// Thin random line segments on white
pub fn line_segments_frame(width: usize, height: usize, count: usize, seed: u64) -> OwnedFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![255u8; width * height];
    if width == 0 || height == 0 {
        return frame_from(width, height, data);
    }

    for _ in 0..count {
        let from = (
            rng.gen_range(0..width) as isize,
            rng.gen_range(0..height) as isize,
        );
        let to = (
            rng.gen_range(0..width) as isize,
            rng.gen_range(0..height) as isize,
        );
        draw_line(&mut data, width, from, to);
    }
    frame_from(width, height, data)
}

/// Bresenham line, 1 px wide
fn draw_line(data: &mut [u8], width: usize, from: (isize, isize), to: (isize, isize)) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        data[y as usize * width + x as usize] = 0;
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

const GLYPH_ROWS: usize = 7;
const GLYPH_COLS: usize = 5;

/// 5x7 bitmap rows, most significant of the low five bits on the left
fn glyph(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Black block-letter text centred on white.
///
/// Supports the letters `A C E I L N O R S T`; anything else renders as a
/// blank cell. Each glyph cell is `scale` pixels per font pixel with one
/// blank column between glyphs.
pub fn text_frame(text: &str, width: usize, height: usize, scale: usize) -> OwnedFrame {
    let mut data = vec![255u8; width * height];
    let cell = (GLYPH_COLS + 1) * scale;
    let chars: Vec<char> = text.chars().collect();
    let text_width = (chars.len() * cell).saturating_sub(scale);
    let x0 = width.saturating_sub(text_width) / 2;
    let y0 = height.saturating_sub(GLYPH_ROWS * scale) / 2;

    for (i, &c) in chars.iter().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        for (gy, &bits) in rows.iter().enumerate() {
            for gx in 0..GLYPH_COLS {
                if bits >> (GLYPH_COLS - 1 - gx) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = x0 + i * cell + gx * scale + dx;
                        let y = y0 + gy * scale + dy;
                        if x < width && y < height {
                            data[y * width + x] = 0;
                        }
                    }
                }
            }
        }
    }
    frame_from(width, height, data)
}

fn frame_from(width: usize, height: usize, data: Vec<u8>) -> OwnedFrame {
    OwnedFrame::from_plane(GrayPlane::from_raw(width, height, data).unwrap_or_default())
}
