use super::GrayPlane;

/// Axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning inclusive corner coordinates
    pub fn from_corners(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x) + 1,
            height: max_y.saturating_sub(min_y) + 1,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// width / height
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// A proposed code region inside one preprocessed variant
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    /// Bounding box within the variant
    pub rect: Rect,
    /// Variant pixels inside `rect`
    pub pixels: GrayPlane,
}

impl CandidateRegion {
    pub fn area(&self) -> usize {
        self.rect.area()
    }
}
