use super::Rect;

/// Single-channel 8-bit image stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GrayPlane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayPlane {
    /// Wrap an existing buffer. Returns `None` when the length does not
    /// match `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height) != Some(data.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Plane filled with a constant value. Dimensions whose area overflows
    /// `usize` give an empty plane.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        match width.checked_mul(height) {
            Some(area) => Self {
                width,
                height,
                data: vec![value; area],
            },
            None => Self::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel count
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y). Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Pixel at (x, y) with coordinates clamped into the plane
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.width + cx]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Copy of the pixels inside `rect`, clipped to the plane
    pub fn crop(&self, rect: &Rect) -> GrayPlane {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = (rect.x + rect.width).min(self.width);
        let y1 = (rect.y + rect.height).min(self.height);
        let (w, h) = (x1 - x0, y1 - y0);

        let mut data = Vec::with_capacity(w * h);
        for y in y0..y1 {
            data.extend_from_slice(&self.row(y)[x0..x1]);
        }
        GrayPlane {
            width: w,
            height: h,
            data,
        }
    }

    /// New plane with `f` applied to every pixel
    pub fn map(&self, f: impl Fn(u8) -> u8) -> GrayPlane {
        GrayPlane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&p| f(p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(GrayPlane::from_raw(2, 2, vec![0; 4]).is_some());
        assert!(GrayPlane::from_raw(2, 2, vec![0; 3]).is_none());
        assert!(GrayPlane::from_raw(usize::MAX, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_filled_with_overflowing_area_is_empty() {
        let plane = GrayPlane::filled(usize::MAX, 3, 9);
        assert!(plane.is_empty());
        assert_eq!(GrayPlane::filled(3, 2, 9).as_bytes(), &[9; 6]);
    }

    #[test]
    fn test_crop_clips_to_bounds() {
        let data: Vec<u8> = (0..16).collect();
        let plane = GrayPlane::from_raw(4, 4, data).unwrap();
        let crop = plane.crop(&Rect::new(2, 1, 5, 2));
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.as_bytes(), &[6, 7, 10, 11]);
    }

    #[test]
    fn test_get_clamped() {
        let plane = GrayPlane::from_raw(2, 1, vec![10, 20]).unwrap();
        assert_eq!(plane.get_clamped(-3, 0), 10);
        assert_eq!(plane.get_clamped(9, 4), 20);
    }
}
