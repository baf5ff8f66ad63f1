/// Compact bit matrix used as an ink mask (true = ink / foreground)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an empty mask with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Build a mask by evaluating `f` at every pixel
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-bounds reads are background
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Fuse set runs on each row that are separated by at most `max_gap`
    /// clear pixels (a one-dimensional horizontal closing).
    pub fn close_horizontal(&mut self, max_gap: usize) {
        if max_gap == 0 {
            return;
        }
        for y in 0..self.height {
            let mut last_ink: Option<usize> = None;
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                if let Some(prev) = last_ink {
                    let gap = x - prev - 1;
                    if gap > 0 && gap <= max_gap {
                        for fill in prev + 1..x {
                            self.set(fill, y, true);
                        }
                    }
                }
                last_ink = Some(x);
            }
        }
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(8, 8);
        assert_eq!(matrix.width(), 8);
        assert_eq!(matrix.height(), 8);

        matrix.set(3, 4, true);
        assert!(matrix.get(3, 4));
        assert!(!matrix.get(3, 3));
        assert_eq!(matrix.count_ones(), 1);

        matrix.set(3, 4, false);
        assert!(!matrix.get(3, 4));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::new(8, 8);
        matrix.set(10, 10, true); // Should not panic
        assert!(!matrix.get(10, 10));
    }

    #[test]
    fn test_close_horizontal_fills_short_gaps_only() {
        let mut matrix = BitMatrix::from_fn(20, 1, |x, _| x == 0 || x == 3 || x == 15);
        matrix.close_horizontal(3);

        // 0..=3 fused, 3..15 gap of 11 stays open
        assert!((0..=3).all(|x| matrix.get(x, 0)));
        assert!(!matrix.get(8, 0));
        assert!(matrix.get(15, 0));
    }

    #[test]
    fn test_close_horizontal_keeps_edges_open() {
        let mut matrix = BitMatrix::from_fn(10, 1, |x, _| x == 5);
        matrix.close_horizontal(4);
        assert_eq!(matrix.count_ones(), 1);
    }
}
