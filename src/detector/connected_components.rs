/// Connected components over an ink mask.
/// Labels 8-connected ink pixels and reports one bounding box per component.
use crate::models::{BitMatrix, Rect};
use std::collections::HashMap;

/// Union-Find data structure
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            self.parent[root_x as usize] = root_y;
        }
    }
}

/// Find connected ink components and return their bounding boxes.
///
/// Output order is unspecified; callers rank the boxes themselves.
pub fn find_ink_components(mask: &BitMatrix) -> Vec<Rect> {
    let width = mask.width();
    let height = mask.height();

    let mut labels = vec![0u32; width * height];
    // Label 0 is background, so at most one label per pixel plus one
    let mut uf = UnionFind::new(width * height + 1);
    let mut next_label = 1u32;

    // First pass: provisional labels
    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) {
                continue;
            }

            let idx = y * width + x;
            let mut neighbors = [0u32; 4];
            let mut count = 0;

            // Left and above (4-connectivity)
            if x > 0 && mask.get(x - 1, y) {
                neighbors[count] = labels[idx - 1];
                count += 1;
            }
            if y > 0 && mask.get(x, y - 1) {
                neighbors[count] = labels[idx - width];
                count += 1;
            }
            // Upper diagonals (8-connectivity)
            if x > 0 && y > 0 && mask.get(x - 1, y - 1) {
                neighbors[count] = labels[idx - width - 1];
                count += 1;
            }
            if x + 1 < width && y > 0 && mask.get(x + 1, y - 1) {
                neighbors[count] = labels[idx - width + 1];
                count += 1;
            }

            let neighbors = &neighbors[..count];
            match neighbors.iter().min() {
                None => {
                    labels[idx] = next_label;
                    next_label += 1;
                }
                Some(&min_label) => {
                    labels[idx] = min_label;
                    for &l in neighbors {
                        if l != min_label {
                            uf.union(min_label, l);
                        }
                    }
                }
            }
        }
    }

    // Second pass: bounding boxes per root label
    let mut bboxes: HashMap<u32, (usize, usize, usize, usize)> = HashMap::new();
    for y in 0..height {
        for x in 0..width {
            let label = labels[y * width + x];
            if label == 0 {
                continue;
            }
            let root = uf.find(label);

            let entry = bboxes.entry(root).or_insert((x, y, x, y));
            entry.0 = entry.0.min(x);
            entry.1 = entry.1.min(y);
            entry.2 = entry.2.max(x);
            entry.3 = entry.3.max(y);
        }
    }

    bboxes
        .into_values()
        .map(|(min_x, min_y, max_x, max_y)| Rect::from_corners(min_x, min_y, max_x, max_y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_square() {
        let mut matrix = BitMatrix::new(10, 10);
        // 2x2 square at (2,2)
        matrix.set(2, 2, true);
        matrix.set(3, 2, true);
        matrix.set(2, 3, true);
        matrix.set(3, 3, true);

        let regions = find_ink_components(&matrix);
        assert_eq!(regions, vec![Rect::new(2, 2, 2, 2)]);
    }

    #[test]
    fn test_diagonal_pixels_join() {
        let matrix = BitMatrix::from_fn(6, 6, |x, y| x == y);
        let regions = find_ink_components(&matrix);
        assert_eq!(regions, vec![Rect::new(0, 0, 6, 6)]);
    }

    #[test]
    fn test_u_shape_merges_labels() {
        // Two arms that only meet on the bottom row
        let matrix = BitMatrix::from_fn(5, 4, |x, y| x == 0 || x == 4 || y == 3);
        assert_eq!(find_ink_components(&matrix).len(), 1);
    }

    #[test]
    fn test_separate_components() {
        let matrix = BitMatrix::from_fn(10, 3, |x, _| x < 2 || x > 6);
        let mut regions = find_ink_components(&matrix);
        regions.sort_by_key(|r| r.x);
        assert_eq!(regions, vec![Rect::new(0, 0, 2, 3), Rect::new(7, 0, 3, 3)]);
    }

    #[test]
    fn test_empty_mask() {
        assert!(find_ink_components(&BitMatrix::new(4, 4)).is_empty());
        assert!(find_ink_components(&BitMatrix::default()).is_empty());
    }
}
