//! Summary statistics over planes and profiles.

use crate::models::GrayPlane;

/// Mean and population standard deviation of a sample
pub fn mean_std(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let mut n = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for v in values {
        n += 1;
        sum += v;
        sum_sq += v * v;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Mean and standard deviation of all pixel intensities
pub fn plane_mean_std(plane: &GrayPlane) -> (f64, f64) {
    mean_std(plane.as_bytes().iter().map(|&p| p as f64))
}

/// Sum of every column (profile along the horizontal axis)
pub fn column_sums(plane: &GrayPlane) -> Vec<f64> {
    let mut sums = vec![0.0; plane.width()];
    for y in 0..plane.height() {
        for (sum, &p) in sums.iter_mut().zip(plane.row(y)) {
            *sum += p as f64;
        }
    }
    sums
}

/// Sum of every row (profile along the vertical axis)
pub fn row_sums(plane: &GrayPlane) -> Vec<f64> {
    (0..plane.height())
        .map(|y| plane.row(y).iter().map(|&p| p as f64).sum())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std() {
        let (m, s) = mean_std([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((m - 5.0).abs() < 1e-9);
        assert!((s - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(mean_std(std::iter::empty()), (0.0, 0.0));
    }

    #[test]
    fn test_profiles() {
        let plane = GrayPlane::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(column_sums(&plane), vec![5.0, 7.0, 9.0]);
        assert_eq!(row_sums(&plane), vec![6.0, 15.0]);
    }
}
