//! L2 normalization of embedding rows
//!
//! Inner product over unit vectors is cosine similarity, so every row is
//! scaled to unit length before it enters the index. A row whose norm is
//! exactly zero is divided by 1 instead and stays all-zero.

/// Euclidean length of `v`
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale `v` to unit length in place; all-zero vectors are left untouched
pub fn normalize_in_place(v: &mut [f32]) {
    let norm = l2_norm(v);
    let divisor = if norm == 0.0 { 1.0 } else { norm };
    for x in v.iter_mut() {
        *x /= divisor;
    }
}

/// Normalize every row independently, returning how many rows had zero norm
pub fn normalize_rows(rows: &mut [Vec<f32>]) -> usize {
    let mut zero_rows = 0usize;
    for row in rows.iter_mut() {
        if l2_norm(row) == 0.0 {
            zero_rows += 1;
        }
        normalize_in_place(row);
    }

    if zero_rows > 0 {
        tracing::warn!("{} embedding(s) had zero norm and were left as zero vectors", zero_rows);
    }
    zero_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn test_l2_norm() {
        assert_eq!(l2_norm(&[3.0, 4.0]), 5.0);
        assert_eq!(l2_norm(&[]), 0.0);
    }

    #[test]
    fn test_nonzero_rows_become_unit_length() {
        let mut rows = vec![
            vec![3.0, 4.0],
            vec![0.001, 0.0],
            vec![-2.0, 7.5],
            vec![1e6, -1e6],
        ];
        assert_eq!(normalize_rows(&mut rows), 0);

        for row in &rows {
            assert!((l2_norm(row) - 1.0).abs() < TOLERANCE, "row {:?}", row);
        }
        assert!((rows[0][0] - 0.6).abs() < TOLERANCE);
        assert!((rows[0][1] - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_row_stays_zero() {
        let mut rows = vec![vec![0.0; 4], vec![1.0, 1.0, 1.0, 1.0], vec![0.0; 4]];
        assert_eq!(normalize_rows(&mut rows), 2);

        assert_eq!(rows[0], vec![0.0; 4]);
        assert!(rows[0].iter().all(|x| !x.is_nan()));
        assert!((l2_norm(&rows[1]) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_direction_is_preserved() {
        let mut v = vec![2.0, -6.0, 3.0];
        normalize_in_place(&mut v);
        assert!((v[0] - 2.0 / 7.0).abs() < TOLERANCE);
        assert!((v[1] + 6.0 / 7.0).abs() < TOLERANCE);
        assert!((v[2] - 3.0 / 7.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_already_unit_is_unchanged() {
        let mut v = vec![0.0, 1.0, 0.0];
        normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_rows() {
        let mut rows: Vec<Vec<f32>> = Vec::new();
        assert_eq!(normalize_rows(&mut rows), 0);
        assert!(rows.is_empty());
    }
}
