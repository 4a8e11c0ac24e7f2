//! Similarity scoring between embedding vectors
//!
//! Used by the index backends for both cell assignment and final ranking.
//! All metrics score "higher = more similar", single-threaded, and never
//! normalize their inputs.

use cadenza_core::DistanceMetric;

/// Similarity of `a` and `b` under `metric`.
///
/// Higher is always more similar. Vectors are used as-is; callers that want
/// unit-length semantics must normalize before storing.
pub fn compute_similarity(a: &[f32], b: &[f32], metric: DistanceMetric) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dimension mismatch in similarity");

    match metric {
        DistanceMetric::Cosine => {
            // dot(a,b) / (||a|| * ||b||); zero-norm inputs score 0.0 rather
            // than dividing by zero.
            let norms = dot_product(a, a).sqrt() * dot_product(b, b).sqrt();
            if norms == 0.0 {
                0.0
            } else {
                dot_product(a, b) / norms
            }
        }
        DistanceMetric::Euclidean => {
            // 1 / (1 + l2_distance), mapping distance into (0, 1].
            let dist = a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt();
            1.0 / (1.0 + dist)
        }
        DistanceMetric::DotProduct => dot_product(a, b),
    }
}

/// Inner product; unbounded, assumes pre-normalized vectors when used as a
/// metric on its own.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        compute_similarity(a, b, DistanceMetric::Cosine)
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = [0.4, 0.5, 0.6];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let a = [1.0, 2.0];
        let b = [3.0, 6.0];
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_is_minus_one() {
        assert!((cosine(&[2.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_scores_zero() {
        let zero = [0.0, 0.0];
        assert_eq!(cosine(&zero, &[1.0, 1.0]), 0.0);
        assert_eq!(cosine(&zero, &zero), 0.0);
    }

    #[test]
    fn test_euclidean_shrinks_with_distance() {
        let origin = [0.0, 0.0];
        let near = compute_similarity(&origin, &[0.1, 0.0], DistanceMetric::Euclidean);
        let far = compute_similarity(&origin, &[10.0, 0.0], DistanceMetric::Euclidean);
        assert!(near > far);
        assert!(far > 0.0);
        assert!((compute_similarity(&origin, &origin, DistanceMetric::Euclidean) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_metric_is_raw_inner_product() {
        let score = compute_similarity(&[1.0, 2.0], &[3.0, 4.0], DistanceMetric::DotProduct);
        assert!((score - 11.0).abs() < 1e-6);
    }
}
