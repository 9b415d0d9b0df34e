// Cosine similarity between two embedding vectors.
//
//   dot(a, b) / (|a| * |b| + EPSILON)
//
// The epsilon keeps a zero vector from dividing by zero: it scores 0.0
// instead of NaN. The result is not clamped, so opposite directions give
// negative values: general-leaning evidence should be able to pull a
// mean down, not just fail to push it up.

/// Added to the denominator so degenerate vectors score ~0.0.
pub const EPSILON: f64 = 1e-9;

/// Cosine similarity of two equal-length vectors, nominally in [-1, 1].
///
/// Both vectors come from the same `EmbeddingTable`, whose dimension is
/// validated on load; passing vectors of different lengths is a bug.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "cosine_similarity: dimension mismatch");

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    dot / (mag_a * mag_b + EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6, "expected ~-1.0, got {sim}");
    }

    #[test]
    fn test_cosine_proportional() {
        // Same direction, different magnitudes
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let sim = cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]);
        assert!(sim.is_finite());
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn test_cosine_both_zero() {
        let sim = cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 3.0, -2.0, 0.5];
        let b = vec![2.0, -1.0, 4.0, 0.0];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_epsilon_shrinks_tiny_vectors() {
        // With magnitudes near sqrt(EPSILON) the epsilon term dominates
        let a = vec![1e-5, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert!(sim < 0.5, "tiny vectors should be pulled toward 0, got {sim}");
    }
}
