// Unit tests for the similarity scorer.
//
// Tests the bounded-output and degenerate-input properties of
// cosine_similarity over a spread of generated vectors.

use glossex::scoring::similarity::cosine_similarity;

fn vectors(count: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| (0..dim).map(|_| (rng.f64() * 2.0 - 1.0) * 10.0).collect())
        .collect()
}

// ============================================================
// Bounds
// ============================================================

#[test]
fn similarity_stays_within_bounds() {
    let vs = vectors(40, 8, 7);
    for a in &vs {
        for b in &vs {
            let sim = cosine_similarity(a, b);
            assert!(
                (-1.0001..=1.0001).contains(&sim),
                "similarity out of bounds: {sim}"
            );
        }
    }
}

#[test]
fn self_similarity_is_one() {
    for v in vectors(20, 16, 42) {
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6, "self-similarity was {sim}");
    }
}

#[test]
fn negated_vector_is_minus_one() {
    for v in vectors(10, 4, 3) {
        let neg: Vec<f64> = v.iter().map(|x| -x).collect();
        let sim = cosine_similarity(&v, &neg);
        assert!((sim + 1.0).abs() < 1e-6, "expected ~-1.0, got {sim}");
    }
}

// ============================================================
// Degenerate inputs
// ============================================================

#[test]
fn zero_vector_is_finite_and_near_zero() {
    let zero = vec![0.0; 8];
    for b in vectors(10, 8, 11) {
        let sim = cosine_similarity(&zero, &b);
        assert!(sim.is_finite());
        assert!(sim.abs() < 1e-6, "zero vector scored {sim}");
    }
}

#[test]
fn zero_against_zero_is_zero() {
    let zero = vec![0.0; 3];
    assert_eq!(cosine_similarity(&zero, &zero), 0.0);
}

// ============================================================
// Reference values
// ============================================================

#[test]
fn rate_vs_tax_and_cat() {
    let rate = [0.9, 0.1];
    let tax = [1.0, 0.0];
    let cat = [0.0, 1.0];
    let to_tax = cosine_similarity(&rate, &tax);
    let to_cat = cosine_similarity(&rate, &cat);
    assert!((to_tax - 0.994).abs() < 1e-3, "got {to_tax}");
    assert!((to_cat - 0.110).abs() < 1e-3, "got {to_cat}");
}
