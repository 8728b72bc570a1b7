//! Parent selection for the GA.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Tournament selection: pick `k` random indices (with replacement) and
/// return the one with the lowest fitness.
///
/// Higher `k` = stronger selection pressure.
/// - k=2: light pressure (good for diversity)
/// - k=3-5: moderate pressure (typical default)
/// - k>5: strong pressure (risk of premature convergence)
///
/// A contender replaces the current winner only on strictly lower fitness,
/// so the first sampled index wins ties.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `fitness` is empty.
pub fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    assert!(!fitness.is_empty(), "cannot select from empty population");
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitness[idx] < fitness[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}
