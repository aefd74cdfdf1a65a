//! Shuffle permutations for the active play order
//!
//! The permutation is computed over positions of the base order, so the
//! shuffled view never owns tracks of its own.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random indices
///
/// Injected into the navigator so tests can script the permutation.
/// Any `FnMut(usize) -> usize` closure is a picker.
pub trait IndexPicker {
    /// Return an index uniformly chosen from `0..=upper`
    fn pick(&mut self, upper: usize) -> usize;
}

impl<F> IndexPicker for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, upper: usize) -> usize {
        self(upper)
    }
}

/// Default picker backed by `rand`
#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Picker seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic picker (reproducible shuffles)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPicker for RandomPicker {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..=upper)
    }
}

/// Fisher-Yates permutation of `0..len`
///
/// For `i` from `len - 1` down to 1, swaps position `i` with a position
/// drawn from `0..=i`. Lengths 0 and 1 return the identity.
pub fn permutation(len: usize, picker: &mut dyn IndexPicker) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();

    for i in (1..len).rev() {
        // A picker returning out-of-range values must not break the bijection
        let j = picker.pick(i).min(i);
        order.swap(i, j);
    }

    order
}
