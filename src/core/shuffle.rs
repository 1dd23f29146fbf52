use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the pool ordering used before matching
///
/// Production runs use [`SeededShuffle`]; tests inject [`IdentityOrder`] or
/// [`FixedOrder`] to make the outcome deterministic.
pub trait PoolOrder {
    fn arrange<T>(&mut self, pool: &mut [T]);
}

/// Uniform Fisher-Yates shuffle driven by a `StdRng`
#[derive(Debug, Clone)]
pub struct SeededShuffle {
    rng: StdRng,
}

impl SeededShuffle {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl PoolOrder for SeededShuffle {
    fn arrange<T>(&mut self, pool: &mut [T]) {
        for i in (1..pool.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            pool.swap(i, j);
        }
    }
}

/// Leaves the pool in roster order
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOrder;

impl PoolOrder for IdentityOrder {
    fn arrange<T>(&mut self, _pool: &mut [T]) {}
}

/// Applies an explicit permutation: position `i` receives `pool[order[i]]`
#[derive(Debug, Clone)]
pub struct FixedOrder(pub Vec<usize>);

impl FixedOrder {
    fn is_permutation_of(&self, len: usize) -> bool {
        if self.0.len() != len {
            return false;
        }
        let mut seen = vec![false; len];
        for &i in &self.0 {
            if i >= len || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

impl PoolOrder for FixedOrder {
    fn arrange<T>(&mut self, pool: &mut [T]) {
        if !self.is_permutation_of(pool.len()) {
            tracing::warn!(
                "Fixed order of length {} is not a permutation of a pool of {}, leaving pool unchanged",
                self.0.len(),
                pool.len()
            );
            return;
        }

        // Follow each cycle of the permutation, swapping elements into place
        let mut placed = vec![false; pool.len()];
        for start in 0..pool.len() {
            if placed[start] {
                continue;
            }
            let mut current = start;
            loop {
                placed[current] = true;
                let next = self.0[current];
                if next == start {
                    break;
                }
                pool.swap(current, next);
                current = next;
            }
        }
    }
}
