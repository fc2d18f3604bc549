//! Seed families for independent hash functions
//!
//! The rolling hash is an injective base-sigma encoding, so two runs over the
//! same ranks differ only by the XOR seed. A [`SeedFamily`] derives any number
//! of well-mixed seeds from one base seed, giving several independent
//! minimizer schemes over the same sequence.

use ahash::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Deterministic sequence of seeds derived from a base seed
///
/// Member 0 is the base seed itself, so a family of one reproduces a plain
/// run with that seed.
///
/// Members `1..` come from `ahash` and are reproducible within one build
/// only: their values may change with the `ahash` version or with target
/// features (AES-NI versus the fallback hasher). Record the seeds themselves,
/// not just the base, when results must be compared across builds.
#[derive(Clone)]
pub struct SeedFamily {
    base: u64,
    state: RandomState,
}

impl SeedFamily {
    /// Family rooted at `base`
    pub fn new(base: u64) -> Self {
        let state = RandomState::with_seeds(base, !base, base.rotate_left(32), !base.rotate_left(32));
        Self { base, state }
    }

    /// Base seed of the family
    pub fn base(&self) -> u64 {
        self.base
    }

    /// The `index`-th seed
    #[inline]
    pub fn seed(&self, index: usize) -> u64 {
        if index == 0 {
            return self.base;
        }
        let mut hasher = self.state.build_hasher();
        hasher.write_u64(index as u64);
        hasher.finish()
    }

    /// The first `n` seeds
    pub fn seeds(&self, n: usize) -> Vec<u64> {
        (0..n).map(|i| self.seed(i)).collect()
    }
}

impl std::fmt::Debug for SeedFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedFamily").field("base", &self.base).finish()
    }
}
