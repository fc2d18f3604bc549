//! Rolling k-mer encoding
//!
//! Every k-mer of a rank sequence is read as a base-sigma number with the
//! leftmost symbol most significant. Sliding the window by one symbol is an
//! O(1) update of that number:
//! - forward: `hash = (hash - removed * sigma^(k-1)) * sigma + inserted`
//! - backward: `hash = (hash - removed) / sigma + inserted * sigma^(k-1)`
//!
//! The backward update, fed with complemented ranks, maintains the hash of
//! the reverse complement while the window moves in the same direction,
//! which gives canonical k-mers without re-reading the window.
//!
//! Arithmetic is on `u64` and wraps. Past
//! [`max_k_without_wrap`](crate::constants::max_k_without_wrap) distinct
//! k-mers may share a hash, and canonical hashes are no longer a function of
//! the k-mer alone: the backward update divides, which does not commute with
//! wraparound, so the same k-mer can hash differently at different positions.
//! Forward-only hashes stay position independent.

use std::iter::FusedIterator;

use crate::alphabet::Alphabet;
use crate::config::{ConfigError, EncoderConfig};
use crate::constants::max_k_without_wrap;

/// `sigma^exp`, wrapping on overflow
pub fn pow_wrapping(sigma: u64, exp: usize) -> u64 {
    let mut result: u64 = 1;
    let mut base = sigma;
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    result
}

/// Number of k-mers in a sequence of length `n`
#[inline]
pub const fn kmer_count(n: usize, k: usize) -> usize {
    if n < k {
        0
    } else {
        n - k + 1
    }
}

/// Base-sigma hash of a k-length window with O(1) shifts in either direction
///
/// Start from zero and call `next_right(0, r)` (or `next_left(0, r)`) k times
/// to fold in the first window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollingHash {
    sigma: u64,
    max_exp: u64,
    hash: u64,
}

impl RollingHash {
    /// Empty hash for k-mers of length `k` over `sigma` symbols
    pub fn new(sigma: u64, k: usize) -> Self {
        Self {
            sigma,
            max_exp: pow_wrapping(sigma, k.saturating_sub(1)),
            hash: 0,
        }
    }

    /// Current hash value
    #[inline]
    pub fn value(&self) -> u64 {
        self.hash
    }

    /// `sigma^(k-1)`, the weight of the most significant symbol
    #[inline]
    pub fn max_exp(&self) -> u64 {
        self.max_exp
    }

    /// Drop the leftmost symbol and append one on the right
    #[inline]
    pub fn next_right(&mut self, remove: u64, insert: u64) {
        self.hash = self
            .hash
            .wrapping_sub(remove.wrapping_mul(self.max_exp))
            .wrapping_mul(self.sigma)
            .wrapping_add(insert);
    }

    /// Drop the rightmost symbol and prepend one on the left
    #[inline]
    pub fn next_left(&mut self, remove: u64, insert: u64) {
        self.hash = (self.hash.wrapping_sub(remove) / self.sigma).wrapping_add(insert.wrapping_mul(self.max_exp));
    }
}

/// Iterator over the hashes of all k-mers of a rank sequence
///
/// Yields `n - k + 1` values for a sequence of length `n >= k` and nothing
/// otherwise. The encoder borrows the ranks and is single pass; build a new
/// one to scan again.
///
/// # Example
/// ```
/// use seqrank_lib::alphabet::AlphabetKind;
/// use seqrank_lib::kmer::KmerEncoder;
///
/// let dna5 = AlphabetKind::Dna5.table();
/// let ranks = [3, 2, 0, 1, 4, 3, 2];
/// let hashes: Vec<u64> = KmerEncoder::new(dna5, &ranks, 3).unwrap().collect();
/// assert_eq!(hashes, vec![80, 51, 9, 22, 29]);
/// ```
#[derive(Clone, Debug)]
pub struct KmerEncoder<'a> {
    ranks: &'a [u8],
    k: usize,
    seed: u64,
    complement: Option<[u8; 256]>,
    fwd: RollingHash,
    bwd: RollingHash,
    next_pos: usize,
    pending: bool,
}

impl<'a> KmerEncoder<'a> {
    /// Encoder with default seed and canonical k-mers when the alphabet complements
    pub fn new<A: Alphabet + ?Sized>(alphabet: &A, ranks: &'a [u8], k: usize) -> Result<Self, ConfigError> {
        Self::with_config(
            alphabet,
            ranks,
            &EncoderConfig {
                k,
                ..EncoderConfig::default()
            },
        )
    }

    /// Encoder with explicit seed and canonical setting
    pub fn with_config<A: Alphabet + ?Sized>(
        alphabet: &A,
        ranks: &'a [u8],
        config: &EncoderConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let k = config.k;
        let sigma = alphabet.size() as u64;

        let complement = if config.canonical {
            let table = alphabet.complement().map(|comp| *comp.rank_table());
            if table.is_none() {
                tracing::debug!(
                    "Alphabet '{}' has no complement, reporting forward k-mers only",
                    alphabet.name()
                );
            }
            table
        } else {
            None
        };

        if k > max_k_without_wrap(sigma) {
            tracing::warn!(
                "k={} exceeds 64-bit range for sigma={}: hashes wrap{}",
                k,
                sigma,
                if complement.is_some() {
                    " and canonical hashes depend on position"
                } else {
                    ""
                }
            );
        }

        let mut encoder = Self {
            ranks,
            k,
            seed: config.seed,
            complement,
            fwd: RollingHash::new(sigma, k),
            bwd: RollingHash::new(sigma, k),
            next_pos: ranks.len(),
            pending: false,
        };
        encoder.prime();
        Ok(encoder)
    }

    fn prime(&mut self) {
        if self.ranks.len() < self.k {
            return;
        }
        for &rank in &self.ranks[..self.k] {
            self.fwd.next_right(0, rank as u64);
            if let Some(table) = &self.complement {
                self.bwd.next_left(0, table[rank as usize] as u64);
            }
        }
        self.next_pos = self.k;
        self.pending = true;
    }

    #[inline]
    fn current(&self) -> u64 {
        let fwd = self.fwd.value() ^ self.seed;
        if self.complement.is_some() {
            fwd.min(self.bwd.value() ^ self.seed)
        } else {
            fwd
        }
    }

    /// K-mer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// Whether reported hashes are canonical (min of both strands)
    pub fn is_canonical(&self) -> bool {
        self.complement.is_some()
    }

    /// Start position of the most recently reported k-mer
    pub fn position(&self) -> Option<usize> {
        if self.pending || self.ranks.len() < self.k {
            None
        } else {
            Some(self.next_pos - self.k)
        }
    }
}

impl Iterator for KmerEncoder<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.pending {
            self.pending = false;
            return Some(self.current());
        }
        if self.next_pos >= self.ranks.len() {
            return None;
        }

        let remove = self.ranks[self.next_pos - self.k];
        let insert = self.ranks[self.next_pos];
        self.fwd.next_right(remove as u64, insert as u64);
        if let Some(table) = &self.complement {
            self.bwd
                .next_left(table[remove as usize] as u64, table[insert as usize] as u64);
        }
        self.next_pos += 1;
        Some(self.current())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.pending) + (self.ranks.len() - self.next_pos);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for KmerEncoder<'_> {}

impl FusedIterator for KmerEncoder<'_> {}
