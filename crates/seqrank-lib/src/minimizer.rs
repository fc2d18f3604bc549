//! Winnowing minimizers over rolling k-mer hashes
//!
//! A window holds `w` consecutive k-mers; its minimizer is the smallest hash
//! in it. Ties in the first window go to the oldest k-mer, later ones to the
//! newest. The window minimum is kept in a monotonic deque of
//! `(position, hash)` pairs, so each k-mer is pushed and popped at most once.
//!
//! Which window minima are reported is controlled by [`DuplicatePolicy`].

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::alphabet::Alphabet;
use crate::config::{ConfigError, MinimizerConfig};
use crate::kmer::KmerEncoder;

/// When a window minimum is reported
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Report whenever the minimizing k-mer changes position, even if its
    /// hash equals the previous one
    #[default]
    Allowed,
    /// Report only when the minimum hash value changes
    Suppressed,
    /// Report the minimum of every window, `m - w + 1` values for `m` k-mers
    EveryWindow,
}

/// A reported minimizer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimizerInfo {
    /// The (seeded, possibly canonical) k-mer hash
    pub value: u64,
    /// Start position of the k-mer in the rank sequence
    pub position: usize,
}

impl MinimizerInfo {
    /// Create a new minimizer info
    pub fn new(value: u64, position: usize) -> Self {
        Self { value, position }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Iterator over the minimizer hashes of a rank sequence
///
/// Nothing is reported when the sequence has fewer than `w` k-mers.
///
/// # Example
/// ```
/// use seqrank_lib::alphabet::AlphabetKind;
/// use seqrank_lib::minimizer::WinnowingMinimizer;
///
/// let dna5 = AlphabetKind::Dna5.table();
/// let ranks = [3, 2, 0, 1, 4, 3, 2];
/// let minimizers: Vec<u64> = WinnowingMinimizer::new(dna5, &ranks, 3, 2).unwrap().collect();
/// assert_eq!(minimizers, vec![51, 9, 22]);
/// ```
#[derive(Clone, Debug)]
pub struct WinnowingMinimizer<'a> {
    kmers: KmerEncoder<'a>,
    w: usize,
    policy: DuplicatePolicy,
    deque: VecDeque<(usize, u64)>,
    pos: usize,
    state: State,
}

impl<'a> WinnowingMinimizer<'a> {
    /// Minimizers with default seed, canonical k-mers and [`DuplicatePolicy::Allowed`]
    pub fn new<A: Alphabet + ?Sized>(
        alphabet: &A,
        ranks: &'a [u8],
        k: usize,
        w: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_config(alphabet, ranks, &MinimizerConfig::new(k, w)?)
    }

    /// Minimizers with explicit configuration
    pub fn with_config<A: Alphabet + ?Sized>(
        alphabet: &A,
        ranks: &'a [u8],
        config: &MinimizerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let kmers = KmerEncoder::with_config(alphabet, ranks, &config.encoder)?;
        Self::from_encoder(kmers, config.w, config.duplicates)
    }

    /// Winnow the hashes of an existing encoder
    ///
    /// The encoder may already have been advanced; windows then start at its
    /// next k-mer and positions stay relative to the whole rank sequence.
    pub fn from_encoder(kmers: KmerEncoder<'a>, w: usize, policy: DuplicatePolicy) -> Result<Self, ConfigError> {
        if w == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        let start = kmers.position().map_or(0, |p| p + 1);
        Ok(Self {
            kmers,
            w,
            policy,
            deque: VecDeque::with_capacity(w),
            pos: start,
            state: State::Fresh,
        })
    }

    /// Window size in k-mers
    pub fn window(&self) -> usize {
        self.w
    }

    /// Duplicate policy in effect
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Report positions alongside hashes
    pub fn infos(self) -> Infos<'a> {
        Infos { inner: self }
    }

    /// Next minimizer with its position
    pub fn next_info(&mut self) -> Option<MinimizerInfo> {
        let ok = match self.state {
            State::Done => return None,
            State::Fresh => {
                self.state = State::Running;
                self.fill_first_window()
            }
            State::Running => self.advance(),
        };
        if !ok {
            self.state = State::Done;
            self.deque.clear();
            return None;
        }
        self.deque
            .front()
            .map(|&(position, value)| MinimizerInfo { value, position })
    }

    /// Pull the first `w` hashes; false if the sequence is too short
    fn fill_first_window(&mut self) -> bool {
        let Some(first) = self.kmers.next() else {
            return false;
        };
        self.deque.push_back((self.pos, first));
        for _ in 1..self.w {
            let Some(hash) = self.kmers.next() else {
                return false;
            };
            self.pos += 1;
            while matches!(self.deque.back(), Some(&(_, v)) if v > hash) {
                self.deque.pop_back();
            }
            self.deque.push_back((self.pos, hash));
        }
        true
    }

    /// Slide until the policy asks for a report; false at end of input
    fn advance(&mut self) -> bool {
        let Some(&(last_pos, last_value)) = self.deque.front() else {
            return false;
        };
        loop {
            let Some(hash) = self.kmers.next() else {
                return false;
            };
            self.pos += 1;

            if matches!(self.deque.front(), Some(&(p, _)) if p + self.w <= self.pos) {
                self.deque.pop_front();
            }
            // >= so that ties resolve to the newest k-mer
            while matches!(self.deque.back(), Some(&(_, v)) if v >= hash) {
                self.deque.pop_back();
            }
            self.deque.push_back((self.pos, hash));

            if self.w == 1 {
                return true;
            }
            let Some(&(p, v)) = self.deque.front() else {
                return true;
            };
            let report = match self.policy {
                DuplicatePolicy::Allowed => p != last_pos,
                DuplicatePolicy::Suppressed => v != last_value,
                DuplicatePolicy::EveryWindow => true,
            };
            if report {
                return true;
            }
        }
    }

    fn is_exact(&self) -> bool {
        self.w == 1 || self.policy == DuplicatePolicy::EveryWindow
    }
}

impl Iterator for WinnowingMinimizer<'_> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.next_info().map(|info| info.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.kmers.len();
        let upper = match self.state {
            State::Done => 0,
            State::Fresh if remaining < self.w => 0,
            State::Fresh => remaining - self.w + 1,
            State::Running => remaining,
        };
        if self.is_exact() {
            (upper, Some(upper))
        } else {
            (usize::from(self.state == State::Fresh && upper > 0), Some(upper))
        }
    }
}

impl FusedIterator for WinnowingMinimizer<'_> {}

/// Iterator adapter yielding [`MinimizerInfo`]
#[derive(Clone, Debug)]
pub struct Infos<'a> {
    inner: WinnowingMinimizer<'a>,
}

impl Iterator for Infos<'_> {
    type Item = MinimizerInfo;

    #[inline]
    fn next(&mut self) -> Option<MinimizerInfo> {
        self.inner.next_info()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for Infos<'_> {}
