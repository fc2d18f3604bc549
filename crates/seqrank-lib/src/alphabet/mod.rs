//! Alphabets: symbol <-> rank lookup tables
//!
//! An alphabet assigns every canonical symbol a rank in `[0, sigma)`. All
//! conversions are single array lookups into 256-entry tables built once
//! from a declarative list of [`SymbolMapping`]s. Symbols and ranks outside
//! the alphabet map to sentinel values instead of failing.
//!
//! Capabilities that only some alphabets have (Watson-Crick complement,
//! ambiguity codes) are exposed through optional accessors on [`Alphabet`]:
//! [`Alphabet::complement`] returns `None` for alphabets without
//! complementation, and the ambiguity accessors return empty slices.

mod builtin;
mod table;

pub use builtin::AlphabetKind;
pub use table::{AlphabetBuilder, AlphabetError, AlphabetTable, AmbiguousSymbol, SymbolMapping};

use crate::constants::{DEFAULT_UNKNOWN_CHAR, DEFAULT_UNKNOWN_RANK};

/// Symbol <-> rank conversion for one alphabet
///
/// Every method is O(1) and total: unknown input yields
/// [`unknown_rank`](Alphabet::unknown_rank) or
/// [`unknown_char`](Alphabet::unknown_char).
pub trait Alphabet {
    /// Human-readable alphabet name
    fn name(&self) -> &str;

    /// Number of canonical ranks (sigma)
    fn size(&self) -> usize;

    /// Rank of a symbol, or the sentinel rank if the symbol is unknown
    fn char_to_rank(&self, c: u8) -> u8;

    /// Primary symbol of a rank, or the sentinel char for ranks >= sigma
    fn rank_to_char(&self, rank: u8) -> u8;

    /// Maps any alias to the primary symbol of its rank
    fn normalize_char(&self, c: u8) -> u8;

    /// Rank reported for unknown symbols
    fn unknown_rank(&self) -> u8 {
        DEFAULT_UNKNOWN_RANK
    }

    /// Character reported for unknown ranks and symbols
    fn unknown_char(&self) -> u8 {
        DEFAULT_UNKNOWN_CHAR
    }

    /// Complement capability, `None` if the alphabet has no complementation
    fn complement(&self) -> Option<Complement<'_>> {
        None
    }

    /// Ranks of the ambiguous symbols (e.g. `N`)
    fn ambiguous_bases(&self) -> &[u8] {
        &[]
    }

    /// Concrete ranks an ambiguous rank may stand for (empty if `rank` is not ambiguous)
    fn base_alternatives(&self, rank: u8) -> &[u8] {
        let _ = rank;
        &[]
    }
}

impl<A: Alphabet + ?Sized> Alphabet for &A {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn size(&self) -> usize {
        (**self).size()
    }

    #[inline]
    fn char_to_rank(&self, c: u8) -> u8 {
        (**self).char_to_rank(c)
    }

    #[inline]
    fn rank_to_char(&self, rank: u8) -> u8 {
        (**self).rank_to_char(rank)
    }

    #[inline]
    fn normalize_char(&self, c: u8) -> u8 {
        (**self).normalize_char(c)
    }

    #[inline]
    fn unknown_rank(&self) -> u8 {
        (**self).unknown_rank()
    }

    #[inline]
    fn unknown_char(&self) -> u8 {
        (**self).unknown_char()
    }

    #[inline]
    fn complement(&self) -> Option<Complement<'_>> {
        (**self).complement()
    }

    fn ambiguous_bases(&self) -> &[u8] {
        (**self).ambiguous_bases()
    }

    fn base_alternatives(&self, rank: u8) -> &[u8] {
        (**self).base_alternatives(rank)
    }
}

/// Borrowed complement tables of an alphabet
///
/// Obtained from [`Alphabet::complement`]; holding one is proof that the
/// alphabet supports complementation.
#[derive(Clone, Copy)]
pub struct Complement<'a> {
    rank_complement: &'a [u8; 256],
    char_to_rank: &'a [u8; 256],
    rank_to_char: &'a [u8; 256],
}

impl<'a> Complement<'a> {
    /// Create a complement handle from the three lookup tables it composes
    pub fn new(
        rank_complement: &'a [u8; 256],
        char_to_rank: &'a [u8; 256],
        rank_to_char: &'a [u8; 256],
    ) -> Self {
        Self {
            rank_complement,
            char_to_rank,
            rank_to_char,
        }
    }

    /// Complement in rank space
    #[inline]
    pub fn complement_rank(&self, rank: u8) -> u8 {
        self.rank_complement[rank as usize]
    }

    /// Complement in char space (char -> rank -> complement -> char)
    #[inline]
    pub fn complement_char(&self, c: u8) -> u8 {
        let rank = self.char_to_rank[c as usize];
        self.rank_to_char[self.complement_rank(rank) as usize]
    }

    /// The rank complement table itself
    pub fn rank_table(&self) -> &'a [u8; 256] {
        self.rank_complement
    }
}

impl std::fmt::Debug for Complement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Complement").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_through_reference() {
        let dna = AlphabetKind::Dna4.table();
        let by_ref: &dyn Alphabet = &dna;
        assert_eq!(by_ref.size(), 4);
        assert_eq!(by_ref.char_to_rank(b'g'), 2);
        assert_eq!(by_ref.rank_to_char(3), b'T');
        assert!(by_ref.complement().is_some());
    }

    #[test]
    fn test_complement_handle() {
        let comp = AlphabetKind::Dna5.table().complement().unwrap();
        assert_eq!(comp.complement_rank(0), 3);
        assert_eq!(comp.complement_rank(4), 4);
        assert_eq!(comp.complement_char(b'a'), b'T');
        assert_eq!(comp.complement_char(b'N'), b'N');
        // unknown symbols stay unknown through the composition
        assert_eq!(comp.complement_char(b'X'), DEFAULT_UNKNOWN_CHAR);
        assert_eq!(comp.complement_rank(DEFAULT_UNKNOWN_RANK), DEFAULT_UNKNOWN_RANK);
    }

    #[test]
    fn test_no_complement_for_protein() {
        assert!(AlphabetKind::Aa20.table().complement().is_none());
        assert!(AlphabetKind::Dna3Bs.table().complement().is_none());
    }
}
