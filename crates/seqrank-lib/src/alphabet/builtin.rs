//! Built-in alphabet definitions
//!
//! Nucleotide, amino-acid and quality alphabets, described as rank mapping
//! lists and turned into tables on first use. Tables are process-wide and
//! immutable once built.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::table::{ranged_mappings, AlphabetBuilder, AlphabetError, AlphabetTable, AmbiguousSymbol, SymbolMapping};
use super::{Alphabet, Complement};

type M = SymbolMapping<'static>;

//                       rank, symbol, compl, alts
const DNA4: &[M] = &[
    M::complemented(0, b'A', b'T', b"a"),
    M::complemented(1, b'C', b'G', b"c"),
    M::complemented(2, b'G', b'C', b"g"),
    M::complemented(3, b'T', b'A', b"t"),
];

const DNA5: &[M] = &[
    M::complemented(0, b'A', b'T', b"a"),
    M::complemented(1, b'C', b'G', b"c"),
    M::complemented(2, b'G', b'C', b"g"),
    M::complemented(3, b'T', b'A', b"t"),
    M::complemented(4, b'N', b'N', b"n"),
];

const IUPAC: &[M] = &[
    M::complemented(0, b'A', b'T', b"a"),
    M::complemented(1, b'C', b'G', b"c"),
    M::complemented(2, b'G', b'C', b"g"),
    M::complemented(3, b'T', b'A', b"tUu"),
    M::complemented(4, b'N', b'N', b"n"),
    M::complemented(5, b'R', b'Y', b"r"),
    M::complemented(6, b'Y', b'R', b"y"),
    M::complemented(7, b'S', b'S', b"s"),
    M::complemented(8, b'W', b'W', b"w"),
    M::complemented(9, b'K', b'M', b"k"),
    M::complemented(10, b'M', b'K', b"m"),
    M::complemented(11, b'B', b'V', b"b"),
    M::complemented(12, b'D', b'H', b"d"),
    M::complemented(13, b'H', b'D', b"h"),
    M::complemented(14, b'V', b'B', b"v"),
    M::complemented(15, b'-', b'-', b"."),
];

const RNA4: &[M] = &[
    M::complemented(0, b'A', b'U', b"a"),
    M::complemented(1, b'C', b'G', b"c"),
    M::complemented(2, b'G', b'C', b"g"),
    M::complemented(3, b'U', b'A', b"u"),
];

const RNA5: &[M] = &[
    M::complemented(0, b'A', b'U', b"a"),
    M::complemented(1, b'C', b'G', b"c"),
    M::complemented(2, b'G', b'C', b"g"),
    M::complemented(3, b'U', b'A', b"u"),
    M::complemented(4, b'N', b'N', b"n"),
];

// bisulfite converted: unmethylated C reads as T
const DNA3BS: &[M] = &[
    M::new(0, b'A', b"a"),
    M::new(1, b'G', b"g"),
    M::new(2, b'T', b"tCc"),
];

const AA10LI: &[M] = &[
    M::new(0, b'A', b"aSsTtXx"),
    M::new(1, b'B', b"bDdEeQqZz"),
    M::new(2, b'C', b"cUu"),
    M::new(3, b'F', b"fWwYy*"),
    M::new(4, b'G', b"g"),
    M::new(5, b'H', b"hNn"),
    M::new(6, b'I', b"iVv"),
    M::new(7, b'J', b"jLlMm"),
    M::new(8, b'K', b"kOoRr"),
    M::new(9, b'P', b"p"),
];

const AA10MURPHY: &[M] = &[
    M::new(0, b'A', b"a"),
    M::new(1, b'B', b"bDdEeNnQqZz"),
    M::new(2, b'C', b"cUu"),
    M::new(3, b'F', b"fWwYy*"),
    M::new(4, b'G', b"g"),
    M::new(5, b'H', b"h"),
    M::new(6, b'I', b"iJjLlMmVv"),
    M::new(7, b'K', b"kOoRr"),
    M::new(8, b'P', b"p"),
    M::new(9, b'S', b"sTtXx"),
];

const AA20: &[M] = &[
    M::new(0, b'A', b"a"),
    M::new(1, b'C', b"cUu"),
    M::new(2, b'D', b"dBb"),
    M::new(3, b'E', b"eZz"),
    M::new(4, b'F', b"f"),
    M::new(5, b'G', b"g"),
    M::new(6, b'H', b"h"),
    M::new(7, b'I', b"i"),
    M::new(8, b'K', b"k"),
    M::new(9, b'L', b"lJjOo"),
    M::new(10, b'M', b"m"),
    M::new(11, b'N', b"n"),
    M::new(12, b'P', b"p"),
    M::new(13, b'Q', b"q"),
    M::new(14, b'R', b"r"),
    M::new(15, b'S', b"sXx"),
    M::new(16, b'T', b"t"),
    M::new(17, b'V', b"v"),
    M::new(18, b'W', b"w*"),
    M::new(19, b'Y', b"y"),
];

const AA27: &[M] = &[
    M::new(0, b'A', b"a"),
    M::new(1, b'C', b"c"),
    M::new(2, b'D', b"d"),
    M::new(3, b'E', b"e"),
    M::new(4, b'F', b"f"),
    M::new(5, b'G', b"g"),
    M::new(6, b'H', b"h"),
    M::new(7, b'I', b"i"),
    M::new(8, b'K', b"k"),
    M::new(9, b'L', b"l"),
    M::new(10, b'M', b"m"),
    M::new(11, b'N', b"n"),
    M::new(12, b'P', b"p"),
    M::new(13, b'Q', b"q"),
    M::new(14, b'R', b"r"),
    M::new(15, b'S', b"s"),
    M::new(16, b'T', b"t"),
    M::new(17, b'V', b"v"),
    M::new(18, b'W', b"w"),
    M::new(19, b'Y', b"y"),
    M::new(20, b'U', b"u"),
    M::new(21, b'B', b"b"),
    M::new(22, b'Z', b"z"),
    M::new(23, b'J', b"j"),
    M::new(24, b'O', b"o"),
    M::new(25, b'X', b"x"),
    M::new(26, b'*', b""),
];

const N_ANY_DNA: &[AmbiguousSymbol<'static>] = &[AmbiguousSymbol::new(b'N', b"ACGT")];

const N_ANY_RNA: &[AmbiguousSymbol<'static>] = &[AmbiguousSymbol::new(b'N', b"ACGU")];

const IUPAC_CODES: &[AmbiguousSymbol<'static>] = &[
    AmbiguousSymbol::new(b'N', b"ACGT"),
    AmbiguousSymbol::new(b'R', b"AG"),
    AmbiguousSymbol::new(b'Y', b"CT"),
    AmbiguousSymbol::new(b'S', b"CG"),
    AmbiguousSymbol::new(b'W', b"AT"),
    AmbiguousSymbol::new(b'K', b"GT"),
    AmbiguousSymbol::new(b'M', b"AC"),
    AmbiguousSymbol::new(b'B', b"CGT"),
    AmbiguousSymbol::new(b'D', b"AGT"),
    AmbiguousSymbol::new(b'H', b"ACT"),
    AmbiguousSymbol::new(b'V', b"ACG"),
];

enum Layout {
    Symbols(&'static [M], &'static [AmbiguousSymbol<'static>]),
    Ranged { max_value: u8, offset: u8 },
}

/// The fixed set of built-in alphabets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlphabetKind {
    /// A, C, G, T
    Dna4,
    /// A, C, G, T, N
    Dna5,
    /// The 15 IUPAC nucleotide codes plus gap
    Iupac,
    /// A, C, G, U
    Rna4,
    /// A, C, G, U, N
    Rna5,
    /// Bisulfite-converted DNA: A, G, T (C reads as T)
    Dna3Bs,
    /// Li et al. 10-letter amino-acid reduction
    Aa10Li,
    /// Murphy et al. 10-letter amino-acid reduction
    Aa10Murphy,
    /// The 20 standard amino acids, ambiguity codes folded onto them
    Aa20,
    /// All 26 IUPAC amino-acid letters plus the stop `*`
    Aa27,
    /// Phred+33 qualities 0..=42
    Phred42,
    /// Phred+33 qualities 0..=63
    Phred63,
    /// Solexa+59 qualities 0..=68
    Phred68Solexa,
    /// Phred+33 qualities 0..=94
    Phred94,
}

macro_rules! cached_table {
    ($kind:expr) => {{
        static TABLE: OnceLock<AlphabetTable> = OnceLock::new();
        TABLE.get_or_init(|| $kind.with_builder(|builder| builder.assemble()))
    }};
}

impl AlphabetKind {
    /// Every built-in alphabet
    pub const ALL: [AlphabetKind; 14] = [
        AlphabetKind::Dna4,
        AlphabetKind::Dna5,
        AlphabetKind::Iupac,
        AlphabetKind::Rna4,
        AlphabetKind::Rna5,
        AlphabetKind::Dna3Bs,
        AlphabetKind::Aa10Li,
        AlphabetKind::Aa10Murphy,
        AlphabetKind::Aa20,
        AlphabetKind::Aa27,
        AlphabetKind::Phred42,
        AlphabetKind::Phred63,
        AlphabetKind::Phred68Solexa,
        AlphabetKind::Phred94,
    ];

    /// Lower-case name, as accepted by `FromStr`
    pub const fn name(self) -> &'static str {
        match self {
            AlphabetKind::Dna4 => "dna4",
            AlphabetKind::Dna5 => "dna5",
            AlphabetKind::Iupac => "iupac",
            AlphabetKind::Rna4 => "rna4",
            AlphabetKind::Rna5 => "rna5",
            AlphabetKind::Dna3Bs => "dna3bs",
            AlphabetKind::Aa10Li => "aa10li",
            AlphabetKind::Aa10Murphy => "aa10murphy",
            AlphabetKind::Aa20 => "aa20",
            AlphabetKind::Aa27 => "aa27",
            AlphabetKind::Phred42 => "phred42",
            AlphabetKind::Phred63 => "phred63",
            AlphabetKind::Phred68Solexa => "phred68solexa",
            AlphabetKind::Phred94 => "phred94",
        }
    }

    fn layout(self) -> Layout {
        match self {
            AlphabetKind::Dna4 => Layout::Symbols(DNA4, &[]),
            AlphabetKind::Dna5 => Layout::Symbols(DNA5, N_ANY_DNA),
            AlphabetKind::Iupac => Layout::Symbols(IUPAC, IUPAC_CODES),
            AlphabetKind::Rna4 => Layout::Symbols(RNA4, &[]),
            AlphabetKind::Rna5 => Layout::Symbols(RNA5, N_ANY_RNA),
            AlphabetKind::Dna3Bs => Layout::Symbols(DNA3BS, &[]),
            AlphabetKind::Aa10Li => Layout::Symbols(AA10LI, &[]),
            AlphabetKind::Aa10Murphy => Layout::Symbols(AA10MURPHY, &[]),
            AlphabetKind::Aa20 => Layout::Symbols(AA20, &[]),
            AlphabetKind::Aa27 => Layout::Symbols(AA27, &[]),
            AlphabetKind::Phred42 => Layout::Ranged { max_value: 42, offset: b'!' },
            AlphabetKind::Phred63 => Layout::Ranged { max_value: 63, offset: b'!' },
            AlphabetKind::Phred68Solexa => Layout::Ranged { max_value: 68, offset: b';' },
            AlphabetKind::Phred94 => Layout::Ranged { max_value: 94, offset: b'!' },
        }
    }

    fn with_builder<R>(self, f: impl FnOnce(AlphabetBuilder<'_>) -> R) -> R {
        let ranged;
        let (mappings, ambiguous) = match self.layout() {
            Layout::Symbols(mappings, ambiguous) => (mappings, ambiguous),
            Layout::Ranged { max_value, offset } => {
                ranged = ranged_mappings(max_value, offset);
                (&ranged[..], &[][..])
            }
        };
        f(AlphabetBuilder::new(self.name(), mappings).ambiguous(ambiguous))
    }

    /// Shared table with the default sentinels, built on first use
    pub fn table(self) -> &'static AlphabetTable {
        match self {
            AlphabetKind::Dna4 => cached_table!(self),
            AlphabetKind::Dna5 => cached_table!(self),
            AlphabetKind::Iupac => cached_table!(self),
            AlphabetKind::Rna4 => cached_table!(self),
            AlphabetKind::Rna5 => cached_table!(self),
            AlphabetKind::Dna3Bs => cached_table!(self),
            AlphabetKind::Aa10Li => cached_table!(self),
            AlphabetKind::Aa10Murphy => cached_table!(self),
            AlphabetKind::Aa20 => cached_table!(self),
            AlphabetKind::Aa27 => cached_table!(self),
            AlphabetKind::Phred42 => cached_table!(self),
            AlphabetKind::Phred63 => cached_table!(self),
            AlphabetKind::Phred68Solexa => cached_table!(self),
            AlphabetKind::Phred94 => cached_table!(self),
        }
    }

    /// Fresh table of this alphabet with custom sentinel values
    pub fn with_sentinels(self, unknown_rank: u8, unknown_char: u8) -> Result<AlphabetTable, AlphabetError> {
        self.with_builder(|builder| builder.unknown_rank(unknown_rank).unknown_char(unknown_char).build())
    }

    /// Fresh validated table with the default sentinels
    pub fn build(self) -> Result<AlphabetTable, AlphabetError> {
        self.with_builder(|builder| builder.build())
    }
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlphabetKind {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlphabetKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AlphabetError::UnknownAlphabet(s.to_string()))
    }
}

impl Alphabet for AlphabetKind {
    fn name(&self) -> &str {
        AlphabetKind::name(*self)
    }

    #[inline]
    fn size(&self) -> usize {
        self.table().size()
    }

    #[inline]
    fn char_to_rank(&self, c: u8) -> u8 {
        self.table().char_to_rank(c)
    }

    #[inline]
    fn rank_to_char(&self, rank: u8) -> u8 {
        self.table().rank_to_char(rank)
    }

    #[inline]
    fn normalize_char(&self, c: u8) -> u8 {
        self.table().normalize_char(c)
    }

    fn complement(&self) -> Option<Complement<'_>> {
        self.table().complement()
    }

    fn ambiguous_bases(&self) -> &[u8] {
        self.table().ambiguous_bases()
    }

    fn base_alternatives(&self, rank: u8) -> &[u8] {
        self.table().base_alternatives(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_UNKNOWN_CHAR, DEFAULT_UNKNOWN_RANK};

    fn ranks(kind: AlphabetKind, input: &[u8]) -> Vec<u8> {
        input.iter().map(|&c| kind.char_to_rank(c)).collect()
    }

    #[test]
    fn test_definitions_are_valid() {
        for kind in AlphabetKind::ALL {
            let built = kind.build();
            assert!(built.is_ok(), "{} failed validation: {:?}", kind, built.err());
        }
    }

    #[test]
    fn test_sizes() {
        let expected = [4, 5, 16, 4, 5, 3, 10, 10, 20, 27, 43, 64, 69, 95];
        for (kind, size) in AlphabetKind::ALL.into_iter().zip(expected) {
            assert_eq!(kind.table().size(), size, "size of {}", kind);
        }
    }

    #[test]
    fn test_table_is_shared() {
        assert!(std::ptr::eq(AlphabetKind::Dna5.table(), AlphabetKind::Dna5.table()));
        assert!(!std::ptr::eq(AlphabetKind::Dna4.table(), AlphabetKind::Rna4.table()));
    }

    #[test]
    fn test_nucleotide_ranks() {
        assert_eq!(ranks(AlphabetKind::Dna4, b"AaCcGgTt"), vec![0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(ranks(AlphabetKind::Dna5, b"ACGnACGt"), vec![0, 1, 2, 4, 0, 1, 2, 3]);
        assert_eq!(ranks(AlphabetKind::Rna4, b"ACGUu"), vec![0, 1, 2, 3, 3]);
        assert_eq!(ranks(AlphabetKind::Iupac, b"TUu-."), vec![3, 3, 3, 15, 15]);
        assert_eq!(ranks(AlphabetKind::Dna3Bs, b"AGTCc"), vec![0, 1, 2, 2, 2]);
        assert_eq!(ranks(AlphabetKind::Dna4, b"N"), vec![DEFAULT_UNKNOWN_RANK]);
    }

    #[test]
    fn test_amino_acid_ranks() {
        assert_eq!(
            ranks(AlphabetKind::Aa20, b"UuBbZzJjOoXx*"),
            vec![1, 1, 2, 2, 3, 3, 9, 9, 9, 9, 15, 15, 18]
        );
        assert_eq!(
            ranks(AlphabetKind::Aa10Li, b"AaSsTtXxBbDdEeQqZzCcUuFfWwYy*GgHhNnIiVvJjLlMmKkOoRrPp"),
            vec![
                0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3,
                3, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, 8, 8, 9, 9
            ]
        );
        assert_eq!(
            ranks(AlphabetKind::Aa10Murphy, b"AaBbDdEeNnQqZzCcUuFfWwYy*GgHhIiJjLlMmVvKkOoRrPpSsTtXx"),
            vec![
                0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 4, 4, 5,
                5, 6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 8, 8, 9, 9, 9, 9, 9, 9
            ]
        );
    }

    #[test]
    fn test_primary_symbols() {
        let primaries = |kind: AlphabetKind| -> Vec<u8> {
            (0..kind.table().size() as u8).map(|r| kind.rank_to_char(r)).collect()
        };
        assert_eq!(primaries(AlphabetKind::Aa27), b"ACDEFGHIKLMNPQRSTVWYUBZJOX*".to_vec());
        assert_eq!(primaries(AlphabetKind::Aa20), b"ACDEFGHIKLMNPQRSTVWY".to_vec());
        assert_eq!(primaries(AlphabetKind::Aa10Li), b"ABCFGHIJKP".to_vec());
        assert_eq!(primaries(AlphabetKind::Aa10Murphy), b"ABCFGHIKPS".to_vec());
        assert_eq!(primaries(AlphabetKind::Iupac), b"ACGTNRYSWKMBDHV-".to_vec());
    }

    #[test]
    fn test_round_trip_and_sentinel_closure() {
        for kind in AlphabetKind::ALL {
            let table = kind.table();
            for c in 0..=255u8 {
                let norm = table.normalize_char(c);
                let rank = table.char_to_rank(c);
                if rank == DEFAULT_UNKNOWN_RANK {
                    assert_eq!(norm, DEFAULT_UNKNOWN_CHAR, "{}: {:?}", kind, c as char);
                } else {
                    assert_eq!(table.rank_to_char(table.char_to_rank(norm)), norm, "{}: {:?}", kind, c as char);
                }
            }
            for rank in table.size()..=255 {
                assert_eq!(table.rank_to_char(rank as u8), DEFAULT_UNKNOWN_CHAR);
            }
        }
    }

    #[test]
    fn test_complement_involution() {
        for kind in AlphabetKind::ALL {
            let table = kind.table();
            let Some(comp) = table.complement() else { continue };
            for rank in 0..table.size() as u8 {
                assert_eq!(comp.complement_rank(comp.complement_rank(rank)), rank, "{}", kind);
            }
        }
        let iupac = AlphabetKind::Iupac.complement().unwrap();
        assert_eq!(iupac.complement_char(b'u'), b'A');
        assert_eq!(iupac.complement_char(b'k'), b'M');
        assert_eq!(iupac.complement_char(b'.'), b'-');
    }

    #[test]
    fn test_ambiguity_codes() {
        let dna5 = AlphabetKind::Dna5;
        assert_eq!(dna5.ambiguous_bases(), &[4]);
        assert_eq!(dna5.base_alternatives(4), &[0, 1, 2, 3]);
        assert!(dna5.base_alternatives(0).is_empty());

        let iupac = AlphabetKind::Iupac;
        assert_eq!(iupac.ambiguous_bases().len(), 11);
        assert_eq!(iupac.base_alternatives(iupac.char_to_rank(b'r')), &[0, 2]);
        assert_eq!(iupac.base_alternatives(iupac.char_to_rank(b'V')), &[0, 1, 2]);

        assert!(AlphabetKind::Dna4.ambiguous_bases().is_empty());
    }

    #[test]
    fn test_qualities() {
        let phred = AlphabetKind::Phred42;
        assert_eq!(phred.char_to_rank(b'!'), 0);
        assert_eq!(phred.char_to_rank(b'I'), 40);
        assert_eq!(phred.char_to_rank(b'K'), 42);
        assert_eq!(phred.char_to_rank(b'L'), DEFAULT_UNKNOWN_RANK);
        assert_eq!(AlphabetKind::Phred68Solexa.char_to_rank(b';'), 0);
        assert_eq!(AlphabetKind::Phred68Solexa.char_to_rank(b'h'), 45);
        assert_eq!(AlphabetKind::Phred94.rank_to_char(94), 0x7f);
    }

    #[test]
    fn test_with_sentinels() {
        let dna = AlphabetKind::Dna4.with_sentinels(4, b'?').unwrap();
        assert_eq!(dna.char_to_rank(b'N'), 4);
        assert_eq!(dna.rank_to_char(4), b'?');
        assert!(AlphabetKind::Dna4.with_sentinels(3, b'?').is_err());
    }

    #[test]
    fn test_parse_names() {
        for kind in AlphabetKind::ALL {
            assert_eq!(kind.to_string().parse::<AlphabetKind>().unwrap(), kind);
        }
        assert_eq!("DNA5".parse::<AlphabetKind>().unwrap(), AlphabetKind::Dna5);
        assert_eq!(
            "dna6".parse::<AlphabetKind>().unwrap_err(),
            AlphabetError::UnknownAlphabet("dna6".to_string())
        );
    }

    #[test]
    fn test_delimited_builtin() {
        let dna = AlphabetKind::Dna4.table().delimited().unwrap();
        assert_eq!(dna.size(), 5);
        assert_eq!(dna.char_to_rank(b'$'), 0);
        assert_eq!(dna.char_to_rank(b't'), 4);
        let aa = AlphabetKind::Aa20.table().delimited().unwrap();
        assert!(aa.complement().is_none());
        assert_eq!(aa.rank_to_char(1), b'A');
    }
}
