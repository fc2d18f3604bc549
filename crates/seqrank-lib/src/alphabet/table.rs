//! Table-driven alphabet construction
//!
//! [`AlphabetBuilder`] turns a list of [`SymbolMapping`]s into an
//! [`AlphabetTable`]: four 256-entry arrays (char -> rank, rank -> char,
//! char -> primary char, rank -> complement rank). Each table is filled with
//! its sentinel and then written once per mapping, so construction is O(256)
//! and every lookup afterwards is a plain index.

use std::fmt;

use thiserror::Error;

use super::{Alphabet, Complement};
use crate::constants::{DEFAULT_UNKNOWN_CHAR, DEFAULT_UNKNOWN_RANK, DELIMITER, MAX_SIGMA};

/// Error type for alphabet construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// No symbol mappings were given
    #[error("Alphabet '{0}' has no symbols")]
    Empty(String),
    /// More ranks than fit next to the sentinel rank
    #[error("Alphabet has {count} symbols, at most {max} are supported", max = MAX_SIGMA)]
    TooManySymbols {
        /// Number of ranks requested
        count: usize,
    },
    /// A rank outside `[0, sigma)`
    #[error("Rank {rank} is out of range for an alphabet of size {size}")]
    RankOutOfRange {
        /// Offending rank
        rank: u8,
        /// Alphabet size
        size: usize,
    },
    /// Two mappings share a rank
    #[error("Rank {0} is defined more than once")]
    DuplicateRank(u8),
    /// A symbol maps to two different ranks
    #[error("Symbol {symbol:?} maps to both rank {first} and rank {second}")]
    ConflictingSymbol {
        /// Offending symbol
        symbol: char,
        /// Rank it was first assigned to
        first: u8,
        /// Rank it was assigned to again
        second: u8,
    },
    /// A complement symbol that is not part of the alphabet
    #[error("Complement {symbol:?} of rank {rank} is not a symbol of the alphabet")]
    UnknownComplement {
        /// Rank declaring the complement
        rank: u8,
        /// Complement symbol
        symbol: char,
    },
    /// Complementing a rank twice does not give the rank back
    #[error("Complement of the complement of rank {rank} is rank {back}")]
    NonInvolutiveComplement {
        /// Rank whose double complement differs
        rank: u8,
        /// Rank reached after complementing twice
        back: u8,
    },
    /// Only some of the mappings declare a complement
    #[error("Rank {0} has no complement while other ranks do")]
    PartialComplement(u8),
    /// The sentinel rank is a valid rank of the alphabet
    #[error("Unknown rank {rank} collides with an alphabet of size {size}")]
    RankSentinelCollision {
        /// Sentinel rank
        rank: u8,
        /// Alphabet size
        size: usize,
    },
    /// The sentinel char is a recognised symbol
    #[error("Unknown char {0:?} is a symbol of the alphabet")]
    CharSentinelCollision(char),
    /// An ambiguous symbol or one of its alternatives is not in the alphabet
    #[error("Ambiguous symbol {0:?} is not a symbol of the alphabet")]
    UnknownAmbiguousSymbol(char),
    /// The delimiter is already a symbol of the alphabet being delimited
    #[error("Delimiter '$' is already a symbol of alphabet '{alphabet}'")]
    DelimiterInUse {
        /// Name of the alphabet
        alphabet: String,
    },
    /// A ranged alphabet whose characters would run past 255
    #[error("Ranged alphabet with offset {offset} and maximum {max_value} exceeds the byte range")]
    RangeOverflow {
        /// First character
        offset: u8,
        /// Highest value
        max_value: u8,
    },
    /// No built-in alphabet with this name
    #[error("Unknown alphabet: {0}")]
    UnknownAlphabet(String),
}

/// Declarative description of one canonical rank
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolMapping<'a> {
    /// Rank in `[0, sigma)`
    pub rank: u8,
    /// Canonical symbol, returned by `rank_to_char` and `normalize_char`
    pub primary: u8,
    /// Further symbols mapping to the same rank
    pub aliases: &'a [u8],
    /// Symbol of the complementary rank, if the alphabet complements
    pub complement: Option<u8>,
}

impl<'a> SymbolMapping<'a> {
    /// Mapping without complement
    pub const fn new(rank: u8, primary: u8, aliases: &'a [u8]) -> Self {
        Self {
            rank,
            primary,
            aliases,
            complement: None,
        }
    }

    /// Mapping with a complement symbol
    pub const fn complemented(rank: u8, primary: u8, complement: u8, aliases: &'a [u8]) -> Self {
        Self {
            rank,
            primary,
            aliases,
            complement: Some(complement),
        }
    }

    fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        std::iter::once(self.primary).chain(self.aliases.iter().copied())
    }
}

/// An ambiguity code and the concrete symbols it may stand for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmbiguousSymbol<'a> {
    /// The ambiguous symbol (must itself be a symbol of the alphabet)
    pub symbol: u8,
    /// Concrete symbols it may represent
    pub alternatives: &'a [u8],
}

impl<'a> AmbiguousSymbol<'a> {
    /// Create an ambiguity entry
    pub const fn new(symbol: u8, alternatives: &'a [u8]) -> Self {
        Self {
            symbol,
            alternatives,
        }
    }
}

/// Builder for [`AlphabetTable`]
///
/// # Example
/// ```
/// use seqrank_lib::alphabet::{Alphabet, AlphabetBuilder, SymbolMapping};
///
/// let purine = AlphabetBuilder::new("ry", &[
///     SymbolMapping::complemented(0, b'R', b'Y', b"rAaGg"),
///     SymbolMapping::complemented(1, b'Y', b'R', b"yCcTt"),
/// ])
/// .build()
/// .unwrap();
///
/// assert_eq!(purine.char_to_rank(b'g'), 0);
/// assert_eq!(purine.normalize_char(b't'), b'Y');
/// assert_eq!(purine.complement().unwrap().complement_char(b'A'), b'Y');
/// ```
#[derive(Clone, Debug)]
pub struct AlphabetBuilder<'a> {
    name: String,
    mappings: &'a [SymbolMapping<'a>],
    ambiguous: &'a [AmbiguousSymbol<'a>],
    unknown_rank: u8,
    unknown_char: u8,
}

impl<'a> AlphabetBuilder<'a> {
    /// Start a builder from the rank mappings
    pub fn new(name: impl Into<String>, mappings: &'a [SymbolMapping<'a>]) -> Self {
        Self {
            name: name.into(),
            mappings,
            ambiguous: &[],
            unknown_rank: DEFAULT_UNKNOWN_RANK,
            unknown_char: DEFAULT_UNKNOWN_CHAR,
        }
    }

    /// Declare ambiguity codes
    pub fn ambiguous(mut self, ambiguous: &'a [AmbiguousSymbol<'a>]) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    /// Rank reported for unknown symbols (default 255)
    pub fn unknown_rank(mut self, rank: u8) -> Self {
        self.unknown_rank = rank;
        self
    }

    /// Character reported for unknown ranks (default NUL)
    pub fn unknown_char(mut self, c: u8) -> Self {
        self.unknown_char = c;
        self
    }

    /// Validate the mappings and build the lookup tables
    pub fn build(self) -> Result<AlphabetTable, AlphabetError> {
        self.validate()?;
        let table = self.assemble();
        tracing::debug!(
            "Built alphabet '{}' (sigma={}, complement={}, ambiguous={})",
            table.name,
            table.size,
            table.rank_complement.is_some(),
            table.ambiguous_bases.len()
        );
        Ok(table)
    }

    fn validate(&self) -> Result<(), AlphabetError> {
        let size = self.mappings.len();
        if size == 0 {
            return Err(AlphabetError::Empty(self.name.clone()));
        }
        if size > MAX_SIGMA {
            return Err(AlphabetError::TooManySymbols { count: size });
        }

        // size entries, each in range and none repeated: rank <-> primary is a bijection
        let mut seen_rank = [false; 256];
        for m in self.mappings {
            if m.rank as usize >= size {
                return Err(AlphabetError::RankOutOfRange { rank: m.rank, size });
            }
            if std::mem::replace(&mut seen_rank[m.rank as usize], true) {
                return Err(AlphabetError::DuplicateRank(m.rank));
            }
        }

        let mut owner: [Option<u8>; 256] = [None; 256];
        for m in self.mappings {
            for c in m.symbols() {
                match owner[c as usize] {
                    Some(first) if first != m.rank => {
                        return Err(AlphabetError::ConflictingSymbol {
                            symbol: char::from(c),
                            first,
                            second: m.rank,
                        });
                    }
                    _ => owner[c as usize] = Some(m.rank),
                }
            }
        }

        let complemented = self.mappings.iter().filter(|m| m.complement.is_some()).count();
        if complemented > 0 {
            for m in self.mappings {
                match m.complement {
                    None => return Err(AlphabetError::PartialComplement(m.rank)),
                    Some(c) if owner[c as usize].is_none() => {
                        return Err(AlphabetError::UnknownComplement {
                            rank: m.rank,
                            symbol: char::from(c),
                        });
                    }
                    Some(_) => {}
                }
            }

            let mut complement_of = [0u8; 256];
            for m in self.mappings {
                if let Some(c) = m.complement.and_then(|c| owner[c as usize]) {
                    complement_of[m.rank as usize] = c;
                }
            }
            for rank in 0..size {
                let back = complement_of[complement_of[rank] as usize];
                if back as usize != rank {
                    return Err(AlphabetError::NonInvolutiveComplement {
                        rank: rank as u8,
                        back,
                    });
                }
            }
        }

        if (self.unknown_rank as usize) < size {
            return Err(AlphabetError::RankSentinelCollision {
                rank: self.unknown_rank,
                size,
            });
        }
        if owner[self.unknown_char as usize].is_some() {
            return Err(AlphabetError::CharSentinelCollision(char::from(self.unknown_char)));
        }

        for amb in self.ambiguous {
            for c in std::iter::once(amb.symbol).chain(amb.alternatives.iter().copied()) {
                if owner[c as usize].is_none() {
                    return Err(AlphabetError::UnknownAmbiguousSymbol(char::from(c)));
                }
            }
        }

        Ok(())
    }

    /// Build the tables without validation; callers guarantee well-formed mappings
    pub(crate) fn assemble(&self) -> AlphabetTable {
        let mut char_to_rank = [self.unknown_rank; 256];
        let mut rank_to_char = [self.unknown_char; 256];
        let mut normalize = [self.unknown_char; 256];

        for m in self.mappings {
            rank_to_char[m.rank as usize] = m.primary;
            for c in m.symbols() {
                char_to_rank[c as usize] = m.rank;
                normalize[c as usize] = m.primary;
            }
        }

        let rank_complement = if self.mappings.iter().all(|m| m.complement.is_some()) {
            let mut table = [self.unknown_rank; 256];
            for m in self.mappings {
                if let Some(c) = m.complement {
                    table[m.rank as usize] = char_to_rank[c as usize];
                }
            }
            Some(table)
        } else {
            None
        };

        let mut ambiguous_bases: Vec<u8> = Vec::new();
        let mut alternatives: Vec<Vec<u8>> = Vec::new();
        for amb in self.ambiguous {
            let rank = char_to_rank[amb.symbol as usize];
            let ranks = amb.alternatives.iter().map(|&c| char_to_rank[c as usize]);
            // repeated entries for one rank accumulate their alternatives
            match ambiguous_bases.iter().position(|&r| r == rank) {
                Some(i) => alternatives[i].extend(ranks),
                None => {
                    ambiguous_bases.push(rank);
                    alternatives.push(ranks.collect());
                }
            }
        }

        AlphabetTable {
            name: self.name.clone(),
            size: self.mappings.len(),
            unknown_rank: self.unknown_rank,
            unknown_char: self.unknown_char,
            char_to_rank,
            rank_to_char,
            normalize,
            rank_complement,
            ambiguous_bases,
            alternatives,
        }
    }
}

/// Rank mappings `0..=max_value` -> `offset + rank`, used for quality alphabets
pub(crate) fn ranged_mappings(max_value: u8, offset: u8) -> Vec<SymbolMapping<'static>> {
    (0..=max_value)
        .map(|rank| SymbolMapping::new(rank, offset + rank, &[]))
        .collect()
}

/// Immutable lookup tables of one alphabet
#[derive(Clone)]
pub struct AlphabetTable {
    name: String,
    size: usize,
    unknown_rank: u8,
    unknown_char: u8,
    char_to_rank: [u8; 256],
    rank_to_char: [u8; 256],
    normalize: [u8; 256],
    rank_complement: Option<[u8; 256]>,
    ambiguous_bases: Vec<u8>,
    alternatives: Vec<Vec<u8>>,
}

impl AlphabetTable {
    /// Alphabet whose ranks `0..=max_value` are the characters `offset..=offset+max_value`
    ///
    /// This is the shape of Phred quality encodings (`!` = 0 for Sanger,
    /// `;` for Solexa).
    pub fn ranged(name: impl Into<String>, max_value: u8, offset: u8) -> Result<Self, AlphabetError> {
        if offset.checked_add(max_value).is_none() {
            return Err(AlphabetError::RangeOverflow { offset, max_value });
        }
        let mappings = ranged_mappings(max_value, offset);
        AlphabetBuilder::new(name, &mappings).build()
    }

    /// Same alphabet with `$` inserted at rank 0 and every other rank shifted up by one
    ///
    /// Needed by suffix-structure indexing, which requires a terminator that
    /// sorts before every other symbol.
    pub fn delimited(&self) -> Result<Self, AlphabetError> {
        let size = self.size + 1;
        if size > MAX_SIGMA {
            return Err(AlphabetError::TooManySymbols { count: size });
        }
        if (self.unknown_rank as usize) < size {
            return Err(AlphabetError::RankSentinelCollision {
                rank: self.unknown_rank,
                size,
            });
        }
        if self.char_to_rank[DELIMITER as usize] != self.unknown_rank {
            return Err(AlphabetError::DelimiterInUse {
                alphabet: self.name.clone(),
            });
        }
        if self.unknown_char == DELIMITER {
            return Err(AlphabetError::CharSentinelCollision(char::from(DELIMITER)));
        }

        let shift = |rank: u8| {
            if rank == self.unknown_rank {
                rank
            } else {
                rank + 1
            }
        };

        let mut char_to_rank = self.char_to_rank.map(shift);
        char_to_rank[DELIMITER as usize] = 0;

        let mut rank_to_char = [self.unknown_char; 256];
        rank_to_char[0] = DELIMITER;
        rank_to_char[1..size].copy_from_slice(&self.rank_to_char[..self.size]);

        let mut normalize = self.normalize;
        normalize[DELIMITER as usize] = DELIMITER;

        let rank_complement = self.rank_complement.map(|base| {
            let mut table = [self.unknown_rank; 256];
            table[0] = 0;
            for rank in 0..self.size {
                table[rank + 1] = shift(base[rank]);
            }
            table
        });

        let table = Self {
            name: format!("{}{}", self.name, char::from(DELIMITER)),
            size,
            unknown_rank: self.unknown_rank,
            unknown_char: self.unknown_char,
            char_to_rank,
            rank_to_char,
            normalize,
            rank_complement,
            ambiguous_bases: self.ambiguous_bases.iter().map(|&r| shift(r)).collect(),
            alternatives: self
                .alternatives
                .iter()
                .map(|alts| alts.iter().map(|&r| shift(r)).collect())
                .collect(),
        };
        tracing::debug!("Built delimited alphabet '{}' (sigma={})", table.name, table.size);
        Ok(table)
    }

    /// Raw char -> rank table
    pub fn char_to_rank_table(&self) -> &[u8; 256] {
        &self.char_to_rank
    }

    /// Raw rank -> char table
    pub fn rank_to_char_table(&self) -> &[u8; 256] {
        &self.rank_to_char
    }

    /// Iterator over `(rank, primary symbol)` pairs in rank order
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.rank_to_char[..self.size]
            .iter()
            .enumerate()
            .map(|(rank, &c)| (rank as u8, c))
    }
}

impl Alphabet for AlphabetTable {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn char_to_rank(&self, c: u8) -> u8 {
        self.char_to_rank[c as usize]
    }

    #[inline]
    fn rank_to_char(&self, rank: u8) -> u8 {
        self.rank_to_char[rank as usize]
    }

    #[inline]
    fn normalize_char(&self, c: u8) -> u8 {
        self.normalize[c as usize]
    }

    fn unknown_rank(&self) -> u8 {
        self.unknown_rank
    }

    fn unknown_char(&self) -> u8 {
        self.unknown_char
    }

    fn complement(&self) -> Option<Complement<'_>> {
        self.rank_complement
            .as_ref()
            .map(|table| Complement::new(table, &self.char_to_rank, &self.rank_to_char))
    }

    fn ambiguous_bases(&self) -> &[u8] {
        &self.ambiguous_bases
    }

    fn base_alternatives(&self, rank: u8) -> &[u8] {
        self.ambiguous_bases
            .iter()
            .position(|&r| r == rank)
            .map_or(&[][..], |i| self.alternatives[i].as_slice())
    }
}

impl fmt::Debug for AlphabetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphabetTable")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("unknown_rank", &self.unknown_rank)
            .field("unknown_char", &self.unknown_char)
            .field("complement", &self.rank_complement.is_some())
            .field("ambiguous_bases", &self.ambiguous_bases)
            .finish()
    }
}
