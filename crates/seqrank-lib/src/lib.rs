// seqrank: alphabets, rank encodings and rolling k-mer hashing
//
// Symbol/rank tables for nucleotide, amino-acid and quality alphabets,
// sequence conversions over them, rolling k-mer hashes and winnowing
// minimizers.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod alphabet;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod hasher;
pub mod kmer;
pub mod minimizer;

// Re-export common types at crate root
pub use alphabet::{Alphabet, AlphabetBuilder, AlphabetError, AlphabetKind, AlphabetTable, Complement};
pub use config::{ConfigError, EncoderConfig, MinimizerConfig};
pub use encoding::EncodingError;
pub use hasher::SeedFamily;
pub use kmer::{KmerEncoder, RollingHash};
pub use minimizer::{DuplicatePolicy, MinimizerInfo, WinnowingMinimizer};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }
}
