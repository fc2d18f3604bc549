//! Sequence-level conversions
//!
//! Element-wise versions of the alphabet lookups. Each operation comes in
//! three shapes:
//! - `*_into`: writes into a caller-provided buffer of the same length
//! - allocating: returns a fresh `Vec<u8>`
//! - `view_*`: a lazy iterator that never materialises the output
//!
//! Conversions never fail on unknown symbols; they substitute the sentinel.
//! Use [`verify_char`] / [`verify_rank`] (or their alphabet-aware variants)
//! to find where a sentinel was produced.

use thiserror::Error;

use crate::alphabet::{Alphabet, Complement};
use crate::constants::{DEFAULT_UNKNOWN_CHAR, DEFAULT_UNKNOWN_RANK};

/// Error type for buffer-based conversions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The output buffer does not have the length of the input
    #[error("Output length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Input length
        expected: usize,
        /// Output length
        actual: usize,
    },
}

#[inline]
fn check_lengths(input: &[u8], output: &[u8]) -> Result<(), EncodingError> {
    if input.len() != output.len() {
        return Err(EncodingError::LengthMismatch {
            expected: input.len(),
            actual: output.len(),
        });
    }
    Ok(())
}

#[inline]
fn map_into(input: &[u8], output: &mut [u8], f: impl Fn(u8) -> u8) -> Result<(), EncodingError> {
    check_lengths(input, output)?;
    for (out, &c) in output.iter_mut().zip(input) {
        *out = f(c);
    }
    Ok(())
}

#[inline]
fn reverse_map_into(input: &[u8], output: &mut [u8], f: impl Fn(u8) -> u8) -> Result<(), EncodingError> {
    check_lengths(input, output)?;
    for (out, &c) in output.iter_mut().zip(input.iter().rev()) {
        *out = f(c);
    }
    Ok(())
}

// --- char -> rank ---

/// Convert characters to ranks into `output`
pub fn char_to_rank_into<A: Alphabet + ?Sized>(
    alphabet: &A,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EncodingError> {
    map_into(input, output, |c| alphabet.char_to_rank(c))
}

/// Convert characters to a freshly allocated rank sequence
pub fn char_to_rank<A: Alphabet + ?Sized>(alphabet: &A, input: &[u8]) -> Vec<u8> {
    view_char_to_rank(alphabet, input).collect()
}

/// Lazy char -> rank view
pub fn view_char_to_rank<'a, A: Alphabet + ?Sized>(
    alphabet: &'a A,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().map(move |&c| alphabet.char_to_rank(c))
}

// --- rank -> char ---

/// Convert ranks to characters into `output`
pub fn rank_to_char_into<A: Alphabet + ?Sized>(
    alphabet: &A,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EncodingError> {
    map_into(input, output, |r| alphabet.rank_to_char(r))
}

/// Convert ranks to a freshly allocated character sequence
pub fn rank_to_char<A: Alphabet + ?Sized>(alphabet: &A, input: &[u8]) -> Vec<u8> {
    view_rank_to_char(alphabet, input).collect()
}

/// Lazy rank -> char view
pub fn view_rank_to_char<'a, A: Alphabet + ?Sized>(
    alphabet: &'a A,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().map(move |&r| alphabet.rank_to_char(r))
}

// --- normalisation ---

/// Replace every symbol by its primary representation into `output`
pub fn normalize_char_into<A: Alphabet + ?Sized>(
    alphabet: &A,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EncodingError> {
    map_into(input, output, |c| alphabet.normalize_char(c))
}

/// Normalised copy of a character sequence
pub fn normalize_char<A: Alphabet + ?Sized>(alphabet: &A, input: &[u8]) -> Vec<u8> {
    view_normalize_char(alphabet, input).collect()
}

/// Lazy normalisation view
pub fn view_normalize_char<'a, A: Alphabet + ?Sized>(
    alphabet: &'a A,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().map(move |&c| alphabet.normalize_char(c))
}

// --- complement ---

/// Complement a rank sequence into `output`
pub fn complement_rank_into(comp: Complement<'_>, input: &[u8], output: &mut [u8]) -> Result<(), EncodingError> {
    map_into(input, output, |r| comp.complement_rank(r))
}

/// Complemented copy of a rank sequence
pub fn complement_rank(comp: Complement<'_>, input: &[u8]) -> Vec<u8> {
    view_complement_rank(comp, input).collect()
}

/// Lazy rank complement view
pub fn view_complement_rank<'a>(
    comp: Complement<'a>,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().map(move |&r| comp.complement_rank(r))
}

/// Complement a character sequence into `output`
pub fn complement_char_into(comp: Complement<'_>, input: &[u8], output: &mut [u8]) -> Result<(), EncodingError> {
    map_into(input, output, |c| comp.complement_char(c))
}

/// Complemented copy of a character sequence
pub fn complement_char(comp: Complement<'_>, input: &[u8]) -> Vec<u8> {
    view_complement_char(comp, input).collect()
}

/// Lazy character complement view
pub fn view_complement_char<'a>(
    comp: Complement<'a>,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().map(move |&c| comp.complement_char(c))
}

// --- reverse complement ---

/// Reverse complement of a rank sequence into `output` (`out[i] = comp(in[n-1-i])`)
pub fn reverse_complement_rank_into(
    comp: Complement<'_>,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EncodingError> {
    reverse_map_into(input, output, |r| comp.complement_rank(r))
}

/// Reverse complement of a rank sequence
pub fn reverse_complement_rank(comp: Complement<'_>, input: &[u8]) -> Vec<u8> {
    view_reverse_complement_rank(comp, input).collect()
}

/// Lazy reverse complement view over ranks
pub fn view_reverse_complement_rank<'a>(
    comp: Complement<'a>,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().rev().map(move |&r| comp.complement_rank(r))
}

/// Reverse complement of a character sequence into `output`
pub fn reverse_complement_char_into(
    comp: Complement<'_>,
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EncodingError> {
    reverse_map_into(input, output, |c| comp.complement_char(c))
}

/// Reverse complement of a character sequence
pub fn reverse_complement_char(comp: Complement<'_>, input: &[u8]) -> Vec<u8> {
    view_reverse_complement_char(comp, input).collect()
}

/// Lazy reverse complement view over characters
pub fn view_reverse_complement_char<'a>(
    comp: Complement<'a>,
    input: &'a [u8],
) -> impl ExactSizeIterator<Item = u8> + DoubleEndedIterator + 'a {
    input.iter().rev().map(move |&c| comp.complement_char(c))
}

// --- verification ---

/// Position of the first NUL (the default unknown char), if any
pub fn verify_char(input: &[u8]) -> Option<usize> {
    input.iter().position(|&c| c == DEFAULT_UNKNOWN_CHAR)
}

/// Position of the first 255 (the default unknown rank), if any
pub fn verify_rank(input: &[u8]) -> Option<usize> {
    input.iter().position(|&r| r == DEFAULT_UNKNOWN_RANK)
}

/// Position of the first character the alphabet does not recognise
pub fn verify_char_with<A: Alphabet + ?Sized>(alphabet: &A, input: &[u8]) -> Option<usize> {
    let unknown = alphabet.unknown_rank();
    input.iter().position(|&c| alphabet.char_to_rank(c) == unknown)
}

/// Position of the first rank that is the alphabet's sentinel or not below sigma
pub fn verify_rank_with<A: Alphabet + ?Sized>(alphabet: &A, input: &[u8]) -> Option<usize> {
    let unknown = alphabet.unknown_rank();
    let size = alphabet.size();
    input.iter().position(|&r| r == unknown || r as usize >= size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::AlphabetKind;

    #[test]
    fn test_char_to_rank_shapes() {
        let dna = AlphabetKind::Dna5.table();
        let input = b"ACGnACGt";
        let expected = vec![0, 1, 2, 4, 0, 1, 2, 3];

        assert_eq!(char_to_rank(dna, input), expected);

        let mut out = vec![0u8; input.len()];
        char_to_rank_into(dna, input, &mut out).unwrap();
        assert_eq!(out, expected);

        assert!(view_char_to_rank(dna, input).eq(expected.iter().copied()));
        assert_eq!(view_char_to_rank(dna, input).len(), input.len());
    }

    #[test]
    fn test_unknown_symbols_become_sentinels() {
        let dna = AlphabetKind::Dna4.table();
        assert_eq!(char_to_rank(dna, b"AXN-"), vec![0, 255, 255, 255]);
        assert_eq!(rank_to_char(dna, &[3, 4, 255]), b"T\0\0".to_vec());
        assert_eq!(normalize_char(dna, b"acgtn"), b"ACGT\0".to_vec());
    }

    #[test]
    fn test_length_mismatch() {
        let dna = AlphabetKind::Dna4.table();
        let mut out = [0u8; 3];
        assert_eq!(
            char_to_rank_into(dna, b"ACGT", &mut out),
            Err(EncodingError::LengthMismatch { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_rank_to_char_and_normalize() {
        let aa = AlphabetKind::Aa20.table();
        assert_eq!(rank_to_char(aa, &[0, 1, 19]), b"ACY".to_vec());
        assert_eq!(normalize_char(aa, b"uBzJo*x"), b"CDELLWS".to_vec());

        let mut out = [0u8; 3];
        rank_to_char_into(aa, &[2, 3, 4], &mut out).unwrap();
        assert_eq!(&out, b"DEF");
        normalize_char_into(aa, b"abc", &mut out).unwrap();
        assert_eq!(&out, b"ADC");
    }

    #[test]
    fn test_complements() {
        let comp = AlphabetKind::Dna4.table().complement().unwrap();
        assert_eq!(complement_rank(comp, &[0, 1, 2, 3]), vec![3, 2, 1, 0]);
        assert_eq!(complement_char(comp, b"AcGt"), b"TGCA".to_vec());
        assert_eq!(reverse_complement_rank(comp, &[0, 0, 1, 2]), vec![1, 2, 3, 3]);
        assert_eq!(reverse_complement_char(comp, b"GATTACA"), b"TGTAATC".to_vec());

        let mut out = [0u8; 4];
        reverse_complement_char_into(comp, b"AACG", &mut out).unwrap();
        assert_eq!(&out, b"CGTT");
        complement_char_into(comp, b"AACG", &mut out).unwrap();
        assert_eq!(&out, b"TTGC");
        complement_rank_into(comp, &[0, 0, 1, 2], &mut out).unwrap();
        assert_eq!(out, [3, 3, 2, 1]);
        reverse_complement_rank_into(comp, &[0, 0, 1, 2], &mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 3]);

        assert!(view_reverse_complement_char(comp, b"AC").eq(b"GT".iter().copied()));
        assert!(view_complement_char(comp, b"AC").eq(b"TG".iter().copied()));
        assert!(view_reverse_complement_rank(comp, &[0, 1]).eq([2, 3]));
        assert!(view_complement_rank(comp, &[0, 1]).eq([3, 2]));
    }

    #[test]
    fn test_reverse_complement_antisymmetry() {
        for kind in AlphabetKind::ALL {
            let Some(comp) = kind.table().complement() else { continue };
            let seq = b"ACGTNRYSWKMBDHVUacgtx-.";
            let ranks = char_to_rank(kind.table(), seq);
            let twice = reverse_complement_rank(comp, &reverse_complement_rank(comp, &ranks));
            assert_eq!(twice, ranks, "{}", kind);

            let normalized = normalize_char(kind.table(), seq);
            let twice = reverse_complement_char(comp, &reverse_complement_char(comp, &normalized));
            assert_eq!(twice, normalized, "{}", kind);
        }
    }

    #[test]
    fn test_verify() {
        assert_eq!(verify_char(b"ACGT"), None);
        assert_eq!(verify_char(b"ACG\0T"), Some(3));
        assert_eq!(verify_rank(&[0, 1, 2, 3, 128, 254]), None);
        assert_eq!(verify_rank(&[0, 1, 2, 3, 255, 128, 254]), Some(4));
    }

    #[test]
    fn test_verify_with_alphabet() {
        let dna = AlphabetKind::Dna4;
        assert_eq!(verify_char_with(&dna, b"ACGTacgt"), None);
        assert_eq!(verify_char_with(&dna, b"ACGNT"), Some(3));
        assert_eq!(verify_rank_with(&dna, &[0, 1, 2, 3]), None);
        assert_eq!(verify_rank_with(&dna, &[0, 1, 4, 255]), Some(2));

        let custom = AlphabetKind::Dna4.with_sentinels(200, b'?').unwrap();
        assert_eq!(verify_rank_with(&custom, &[0, 200]), Some(1));
        assert_eq!(verify_char_with(&custom, b"A?"), Some(1));
    }
}
