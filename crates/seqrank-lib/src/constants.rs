//! Constants and defaults for seqrank
//!
//! Sentinel values, default k-mer/window parameters and a few small
//! arithmetic helpers shared by the alphabet and encoder modules.

/// Rank reported for characters outside the alphabet
pub const DEFAULT_UNKNOWN_RANK: u8 = 255;

/// Character reported for ranks outside the alphabet (NUL)
pub const DEFAULT_UNKNOWN_CHAR: u8 = b'\0';

/// Terminator symbol placed at rank 0 of a delimited alphabet
pub const DELIMITER: u8 = b'$';

/// Default XOR mask applied to k-mer hashes
pub const DEFAULT_SEED: u64 = 0;

/// Default k-mer length
pub const DEFAULT_K: usize = 21;

/// Default number of consecutive k-mers per minimizer window
pub const DEFAULT_WINDOW: usize = 11;

/// Largest alphabet size a table can hold while leaving room for the sentinel rank
pub const MAX_SIGMA: usize = 255;

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Largest k for which `sigma^k` still fits into a `u64`.
///
/// Beyond this length the rolling hash keeps working but wraps modulo 2^64,
/// so distinct k-mers may collide. Returns `usize::MAX` for `sigma <= 1`.
pub const fn max_k_without_wrap(sigma: u64) -> usize {
    if sigma <= 1 {
        return usize::MAX;
    }
    let mut k = 0;
    let mut acc: u64 = 1;
    loop {
        match acc.checked_mul(sigma) {
            Some(next) => {
                acc = next;
                k += 1;
            }
            None => return k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_k_without_wrap() {
        // 4^32 = 2^64 overflows, 4^31 does not
        assert_eq!(max_k_without_wrap(4), 31);
        assert_eq!(max_k_without_wrap(2), 63);
        assert_eq!(max_k_without_wrap(5), 27);
        assert_eq!(max_k_without_wrap(1), usize::MAX);
        assert_eq!(max_k_without_wrap(0), usize::MAX);
    }

    #[test]
    fn test_sentinels_are_outside_any_table() {
        assert!((DEFAULT_UNKNOWN_RANK as usize) >= MAX_SIGMA);
        assert_eq!(DEFAULT_UNKNOWN_CHAR, 0);
    }
}
