//! Proof-of-work helpers.
//!
//! Difficulty counts leading `'0'` characters of the lowercase hex rendering
//! of a block hash, so each unit of difficulty is one nibble (4 bits).

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::Hash;

pub fn count_leading_zero_nibbles(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 2;
        } else {
            if b >> 4 == 0 {
                total += 1;
            }
            break;
        }
    }
    total
}

/// The string a mined hash's hex rendering must start with.
pub fn target_prefix(difficulty: u32) -> String {
    "0".repeat(difficulty as usize)
}

pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    count_leading_zero_nibbles(hash) >= difficulty
}

/// SHA-256 over the fixed part of a block preimage followed by the decimal
/// rendering of `nonce`.
pub fn hash_with_nonce(prefix: &[u8], nonce: u64) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(nonce.to_string().as_bytes());
    hasher.finalize().into()
}

/// Highest nonce a search may try; `None` when no attempt is allowed.
/// Without a ceiling every `u64`, `u64::MAX` included, is in range.
pub fn last_nonce(max_attempts: Option<u64>) -> Option<u64> {
    match max_attempts {
        Some(limit) => limit.checked_sub(1),
        None => Some(u64::MAX),
    }
}

/// Walks nonces upward from 0 and returns the first one whose hash meets
/// `difficulty`. `max_attempts` of `None` searches the whole `u64` range.
pub fn search_nonce(
    prefix: &[u8],
    difficulty: u32,
    max_attempts: Option<u64>,
) -> Option<(u64, Hash)> {
    let last = last_nonce(max_attempts)?;
    (0..=last).find_map(|nonce| {
        let hash = hash_with_nonce(prefix, nonce);
        meets_difficulty(&hash, difficulty).then_some((nonce, hash))
    })
}

/// Same search split across the rayon pool. `find_first` keeps the lowest
/// satisfying nonce, so the result matches [`search_nonce`].
pub fn search_nonce_parallel(
    prefix: &[u8],
    difficulty: u32,
    max_attempts: Option<u64>,
) -> Option<(u64, Hash)> {
    let last = last_nonce(max_attempts)?;
    (0..=last)
        .into_par_iter()
        .find_first(|nonce| meets_difficulty(&hash_with_nonce(prefix, *nonce), difficulty))
        .map(|nonce| (nonce, hash_with_nonce(prefix, nonce)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zero_nibbles_examples() {
        let mut h = [0u8; 32];
        assert_eq!(count_leading_zero_nibbles(&h), 64);
        h[0] = 0x0F;
        assert_eq!(count_leading_zero_nibbles(&h), 1);
        h[0] = 0xF0;
        assert_eq!(count_leading_zero_nibbles(&h), 0);
        h = [0u8; 32];
        h[1] = 0x80;
        assert_eq!(count_leading_zero_nibbles(&h), 2);
        h[1] = 0x08;
        assert_eq!(count_leading_zero_nibbles(&h), 3);
    }

    #[test]
    fn nibble_count_agrees_with_hex_rendering() {
        let samples: [Hash; 4] = [[0u8; 32], [0xAB; 32], [0x01; 32], {
            let mut h = [0u8; 32];
            h[3] = 0x3C;
            h
        }];
        for hash in samples {
            let rendered = hex::encode(hash);
            for d in 0..=8 {
                assert_eq!(
                    meets_difficulty(&hash, d),
                    rendered.starts_with(&target_prefix(d)),
                    "difficulty {d} on {rendered}"
                );
            }
        }
    }

    #[test]
    fn target_prefix_repeats_zero() {
        assert_eq!(target_prefix(0), "");
        assert_eq!(target_prefix(3), "000");
    }

    #[test]
    fn hash_with_nonce_uses_decimal_nonce() {
        let expected: Hash = Sha256::digest(b"prefix42").into();
        assert_eq!(hash_with_nonce(b"prefix", 42), expected);
    }

    #[test]
    fn zero_difficulty_accepts_nonce_zero() {
        let (nonce, hash) = search_nonce(b"anything", 0, None).unwrap();
        assert_eq!(nonce, 0);
        assert_eq!(hash, hash_with_nonce(b"anything", 0));
    }

    #[test]
    fn search_finds_the_first_satisfying_nonce() {
        let (nonce, hash) = search_nonce(b"block", 2, None).unwrap();
        assert!(meets_difficulty(&hash, 2));
        for earlier in 0..nonce {
            assert!(!meets_difficulty(&hash_with_nonce(b"block", earlier), 2));
        }
    }

    #[test]
    fn parallel_search_matches_sequential() {
        let sequential = search_nonce(b"parallel", 2, None);
        let parallel = search_nonce_parallel(b"parallel", 2, None);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn unbounded_search_covers_every_nonce() {
        assert_eq!(last_nonce(None), Some(u64::MAX));
        assert_eq!(last_nonce(Some(16)), Some(15));
        assert_eq!(last_nonce(Some(1)), Some(0));
        assert_eq!(last_nonce(Some(0)), None);
    }

    #[test]
    fn single_attempt_tries_nonce_zero() {
        assert_eq!(search_nonce(b"one", 0, Some(1)).map(|(n, _)| n), Some(0));
        assert_eq!(search_nonce_parallel(b"one", 0, Some(1)).map(|(n, _)| n), Some(0));
    }

    #[test]
    fn attempt_ceiling_stops_the_search() {
        assert_eq!(search_nonce(b"bounded", 64, Some(16)), None);
        assert_eq!(search_nonce_parallel(b"bounded", 64, Some(16)), None);
        assert_eq!(search_nonce(b"bounded", 1, Some(0)), None);
    }
}
