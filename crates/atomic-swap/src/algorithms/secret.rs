//! # Random Number Generation and Verification
//!
//! A swap is locked by `SHA-256(random_number ‖ timestamp_be)`; presenting
//! the random number unlocks it.

use crate::domain::{Hash, RandomNumber, RANDOM_NUMBER_LENGTH};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure random number.
pub fn generate_random_number() -> RandomNumber {
    let mut bytes = [0u8; RANDOM_NUMBER_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    RandomNumber::new(bytes)
}

/// Hash a random number together with the swap timestamp.
pub fn calculate_random_number_hash(random_number: &RandomNumber, timestamp: u64) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(random_number.as_bytes());
    hasher.update(timestamp.to_be_bytes());
    hasher.finalize().into()
}

/// Verify that a random number unlocks `random_number_hash`.
pub fn verify_random_number(
    random_number: &RandomNumber,
    timestamp: u64,
    random_number_hash: &[u8],
) -> bool {
    calculate_random_number_hash(random_number, timestamp).as_slice() == random_number_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_number() {
        let r1 = generate_random_number();
        let r2 = generate_random_number();
        assert_ne!(r1, r2);
    }

    #[test]
    fn test_hash_deterministic() {
        let secret = RandomNumber::new([0xABu8; 32]);
        assert_eq!(
            calculate_random_number_hash(&secret, 1_700_000_000),
            calculate_random_number_hash(&secret, 1_700_000_000)
        );
    }

    #[test]
    fn test_hash_binds_timestamp() {
        let secret = RandomNumber::new([0xABu8; 32]);
        assert_ne!(
            calculate_random_number_hash(&secret, 1_700_000_000),
            calculate_random_number_hash(&secret, 1_700_000_001)
        );
    }

    #[test]
    fn test_hash_layout() {
        let secret = RandomNumber::new([0x01u8; 32]);
        let mut data = vec![0x01u8; 32];
        data.extend_from_slice(&42u64.to_be_bytes());
        let expected: Hash = Sha256::digest(&data).into();
        assert_eq!(calculate_random_number_hash(&secret, 42), expected);
    }

    #[test]
    fn test_verify_random_number() {
        let secret = generate_random_number();
        let hash = calculate_random_number_hash(&secret, 99);
        assert!(verify_random_number(&secret, 99, &hash));
        assert!(!verify_random_number(&secret, 100, &hash));
        assert!(!verify_random_number(&RandomNumber::new([0u8; 32]), 99, &hash));
    }
}
