//! # Random Number (claim preimage)
//!
//! The 32-byte secret whose hash (with the swap timestamp) locks a swap.
//! The bytes are zeroed when the value is dropped and never printed.

use super::value_objects::RANDOM_NUMBER_LENGTH;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A claim preimage that zeroizes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RandomNumber {
    inner: [u8; RANDOM_NUMBER_LENGTH],
}

impl RandomNumber {
    /// Create from bytes.
    pub fn new(bytes: [u8; RANDOM_NUMBER_LENGTH]) -> Self {
        Self { inner: bytes }
    }

    /// Create from a slice (copies into fixed array).
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let inner: [u8; RANDOM_NUMBER_LENGTH] = slice.try_into().ok()?;
        Some(Self { inner })
    }

    /// Borrow the secret bytes. Do not keep the reference around.
    pub fn as_bytes(&self) -> &[u8; RANDOM_NUMBER_LENGTH] {
        &self.inner
    }
}

impl std::fmt::Debug for RandomNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RandomNumber(***)")
    }
}

impl Serialize for RandomNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for RandomNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes)
            .ok_or_else(|| serde::de::Error::custom("invalid random number length"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_number_creation() {
        let secret = RandomNumber::new([0xABu8; 32]);
        assert_eq!(secret.as_bytes()[0], 0xAB);
    }

    #[test]
    fn test_debug_hides_value() {
        let secret = RandomNumber::new([0xABu8; 32]);
        let debug_str = format!("{:?}", secret);
        assert!(!debug_str.to_lowercase().contains("ab"));
        assert!(debug_str.contains("***"));
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(RandomNumber::from_slice(&[0xCDu8; 16]).is_none());
        assert!(RandomNumber::from_slice(&[0xCDu8; 32]).is_some());
    }

    #[test]
    fn test_hex_round_trip() {
        let secret = RandomNumber::new([0x01u8; 32]);
        let json = serde_json::to_string(&secret).unwrap();
        let back: RandomNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);
    }
}
