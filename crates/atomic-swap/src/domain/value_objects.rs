//! # Domain Value Objects
//!
//! Immutable value types for the atomic swap subsystem.

use super::errors::{Hash, SwapError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a local account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a random number hash in bytes.
pub const RANDOM_NUMBER_HASH_LENGTH: usize = 32;

/// Length of a claim random number in bytes.
pub const RANDOM_NUMBER_LENGTH: usize = 32;

/// Content-addressed swap identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwapId(Hash);

impl SwapId {
    /// Wrap raw hash bytes.
    pub fn new(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, SwapError> {
        let bytes = hex::decode(s).map_err(|e| SwapError::InvalidGenesis(e.to_string()))?;
        let hash: Hash = bytes.as_slice().try_into().map_err(|_| {
            SwapError::InvalidGenesis(format!("swap id must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(hash))
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwapId({})", hex::encode(self.0))
    }
}

impl Serialize for SwapId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for SwapId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Variable-length byte string, hex encoded on the wire.
///
/// Lengths are checked by validation, not by the type, so that a malformed
/// snapshot can be decoded and then rejected with a precise error.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Hash> for HexBytes {
    fn from(bytes: Hash) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map(Self).map_err(serde::de::Error::custom)
    }
}

/// Local-ledger account address.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccAddress(HexBytes);

impl AccAddress {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(HexBytes::new(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check non-empty and exactly [`ADDRESS_LENGTH`] bytes.
    pub fn validate(&self, role: &str) -> Result<(), SwapError> {
        if self.is_empty() {
            return Err(SwapError::InvalidAddress(format!("{role} cannot be empty")));
        }
        if self.0.len() != ADDRESS_LENGTH {
            return Err(SwapError::InvalidAddress(format!(
                "{role}: expected address length {ADDRESS_LENGTH}, got {}",
                self.0.len()
            )));
        }
        Ok(())
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccAddress({})", self.0)
    }
}

/// Swap status state machine.
///
/// ```text
/// Open ──claim──▶ Completed
///   └──refund / sweep──▶ Expired
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapStatus {
    /// Funds locked, awaiting claim or expiry.
    Open,
    /// Claimed with a valid preimage.
    Completed,
    /// Expired and refunded.
    Expired,
}

impl SwapStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwapStatus) -> bool {
        match (self, next) {
            (Self::Open, Self::Completed) => true,
            (Self::Open, Self::Expired) => true,
            (Self::Open, Self::Open) | (Self::Completed, _) | (Self::Expired, _) => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Open => false,
            Self::Completed | Self::Expired => true,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Completed => "Completed",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for SwapStatus {
    type Error = SwapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Open),
            0x02 => Ok(Self::Completed),
            0x03 => Ok(Self::Expired),
            other => Err(SwapError::InvalidStatus(format!("0x{other:02x}"))),
        }
    }
}

impl std::str::FromStr for SwapStatus {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" | "open" => Ok(Self::Open),
            "Completed" | "completed" => Ok(Self::Completed),
            "Expired" | "expired" => Ok(Self::Expired),
            other => Err(SwapError::InvalidStatus(other.to_string())),
        }
    }
}

impl Serialize for SwapStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SwapStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Direction of value across the chain boundary, relative to this ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Deputy sends pegged asset into this ledger.
    Incoming,
    /// User sends pegged asset out to the deputy.
    Outgoing,
}

impl SwapDirection {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
        }
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for SwapDirection {
    type Error = SwapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Incoming),
            0x02 => Ok(Self::Outgoing),
            other => Err(SwapError::InvalidDirection(format!("0x{other:02x}"))),
        }
    }
}

impl std::str::FromStr for SwapDirection {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Incoming" | "incoming" | "inc" | "I" | "i" => Ok(Self::Incoming),
            "Outgoing" | "outgoing" | "out" | "O" | "o" => Ok(Self::Outgoing),
            other => Err(SwapError::InvalidDirection(other.to_string())),
        }
    }
}

impl Serialize for SwapDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SwapDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Block context supplied by the host at the start of each round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block height.
    pub height: u64,
    /// Block time, Unix seconds.
    pub time: u64,
}

impl BlockInfo {
    /// Create a new block context.
    pub fn new(height: u64, time: u64) -> Self {
        Self { height, time }
    }
}
