//! # Domain Errors
//!
//! Error types for the atomic swap subsystem.
//!
//! Errors fall into four classes (see [`ErrorKind`]): structural validation,
//! policy, state and internal invariant violations. Only the last class is
//! fatal; everything else is an ordinary rejection with no side effects.

use super::value_objects::{SwapId, SwapStatus};
use thiserror::Error;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Classification of a [`SwapError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before any state is touched.
    Validation,
    /// Governance rule (caps, windows, duplicates) blocked the operation.
    Policy,
    /// The swap is not in a state that allows the operation.
    State,
    /// A collaborator broke its contract; the operation is halted.
    Internal,
}

/// Atomic swap error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    // ---------------------------------------------------------------------
    // Structural validation
    // ---------------------------------------------------------------------
    /// Amount set is empty, non-positive or malformed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Random number hash has the wrong length.
    #[error("Invalid random number hash length: expected {expected}, got {got}")]
    InvalidHashLength {
        /// Required length in bytes
        expected: usize,
        /// Length received
        got: usize,
    },

    /// Expire height is zero.
    #[error("Expire height cannot be 0")]
    InvalidExpiry,

    /// Timestamp is zero or outside the accepted window.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Local account address is empty or of the wrong length.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Counterparty-chain address is blank or too long.
    #[error("Invalid counterparty address: {0}")]
    InvalidCounterpartyAddress(String),

    /// Swap is marked completed but carries no closing block.
    #[error("Completed swap must have a non-zero closed block")]
    InvalidClosedState,

    /// Status outside the closed set.
    #[error("Invalid swap status: {0}")]
    InvalidStatus(String),

    /// Direction outside the closed set.
    #[error("Invalid swap direction: {0}")]
    InvalidDirection(String),

    /// Denomination fails the syntax check.
    #[error("Invalid denom: {0}")]
    InvalidDenom(String),

    /// Asset parameter failed validation.
    #[error("Invalid asset param {denom}: {reason}")]
    InvalidAssetParam {
        /// Offending asset
        denom: String,
        /// What was wrong
        reason: String,
    },

    /// Asset supply record failed validation.
    #[error("Invalid asset supply {denom}: {reason}")]
    InvalidAssetSupply {
        /// Offending asset
        denom: String,
        /// What was wrong
        reason: String,
    },

    /// Snapshot failed a load-time check.
    #[error("Invalid genesis state: {0}")]
    InvalidGenesis(String),

    // ---------------------------------------------------------------------
    // Policy
    // ---------------------------------------------------------------------
    /// Swap identifier already used, now or in the past.
    #[error("Atomic swap already exists: {0}")]
    DuplicateSwapId(SwapId),

    /// Denomination appears twice in a set that must be unique.
    #[error("Duplicate denom: {0}")]
    DuplicateDenom(String),

    /// Asset is not registered.
    #[error("Asset not supported: {0}")]
    AssetNotSupported(String),

    /// Asset is registered but paused.
    #[error("Asset not active: {0}")]
    AssetNotActive(String),

    /// Height span outside the asset's block-lock bounds.
    #[error("Invalid height span {span}: must be within [{min}, {max}]")]
    InvalidHeightSpan {
        /// Requested span
        span: u64,
        /// Minimum block lock
        min: u64,
        /// Maximum block lock
        max: u64,
    },

    /// Neither or both participants are the asset's deputy.
    #[error("Invalid swap participants: {0}")]
    InvalidSwapParticipants(String),

    /// Amount outside the asset's per-swap bounds.
    #[error("Swap amount {amount} {denom} outside [{min}, {max}]")]
    AmountOutOfRange {
        /// Asset
        denom: String,
        /// Requested amount
        amount: u128,
        /// Minimum swap amount
        min: u128,
        /// Maximum swap amount
        max: u128,
    },

    /// Outgoing amount does not cover the deputy's fixed fee.
    #[error("Swap amount {amount} {denom} must exceed fixed fee {fee}")]
    InsufficientAmount {
        /// Asset
        denom: String,
        /// Requested amount
        amount: u128,
        /// Fixed fee
        fee: u128,
    },

    /// Absolute supply cap would be exceeded.
    #[error("Supply limit exceeded for {denom}: requested {requested}, current {current}, limit {limit}")]
    SupplyLimitExceeded {
        /// Asset
        denom: String,
        /// Requested increase
        requested: u128,
        /// Current supply
        current: u128,
        /// Absolute limit
        limit: u128,
    },

    /// Rolling-window supply cap would be exceeded.
    #[error("Time-based supply limit exceeded for {denom}: requested {requested}, window supply {current}, limit {limit}")]
    TimeLimitExceeded {
        /// Asset
        denom: String,
        /// Requested increase
        requested: u128,
        /// Supply already issued in this window
        current: u128,
        /// Window limit
        limit: u128,
    },

    /// Outgoing swap larger than the supply that is not already outgoing.
    #[error("Outgoing swap of {requested} {denom} exceeds available supply {available}")]
    ExceedsAvailableSupply {
        /// Asset
        denom: String,
        /// Requested amount
        requested: u128,
        /// Current minus outgoing
        available: u128,
    },

    // ---------------------------------------------------------------------
    // State
    // ---------------------------------------------------------------------
    /// Swap not found.
    #[error("Atomic swap not found: {0}")]
    SwapNotFound(SwapId),

    /// Preimage does not hash to the swap's random number hash.
    #[error("Invalid preimage for swap {0}")]
    InvalidPreimage(SwapId),

    /// Claim attempted after the expire height.
    #[error("Atomic swap {id} expired at height {expire_height} (current {height})")]
    SwapExpired {
        /// Swap
        id: SwapId,
        /// Expire height
        expire_height: u64,
        /// Current height
        height: u64,
    },

    /// Refund attempted at or before the expire height.
    #[error("Atomic swap {id} not expired until after height {expire_height} (current {height})")]
    SwapNotExpired {
        /// Swap
        id: SwapId,
        /// Expire height
        expire_height: u64,
        /// Current height
        height: u64,
    },

    /// Swap is already in a terminal state.
    #[error("Atomic swap {id} already closed ({status})")]
    SwapAlreadyClosed {
        /// Swap
        id: SwapId,
        /// Terminal status
        status: SwapStatus,
    },

    // ---------------------------------------------------------------------
    // Internal invariant violations
    // ---------------------------------------------------------------------
    /// A supply counter would go negative.
    #[error("Supply underflow for {denom}: {field} {value} - {amount}")]
    SupplyUnderflow {
        /// Asset
        denom: String,
        /// Counter name
        field: &'static str,
        /// Counter value
        value: u128,
        /// Amount subtracted
        amount: u128,
    },

    /// A supply counter or duration would overflow.
    #[error("Supply overflow for {denom}: {field}")]
    SupplyOverflow {
        /// Asset
        denom: String,
        /// Counter name
        field: &'static str,
    },

    /// Coin arithmetic across different denominations.
    #[error("Denom mismatch: {left} vs {right}")]
    DenomMismatch {
        /// Left operand denom
        left: String,
        /// Right operand denom
        right: String,
    },

    /// Supply record missing for an asset with live swaps.
    #[error("Asset supply missing for {0}")]
    MissingSupply(String),

    /// Identifier collision despite the duplicate check.
    #[error("Swap id collision: {0}")]
    SwapIdCollision(SwapId),

    /// Block time moved backwards.
    #[error("Block time went backwards: previous {previous}, current {current}")]
    TimeWentBackwards {
        /// Last processed block time
        previous: u64,
        /// Offending block time
        current: u64,
    },

    /// Block height moved backwards.
    #[error("Block height regressed: previous {previous}, current {current}")]
    BlockHeightRegressed {
        /// Last processed height
        previous: u64,
        /// Offending height
        current: u64,
    },
}

impl SwapError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        use SwapError::*;
        match self {
            InvalidAmount(_)
            | InvalidHashLength { .. }
            | InvalidExpiry
            | InvalidTimestamp(_)
            | InvalidAddress(_)
            | InvalidCounterpartyAddress(_)
            | InvalidClosedState
            | InvalidStatus(_)
            | InvalidDirection(_)
            | InvalidDenom(_)
            | InvalidAssetParam { .. }
            | InvalidAssetSupply { .. }
            | InvalidGenesis(_) => ErrorKind::Validation,

            DuplicateSwapId(_)
            | DuplicateDenom(_)
            | AssetNotSupported(_)
            | AssetNotActive(_)
            | InvalidHeightSpan { .. }
            | InvalidSwapParticipants(_)
            | AmountOutOfRange { .. }
            | InsufficientAmount { .. }
            | SupplyLimitExceeded { .. }
            | TimeLimitExceeded { .. }
            | ExceedsAvailableSupply { .. } => ErrorKind::Policy,

            SwapNotFound(_)
            | InvalidPreimage(_)
            | SwapExpired { .. }
            | SwapNotExpired { .. }
            | SwapAlreadyClosed { .. } => ErrorKind::State,

            SupplyUnderflow { .. }
            | SupplyOverflow { .. }
            | DenomMismatch { .. }
            | MissingSupply(_)
            | SwapIdCollision(_)
            | TimeWentBackwards { .. }
            | BlockHeightRegressed { .. } => ErrorKind::Internal,
        }
    }

    /// Internal invariant violations halt processing; nothing else does.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
