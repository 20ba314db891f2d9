//! # Domain Entities
//!
//! Core entities for the atomic swap subsystem: swaps, per-asset
//! parameters and per-asset supply records.

use super::coins::{Coin, Coins};
use super::errors::SwapError;
use super::value_objects::{AccAddress, HexBytes, SwapDirection, SwapId, SwapStatus};
use crate::algorithms::calculate_swap_id;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hash Time-Locked atomic swap record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSwap {
    /// Locked amount.
    pub amount: Coins,
    /// SHA-256 of `random_number ‖ timestamp`.
    pub random_number_hash: HexBytes,
    /// Last height at which a claim is accepted.
    pub expire_height: u64,
    /// Unix seconds chosen by the swap creator.
    pub timestamp: u64,
    /// Local sender.
    pub sender: AccAddress,
    /// Local recipient.
    pub recipient: AccAddress,
    /// Sender address on the counterparty chain.
    pub sender_other_chain: String,
    /// Recipient address on the counterparty chain.
    pub recipient_other_chain: String,
    /// Height of terminal transition, 0 while open.
    pub closed_block: u64,
    /// Lifecycle status.
    pub status: SwapStatus,
    /// Whether the swap spans two chains.
    pub cross_chain: bool,
    /// Incoming or outgoing relative to this ledger.
    pub direction: SwapDirection,
    /// Supply window this swap's amount was counted in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_window: Option<u64>,
}

impl AtomicSwap {
    /// Content-addressed identifier.
    pub fn swap_id(&self) -> SwapId {
        calculate_swap_id(
            self.random_number_hash.as_slice(),
            &self.sender,
            &self.sender_other_chain,
        )
    }

    /// The single coin a live swap carries.
    pub fn coin(&self) -> Result<&Coin, SwapError> {
        match self.amount.as_slice() {
            [coin] => Ok(coin),
            _ => Err(SwapError::InvalidAmount(
                "amount must contain exactly one coin".into(),
            )),
        }
    }

    /// True once the current height is past the expire height.
    pub fn is_expired(&self, height: u64) -> bool {
        height > self.expire_height
    }

    /// Move into a terminal state, recording the closing height.
    pub fn transition_to(&mut self, next: SwapStatus, height: u64) -> Result<(), SwapError> {
        if !self.status.can_transition_to(next) {
            return Err(SwapError::SwapAlreadyClosed {
                id: self.swap_id(),
                status: self.status,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.closed_block = height;
        }
        Ok(())
    }
}

/// Builder for creating AtomicSwap instances.
/// Avoids too many arguments in constructor.
#[derive(Clone, Debug)]
pub struct AtomicSwapBuilder {
    amount: Coins,
    random_number_hash: HexBytes,
    expire_height: u64,
    timestamp: u64,
    sender: AccAddress,
    recipient: AccAddress,
    sender_other_chain: String,
    recipient_other_chain: String,
    direction: SwapDirection,
    supply_window: Option<u64>,
}

impl AtomicSwapBuilder {
    /// Create a new builder with required fields.
    pub fn new(random_number_hash: HexBytes, timestamp: u64, amount: Coins) -> Self {
        Self {
            amount,
            random_number_hash,
            expire_height: 0,
            timestamp,
            sender: AccAddress::default(),
            recipient: AccAddress::default(),
            sender_other_chain: String::new(),
            recipient_other_chain: String::new(),
            direction: SwapDirection::Incoming,
            supply_window: None,
        }
    }

    /// Set expire height.
    pub fn expire_height(mut self, height: u64) -> Self {
        self.expire_height = height;
        self
    }

    /// Set local sender and recipient.
    pub fn parties(mut self, sender: AccAddress, recipient: AccAddress) -> Self {
        self.sender = sender;
        self.recipient = recipient;
        self
    }

    /// Set counterparty-chain sender and recipient.
    pub fn other_chain(mut self, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        self.sender_other_chain = sender.into();
        self.recipient_other_chain = recipient.into();
        self
    }

    /// Set direction.
    pub fn direction(mut self, direction: SwapDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the supply window the amount was counted in.
    pub fn supply_window(mut self, window: Option<u64>) -> Self {
        self.supply_window = window;
        self
    }

    /// Build an open cross-chain swap.
    pub fn build(self) -> AtomicSwap {
        AtomicSwap {
            amount: self.amount,
            random_number_hash: self.random_number_hash,
            expire_height: self.expire_height,
            timestamp: self.timestamp,
            sender: self.sender,
            recipient: self.recipient,
            sender_other_chain: self.sender_other_chain,
            recipient_other_chain: self.recipient_other_chain,
            closed_block: 0,
            status: SwapStatus::Open,
            cross_chain: true,
            direction: self.direction,
            supply_window: self.supply_window,
        }
    }
}

/// Absolute and time-based supply caps for one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLimit {
    /// Absolute cap on current supply.
    pub limit: u128,
    /// Whether the rolling window cap applies.
    pub time_limited: bool,
    /// Window length.
    pub time_period: Duration,
    /// Cap on supply created within one window.
    pub time_based_limit: u128,
}

/// Governance parameters for one pegged asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParam {
    /// Denomination (unique key).
    pub denom: String,
    /// SLIP-0044 coin type on the counterparty chain.
    pub coin_id: u32,
    /// Supply caps.
    pub supply_limit: SupplyLimit,
    /// Paused assets reject new swaps.
    pub active: bool,
    /// Relayer account for this asset.
    pub deputy_address: AccAddress,
    /// Fee the deputy charges on outgoing swaps.
    pub fixed_fee: u128,
    /// Smallest accepted swap.
    pub min_swap_amount: u128,
    /// Largest accepted swap.
    pub max_swap_amount: u128,
    /// Smallest accepted height span.
    pub min_block_lock: u64,
    /// Largest accepted height span.
    pub max_block_lock: u64,
}

/// Module parameters: the asset registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Supported assets.
    pub asset_params: Vec<AssetParam>,
}

impl Params {
    /// Look up an asset by denom.
    pub fn asset(&self, denom: &str) -> Option<&AssetParam> {
        self.asset_params.iter().find(|a| a.denom == denom)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            asset_params: vec![AssetParam {
                denom: "bnb".to_string(),
                coin_id: 714,
                supply_limit: SupplyLimit {
                    limit: 350_000_000_000_000,
                    time_limited: false,
                    time_period: Duration::ZERO,
                    time_based_limit: 0,
                },
                active: true,
                deputy_address: AccAddress::from([0x11u8; 20]),
                fixed_fee: 1_000,
                min_swap_amount: 1,
                max_swap_amount: 1_000_000_000_000,
                min_block_lock: 220,
                max_block_lock: 270,
            }],
        }
    }
}

/// Supply bookkeeping for one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSupply {
    /// Locked in open incoming swaps.
    pub incoming_supply: Coin,
    /// Locked in open outgoing swaps.
    pub outgoing_supply: Coin,
    /// Pegged supply counted against the absolute cap.
    pub current_supply: Coin,
    /// Supply created within the current window.
    pub time_limited_current_supply: Coin,
    /// Time since the window last reset.
    pub time_elapsed: Duration,
    /// Number of window resets so far.
    #[serde(default)]
    pub window: u64,
}

impl AssetSupply {
    /// Zeroed supply for `denom`.
    pub fn new(denom: &str) -> Self {
        Self {
            incoming_supply: Coin::zero(denom),
            outgoing_supply: Coin::zero(denom),
            current_supply: Coin::zero(denom),
            time_limited_current_supply: Coin::zero(denom),
            time_elapsed: Duration::ZERO,
            window: 0,
        }
    }

    /// Denom of the record (taken from current supply).
    pub fn denom(&self) -> &str {
        &self.current_supply.denom
    }
}
