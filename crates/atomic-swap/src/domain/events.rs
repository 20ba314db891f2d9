//! # Swap Events
//!
//! Returned by every committed transition so the host can publish them.

use super::coins::Coins;
use super::value_objects::{AccAddress, SwapDirection, SwapId};
use serde::{Deserialize, Serialize};

/// A committed swap transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwapEvent {
    /// A swap was opened.
    Created {
        /// Swap
        swap_id: SwapId,
        /// Local sender
        sender: AccAddress,
        /// Local recipient
        recipient: AccAddress,
        /// Locked amount
        amount: Coins,
        /// Direction
        direction: SwapDirection,
        /// Last claimable height
        expire_height: u64,
    },
    /// A swap was claimed with its preimage.
    Claimed {
        /// Swap
        swap_id: SwapId,
        /// Paid-out recipient
        recipient: AccAddress,
        /// Released amount
        amount: Coins,
        /// Height of the claim
        height: u64,
    },
    /// An expired swap was refunded on request.
    Refunded {
        /// Swap
        swap_id: SwapId,
        /// Refunded sender
        sender: AccAddress,
        /// Returned amount
        amount: Coins,
        /// Height of the refund
        height: u64,
    },
    /// The per-block sweep expired a swap.
    Expired {
        /// Swap
        swap_id: SwapId,
        /// Refunded sender
        sender: AccAddress,
        /// Returned amount
        amount: Coins,
        /// Height of the sweep
        height: u64,
    },
}

impl SwapEvent {
    /// Swap the event refers to.
    pub fn swap_id(&self) -> SwapId {
        match self {
            Self::Created { swap_id, .. }
            | Self::Claimed { swap_id, .. }
            | Self::Refunded { swap_id, .. }
            | Self::Expired { swap_id, .. } => *swap_id,
        }
    }
}
