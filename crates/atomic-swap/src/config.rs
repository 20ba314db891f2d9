//! Configuration for the Atomic Swap Subsystem

use serde::{Deserialize, Serialize};

/// Keeper configuration.
///
/// Governance-controlled asset parameters live in [`crate::Params`]; this
/// struct only carries host-level policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// How far before block time a swap timestamp may lie (seconds)
    pub timestamp_past_window_secs: u64,
    /// How far after block time a swap timestamp may lie, exclusive (seconds)
    pub timestamp_future_window_secs: u64,
    /// Maximum byte length of a counterparty-chain address
    pub max_other_chain_address_length: usize,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            timestamp_past_window_secs: 15 * 60,
            timestamp_future_window_secs: 30 * 60,
            max_other_chain_address_length: 64,
        }
    }
}

impl SwapConfig {
    /// Wide timestamp window so tests need not track block time closely.
    pub fn for_testing() -> Self {
        Self {
            timestamp_past_window_secs: 24 * 60 * 60,
            timestamp_future_window_secs: 24 * 60 * 60,
            ..Self::default()
        }
    }
}
