//! # Inbound Ports
//!
//! API trait defining what the atomic swap subsystem can do.

use crate::application::{CreateSwapRequest, GenesisState, SwapFilter};
use crate::domain::{
    AssetParam, AssetSupply, AtomicSwap, BlockInfo, Params, RandomNumber, SwapError, SwapEvent,
    SwapId,
};
use std::time::Duration;

/// Atomic swap API - inbound port.
///
/// Queries return owned values so the trait can be served from behind a lock.
pub trait AtomicSwapApi: Send + Sync {
    /// Start a block: advance supply windows, then sweep expired swaps.
    fn begin_block(&mut self, block: BlockInfo) -> Result<Vec<SwapEvent>, SwapError>;

    /// Move to a block without advancing windows or sweeping.
    fn set_block(&mut self, block: BlockInfo) -> Result<Duration, SwapError>;

    /// Advance supply windows without starting a block.
    fn advance_time(&mut self, elapsed: Duration) -> Result<(), SwapError>;

    /// Expire every open swap due at `height`.
    fn sweep_expired(&mut self, height: u64) -> Result<Vec<SwapEvent>, SwapError>;

    /// Open a swap.
    fn create_swap(&mut self, request: CreateSwapRequest) -> Result<SwapEvent, SwapError>;

    /// Claim a swap with its random number.
    fn claim_swap(
        &mut self,
        swap_id: SwapId,
        random_number: &RandomNumber,
    ) -> Result<SwapEvent, SwapError>;

    /// Refund an expired swap.
    fn refund_swap(&mut self, swap_id: SwapId) -> Result<SwapEvent, SwapError>;

    /// Replace the asset registry.
    fn update_params(&mut self, params: Params) -> Result<(), SwapError>;

    /// Get swap by ID.
    fn get_swap(&self, swap_id: &SwapId) -> Option<AtomicSwap>;

    /// List swaps passing `filter`.
    fn list_swaps(&self, filter: &SwapFilter) -> Vec<AtomicSwap>;

    /// Get supply record by denom.
    fn get_asset_supply(&self, denom: &str) -> Option<AssetSupply>;

    /// List all supply records.
    fn list_asset_supplies(&self) -> Vec<AssetSupply>;

    /// Get asset parameters by denom.
    fn get_asset_param(&self, denom: &str) -> Option<AssetParam>;

    /// Snapshot all state.
    fn export_genesis(&self) -> GenesisState;
}
