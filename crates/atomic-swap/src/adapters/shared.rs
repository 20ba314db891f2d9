//! Shared Keeper Adapter
//!
//! Serializes access to one [`SwapKeeper`] across threads. Every call takes
//! the lock for its whole duration, so the keeper still sees a single
//! ordered stream of operations.

use crate::application::{CreateSwapRequest, GenesisState, SwapFilter, SwapKeeper};
use crate::domain::{
    AssetParam, AssetSupply, AtomicSwap, BlockInfo, Params, RandomNumber, SwapError, SwapEvent,
    SwapId,
};
use crate::ports::inbound::AtomicSwapApi;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Cloneable handle to a keeper behind a mutex.
#[derive(Clone, Debug)]
pub struct SharedSwapKeeper {
    inner: Arc<Mutex<SwapKeeper>>,
}

impl SharedSwapKeeper {
    /// Wrap a keeper.
    pub fn new(keeper: SwapKeeper) -> Self {
        Self {
            inner: Arc::new(Mutex::new(keeper)),
        }
    }

    /// Run `f` with exclusive access to the keeper.
    ///
    /// Use this to group several operations so no other handle can
    /// interleave between them.
    pub fn with<R>(&self, f: impl FnOnce(&mut SwapKeeper) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl AtomicSwapApi for SharedSwapKeeper {
    fn begin_block(&mut self, block: BlockInfo) -> Result<Vec<SwapEvent>, SwapError> {
        self.inner.lock().begin_block(block)
    }

    fn set_block(&mut self, block: BlockInfo) -> Result<Duration, SwapError> {
        self.inner.lock().set_block(block)
    }

    fn advance_time(&mut self, elapsed: Duration) -> Result<(), SwapError> {
        self.inner.lock().advance_time(elapsed)
    }

    fn sweep_expired(&mut self, height: u64) -> Result<Vec<SwapEvent>, SwapError> {
        self.inner.lock().sweep_expired(height)
    }

    fn create_swap(&mut self, request: CreateSwapRequest) -> Result<SwapEvent, SwapError> {
        self.inner.lock().create_swap(request)
    }

    fn claim_swap(
        &mut self,
        swap_id: SwapId,
        random_number: &RandomNumber,
    ) -> Result<SwapEvent, SwapError> {
        self.inner.lock().claim_swap(swap_id, random_number)
    }

    fn refund_swap(&mut self, swap_id: SwapId) -> Result<SwapEvent, SwapError> {
        self.inner.lock().refund_swap(swap_id)
    }

    fn update_params(&mut self, params: Params) -> Result<(), SwapError> {
        self.inner.lock().update_params(params)
    }

    fn get_swap(&self, swap_id: &SwapId) -> Option<AtomicSwap> {
        self.inner.lock().swap(swap_id).cloned()
    }

    fn list_swaps(&self, filter: &SwapFilter) -> Vec<AtomicSwap> {
        self.inner
            .lock()
            .swaps(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    fn get_asset_supply(&self, denom: &str) -> Option<AssetSupply> {
        self.inner.lock().asset_supply(denom).cloned()
    }

    fn list_asset_supplies(&self) -> Vec<AssetSupply> {
        self.inner
            .lock()
            .asset_supplies()
            .into_iter()
            .cloned()
            .collect()
    }

    fn get_asset_param(&self, denom: &str) -> Option<AssetParam> {
        self.inner.lock().asset_param(denom).cloned()
    }

    fn export_genesis(&self) -> GenesisState {
        self.inner.lock().export_genesis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{calculate_random_number_hash, generate_random_number};
    use crate::config::SwapConfig;
    use crate::domain::{AccAddress, Coin, Coins, HexBytes};

    fn shared() -> SharedSwapKeeper {
        let mut keeper = SwapKeeper::new(SwapConfig::for_testing(), Params::default()).unwrap();
        keeper.begin_block(BlockInfo::new(1, 1_700_000_000)).unwrap();
        SharedSwapKeeper::new(keeper)
    }

    #[test]
    fn test_clones_share_state() {
        let mut a = shared();
        let b = a.clone();
        let secret = generate_random_number();
        let deputy = Params::default().asset_params[0].deputy_address.clone();

        let event = a
            .create_swap(CreateSwapRequest {
                sender: deputy,
                recipient: AccAddress::from([0x42u8; 20]),
                sender_other_chain: "bnb1sender".into(),
                recipient_other_chain: "bnb1recipient".into(),
                random_number_hash: HexBytes::from(calculate_random_number_hash(
                    &secret,
                    1_700_000_000,
                )),
                timestamp: 1_700_000_000,
                amount: Coins::single(Coin::new("bnb", 10_000)),
                height_span: 250,
            })
            .unwrap();

        assert!(b.get_swap(&event.swap_id()).is_some());
        assert_eq!(b.get_asset_supply("bnb").unwrap().incoming_supply.amount, 10_000);
        assert_eq!(b.with(|keeper| keeper.block().height), 1);
    }

    #[test]
    fn test_handle_queries() {
        let handle = shared();
        assert_eq!(handle.list_asset_supplies().len(), 1);
        assert!(handle.get_asset_param("bnb").is_some());
        assert!(handle.list_swaps(&SwapFilter::default()).is_empty());
        assert_eq!(handle.export_genesis().previous_block_time, 1_700_000_000);
    }
}
