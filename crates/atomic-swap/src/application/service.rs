//! Atomic Swap Keeper
//!
//! Owns all swaps, the open-swap expiry index, and the supply ledger.
//! Every mutation validates first, stages the new swap and supply records,
//! and commits both together, so a failed operation leaves no trace.

use crate::algorithms::{
    apply_claim, apply_create, apply_refund, calculate_swap_id, infer_direction,
    validate_height_span, validate_swap_amount, validate_timestamp_window, verify_random_number,
    SupplyLedger,
};
use crate::application::genesis::GenesisState;
use crate::config::SwapConfig;
use crate::domain::{
    validate_asset_params, validate_swap, AccAddress, AssetParam, AssetSupply, AtomicSwap,
    AtomicSwapBuilder, BlockInfo, Coins, ErrorKind, HexBytes, Params, RandomNumber, SwapDirection,
    SwapError, SwapEvent, SwapId, SwapStatus,
};
use crate::ports::inbound::AtomicSwapApi;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Request to open a new swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateSwapRequest {
    /// Local sender.
    pub sender: AccAddress,
    /// Local recipient.
    pub recipient: AccAddress,
    /// Sender address on the counterparty chain.
    pub sender_other_chain: String,
    /// Recipient address on the counterparty chain.
    pub recipient_other_chain: String,
    /// SHA-256 of `random_number ‖ timestamp`.
    pub random_number_hash: HexBytes,
    /// Unix seconds, bound into the random number hash.
    pub timestamp: u64,
    /// Amount to lock; exactly one coin.
    pub amount: Coins,
    /// Blocks until expiry.
    pub height_span: u64,
}

/// Query filter for [`SwapKeeper::swaps`]. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwapFilter {
    /// Only swaps in this status.
    pub status: Option<SwapStatus>,
    /// Only swaps in this direction.
    pub direction: Option<SwapDirection>,
    /// Only swaps where this address is sender or recipient.
    pub involve: Option<AccAddress>,
}

impl SwapFilter {
    /// True if `swap` passes every set criterion.
    pub fn matches(&self, swap: &AtomicSwap) -> bool {
        self.status.map_or(true, |s| swap.status == s)
            && self.direction.map_or(true, |d| swap.direction == d)
            && self
                .involve
                .as_ref()
                .map_or(true, |a| swap.sender == *a || swap.recipient == *a)
    }
}

/// Atomic swap keeper.
///
/// Single ordering authority for swap state. Hosts call
/// [`begin_block`](Self::begin_block) once per block, then apply that
/// block's create/claim/refund operations in order.
#[derive(Clone, Debug)]
pub struct SwapKeeper {
    config: SwapConfig,
    params: Params,
    swaps: BTreeMap<SwapId, AtomicSwap>,
    /// Open swaps keyed by (expire_height, id).
    expiry_queue: BTreeSet<(u64, SwapId)>,
    supplies: SupplyLedger,
    block: BlockInfo,
    previous_block_time: u64,
}

impl SwapKeeper {
    /// Create an empty keeper.
    pub fn new(config: SwapConfig, params: Params) -> Result<Self, SwapError> {
        validate_asset_params(&params.asset_params)?;
        Ok(Self {
            config,
            params,
            swaps: BTreeMap::new(),
            expiry_queue: BTreeSet::new(),
            supplies: SupplyLedger::new(),
            block: BlockInfo::default(),
            previous_block_time: 0,
        })
    }

    /// Load a validated snapshot and rebuild the expiry index.
    pub fn from_genesis(config: SwapConfig, genesis: GenesisState) -> Result<Self, SwapError> {
        genesis
            .validate()
            .inspect_err(|e| trace_rejection("from_genesis", e))?;

        let supplies = SupplyLedger::from_supplies(genesis.supplies)?;
        let mut swaps = BTreeMap::new();
        let mut expiry_queue = BTreeSet::new();
        for swap in genesis.atomic_swaps {
            let swap_id = swap.swap_id();
            if swap.status == SwapStatus::Open {
                expiry_queue.insert((swap.expire_height, swap_id));
            }
            swaps.insert(swap_id, swap);
        }

        info!(
            swaps = swaps.len(),
            open_swaps = expiry_queue.len(),
            supplies = supplies.len(),
            previous_block_time = genesis.previous_block_time,
            "Loaded atomic swap genesis"
        );

        Ok(Self {
            config,
            params: genesis.params,
            swaps,
            expiry_queue,
            supplies,
            block: BlockInfo::new(0, genesis.previous_block_time),
            previous_block_time: genesis.previous_block_time,
        })
    }

    /// Snapshot all state. Swaps are ordered by id, supplies by denom.
    ///
    /// A keeper that has never seen a block exports a zero previous block
    /// time, which [`GenesisState::validate`] rejects.
    pub fn export_genesis(&self) -> GenesisState {
        GenesisState {
            params: self.params.clone(),
            atomic_swaps: self.swaps.values().cloned().collect(),
            supplies: self.supplies.iter().cloned().collect(),
            previous_block_time: self.previous_block_time,
        }
    }

    // =========================================================================
    // BLOCK PROCESSING
    // =========================================================================

    /// Start a block: advance the supply windows by the time since the
    /// previous block, then expire every due swap.
    ///
    /// Height or time regression is fatal and leaves state untouched.
    pub fn begin_block(&mut self, block: BlockInfo) -> Result<Vec<SwapEvent>, SwapError> {
        self.try_begin_block(block)
            .inspect_err(|e| trace_rejection("begin_block", e))
    }

    fn try_begin_block(&mut self, block: BlockInfo) -> Result<Vec<SwapEvent>, SwapError> {
        let checkpoint = (self.supplies.clone(), self.block, self.previous_block_time);
        let result = self.try_set_block(block).and_then(|elapsed| {
            self.supplies
                .advance_time(&self.params.asset_params, elapsed)?;
            self.try_sweep_expired(block.height)
        });
        if result.is_err() {
            (self.supplies, self.block, self.previous_block_time) = checkpoint;
        }
        result
    }

    /// Move to `block` without running the window advance or the sweep,
    /// returning the time elapsed since the previous block.
    ///
    /// For hosts that drive [`advance_time`](Self::advance_time) and
    /// [`sweep_expired`](Self::sweep_expired) themselves.
    pub fn set_block(&mut self, block: BlockInfo) -> Result<Duration, SwapError> {
        self.try_set_block(block)
            .inspect_err(|e| trace_rejection("set_block", e))
    }

    fn try_set_block(&mut self, block: BlockInfo) -> Result<Duration, SwapError> {
        if block.height < self.block.height {
            return Err(SwapError::BlockHeightRegressed {
                previous: self.block.height,
                current: block.height,
            });
        }
        // First block ever: nothing has elapsed yet
        let previous = match self.previous_block_time {
            0 => block.time,
            time => time,
        };
        if block.time < previous {
            return Err(SwapError::TimeWentBackwards {
                previous,
                current: block.time,
            });
        }

        self.block = block;
        self.previous_block_time = block.time;
        Ok(Duration::from_secs(block.time - previous))
    }

    /// Advance every asset's rolling window by `elapsed`.
    pub fn advance_time(&mut self, elapsed: Duration) -> Result<(), SwapError> {
        self.supplies
            .advance_time(&self.params.asset_params, elapsed)
            .inspect_err(|e| trace_rejection("advance_time", e))
    }

    /// Expire every open swap with `expire_height <= height`, applying the
    /// refund accounting and recording `height` as the closing block.
    pub fn sweep_expired(&mut self, height: u64) -> Result<Vec<SwapEvent>, SwapError> {
        self.try_sweep_expired(height)
            .inspect_err(|e| trace_rejection("sweep_expired", e))
    }

    fn try_sweep_expired(&mut self, height: u64) -> Result<Vec<SwapEvent>, SwapError> {
        let due: Vec<SwapId> = self
            .expiry_queue
            .iter()
            .take_while(|(expire_height, _)| *expire_height <= height)
            .map(|(_, swap_id)| *swap_id)
            .collect();
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let mut staged = self.supplies.clone();
        let mut expired = Vec::with_capacity(due.len());
        for swap_id in due {
            let swap = self
                .swaps
                .get(&swap_id)
                .ok_or(SwapError::SwapNotFound(swap_id))?;
            let denom = &swap.coin()?.denom;
            let supply = staged
                .get(denom)
                .ok_or_else(|| SwapError::MissingSupply(denom.clone()))?;
            let (closed, supply) = stage_expiry(swap, supply, height)?;
            staged.set(supply);
            expired.push((swap_id, closed));
        }

        self.supplies = staged;
        let events: Vec<SwapEvent> = expired
            .into_iter()
            .map(|(swap_id, swap)| {
                let event = SwapEvent::Expired {
                    swap_id,
                    sender: swap.sender.clone(),
                    amount: swap.amount.clone(),
                    height,
                };
                self.commit_closed(swap_id, swap);
                event
            })
            .collect();

        debug!(height, expired = events.len(), "Swept expired atomic swaps");
        Ok(events)
    }

    // =========================================================================
    // SWAP LIFECYCLE
    // =========================================================================

    /// Open a new swap at the current block.
    pub fn create_swap(&mut self, request: CreateSwapRequest) -> Result<SwapEvent, SwapError> {
        self.try_create_swap(request)
            .inspect_err(|e| trace_rejection("create_swap", e))
    }

    fn try_create_swap(&mut self, request: CreateSwapRequest) -> Result<SwapEvent, SwapError> {
        let swap_id = calculate_swap_id(
            request.random_number_hash.as_slice(),
            &request.sender,
            &request.sender_other_chain,
        );
        if self.swaps.contains_key(&swap_id) {
            return Err(SwapError::DuplicateSwapId(swap_id));
        }

        let coin = match request.amount.as_slice() {
            [coin] => coin.clone(),
            _ => {
                return Err(SwapError::InvalidAmount(
                    "swap must lock exactly one coin".into(),
                ))
            }
        };

        let asset = self.active_asset(&coin.denom)?;
        validate_height_span(asset, request.height_span)?;
        validate_timestamp_window(
            request.timestamp,
            self.block.time,
            self.config.timestamp_past_window_secs,
            self.config.timestamp_future_window_secs,
        )?;
        let direction = infer_direction(asset, &request.sender, &request.recipient)?;
        validate_swap_amount(asset, &coin, direction)?;
        self.check_other_chain_address("sender", &request.sender_other_chain)?;
        self.check_other_chain_address("recipient", &request.recipient_other_chain)?;

        let (supply, supply_window) = apply_create(
            &self.supplies.get_or_new(&coin.denom),
            asset,
            &coin,
            direction,
        )?;

        let expire_height = self
            .block
            .height
            .checked_add(request.height_span)
            .ok_or(SwapError::InvalidExpiry)?;
        let swap = AtomicSwapBuilder::new(request.random_number_hash, request.timestamp, request.amount)
            .expire_height(expire_height)
            .parties(request.sender, request.recipient)
            .other_chain(request.sender_other_chain, request.recipient_other_chain)
            .direction(direction)
            .supply_window(supply_window)
            .build();
        validate_swap(&swap)?;

        let event = SwapEvent::Created {
            swap_id,
            sender: swap.sender.clone(),
            recipient: swap.recipient.clone(),
            amount: swap.amount.clone(),
            direction,
            expire_height,
        };

        match self.swaps.entry(swap_id) {
            Entry::Occupied(_) => return Err(SwapError::SwapIdCollision(swap_id)),
            Entry::Vacant(slot) => {
                slot.insert(swap);
            }
        }
        self.supplies.set(supply);
        self.expiry_queue.insert((expire_height, swap_id));

        info!(
            swap_id = %swap_id,
            denom = %coin.denom,
            amount = coin.amount,
            direction = %direction,
            expire_height,
            "Atomic swap created"
        );
        Ok(event)
    }

    /// Claim an open swap with its random number.
    pub fn claim_swap(
        &mut self,
        swap_id: SwapId,
        random_number: &RandomNumber,
    ) -> Result<SwapEvent, SwapError> {
        self.try_claim_swap(swap_id, random_number)
            .inspect_err(|e| trace_rejection("claim_swap", e))
    }

    fn try_claim_swap(
        &mut self,
        swap_id: SwapId,
        random_number: &RandomNumber,
    ) -> Result<SwapEvent, SwapError> {
        let height = self.block.height;
        let swap = self.open_swap(swap_id)?;
        if swap.is_expired(height) {
            return Err(SwapError::SwapExpired {
                id: swap_id,
                expire_height: swap.expire_height,
                height,
            });
        }
        if !verify_random_number(
            random_number,
            swap.timestamp,
            swap.random_number_hash.as_slice(),
        ) {
            return Err(SwapError::InvalidPreimage(swap_id));
        }

        let coin = swap.coin()?;
        let supply = apply_claim(self.supply_of(&coin.denom)?, coin, swap.direction)?;
        let mut closed = swap.clone();
        closed.transition_to(SwapStatus::Completed, height)?;

        let event = SwapEvent::Claimed {
            swap_id,
            recipient: closed.recipient.clone(),
            amount: closed.amount.clone(),
            height,
        };
        info!(
            swap_id = %swap_id,
            direction = %closed.direction,
            height,
            "Atomic swap claimed"
        );
        self.supplies.set(supply);
        self.commit_closed(swap_id, closed);
        Ok(event)
    }

    /// Refund an open swap whose expire height has passed.
    pub fn refund_swap(&mut self, swap_id: SwapId) -> Result<SwapEvent, SwapError> {
        self.try_refund_swap(swap_id)
            .inspect_err(|e| trace_rejection("refund_swap", e))
    }

    fn try_refund_swap(&mut self, swap_id: SwapId) -> Result<SwapEvent, SwapError> {
        let height = self.block.height;
        let swap = self.open_swap(swap_id)?;
        if !swap.is_expired(height) {
            return Err(SwapError::SwapNotExpired {
                id: swap_id,
                expire_height: swap.expire_height,
                height,
            });
        }

        let supply = self.supply_of(&swap.coin()?.denom)?;
        let (closed, supply) = stage_expiry(swap, supply, height)?;

        let event = SwapEvent::Refunded {
            swap_id,
            sender: closed.sender.clone(),
            amount: closed.amount.clone(),
            height,
        };
        info!(
            swap_id = %swap_id,
            direction = %closed.direction,
            height,
            "Atomic swap refunded"
        );
        self.supplies.set(supply);
        self.commit_closed(swap_id, closed);
        Ok(event)
    }

    // =========================================================================
    // PARAMETERS & QUERIES
    // =========================================================================

    /// Replace the asset registry after validating it.
    pub fn update_params(&mut self, params: Params) -> Result<(), SwapError> {
        validate_asset_params(&params.asset_params)
            .inspect_err(|e| trace_rejection("update_params", e))?;
        info!(assets = params.asset_params.len(), "Asset parameters updated");
        self.params = params;
        Ok(())
    }

    /// Current asset registry.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Parameters for one asset.
    pub fn asset_param(&self, denom: &str) -> Option<&AssetParam> {
        self.params.asset(denom)
    }

    /// Look up a swap by id.
    pub fn swap(&self, swap_id: &SwapId) -> Option<&AtomicSwap> {
        self.swaps.get(swap_id)
    }

    /// Swaps passing `filter`, ordered by id.
    pub fn swaps(&self, filter: &SwapFilter) -> Vec<&AtomicSwap> {
        self.swaps.values().filter(|s| filter.matches(s)).collect()
    }

    /// Supply record for one asset.
    pub fn asset_supply(&self, denom: &str) -> Option<&AssetSupply> {
        self.supplies.get(denom)
    }

    /// All supply records, ordered by denom.
    pub fn asset_supplies(&self) -> Vec<&AssetSupply> {
        self.supplies.iter().collect()
    }

    /// Block the keeper is currently processing.
    pub fn block(&self) -> BlockInfo {
        self.block
    }

    /// Time of the last processed block, 0 before the first one.
    pub fn previous_block_time(&self) -> u64 {
        self.previous_block_time
    }

    /// Keeper configuration.
    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn active_asset(&self, denom: &str) -> Result<&AssetParam, SwapError> {
        let asset = self
            .params
            .asset(denom)
            .ok_or_else(|| SwapError::AssetNotSupported(denom.to_string()))?;
        if !asset.active {
            return Err(SwapError::AssetNotActive(denom.to_string()));
        }
        Ok(asset)
    }

    fn check_other_chain_address(&self, role: &str, address: &str) -> Result<(), SwapError> {
        let max = self.config.max_other_chain_address_length;
        if address.len() > max {
            return Err(SwapError::InvalidCounterpartyAddress(format!(
                "{role} other chain address is {} bytes, maximum is {max}",
                address.len()
            )));
        }
        Ok(())
    }

    fn open_swap(&self, swap_id: SwapId) -> Result<&AtomicSwap, SwapError> {
        let swap = self
            .swaps
            .get(&swap_id)
            .ok_or(SwapError::SwapNotFound(swap_id))?;
        if swap.status.is_terminal() {
            return Err(SwapError::SwapAlreadyClosed {
                id: swap_id,
                status: swap.status,
            });
        }
        Ok(swap)
    }

    fn supply_of(&self, denom: &str) -> Result<&AssetSupply, SwapError> {
        self.supplies
            .get(denom)
            .ok_or_else(|| SwapError::MissingSupply(denom.to_string()))
    }

    fn commit_closed(&mut self, swap_id: SwapId, swap: AtomicSwap) {
        self.expiry_queue.remove(&(swap.expire_height, swap_id));
        self.swaps.insert(swap_id, swap);
    }
}

impl AtomicSwapApi for SwapKeeper {
    fn begin_block(&mut self, block: BlockInfo) -> Result<Vec<SwapEvent>, SwapError> {
        SwapKeeper::begin_block(self, block)
    }

    fn set_block(&mut self, block: BlockInfo) -> Result<Duration, SwapError> {
        SwapKeeper::set_block(self, block)
    }

    fn advance_time(&mut self, elapsed: Duration) -> Result<(), SwapError> {
        SwapKeeper::advance_time(self, elapsed)
    }

    fn sweep_expired(&mut self, height: u64) -> Result<Vec<SwapEvent>, SwapError> {
        SwapKeeper::sweep_expired(self, height)
    }

    fn create_swap(&mut self, request: CreateSwapRequest) -> Result<SwapEvent, SwapError> {
        SwapKeeper::create_swap(self, request)
    }

    fn claim_swap(
        &mut self,
        swap_id: SwapId,
        random_number: &RandomNumber,
    ) -> Result<SwapEvent, SwapError> {
        SwapKeeper::claim_swap(self, swap_id, random_number)
    }

    fn refund_swap(&mut self, swap_id: SwapId) -> Result<SwapEvent, SwapError> {
        SwapKeeper::refund_swap(self, swap_id)
    }

    fn update_params(&mut self, params: Params) -> Result<(), SwapError> {
        SwapKeeper::update_params(self, params)
    }

    fn get_swap(&self, swap_id: &SwapId) -> Option<AtomicSwap> {
        self.swap(swap_id).cloned()
    }

    fn list_swaps(&self, filter: &SwapFilter) -> Vec<AtomicSwap> {
        self.swaps(filter).into_iter().cloned().collect()
    }

    fn get_asset_supply(&self, denom: &str) -> Option<AssetSupply> {
        self.asset_supply(denom).cloned()
    }

    fn list_asset_supplies(&self) -> Vec<AssetSupply> {
        self.supplies.iter().cloned().collect()
    }

    fn get_asset_param(&self, denom: &str) -> Option<AssetParam> {
        self.asset_param(denom).cloned()
    }

    fn export_genesis(&self) -> GenesisState {
        SwapKeeper::export_genesis(self)
    }
}

/// Stage the expiry of `swap`: refund accounting plus the terminal transition.
fn stage_expiry(
    swap: &AtomicSwap,
    supply: &AssetSupply,
    height: u64,
) -> Result<(AtomicSwap, AssetSupply), SwapError> {
    let supply = apply_refund(supply, swap.coin()?, swap.direction, swap.supply_window)?;
    let mut closed = swap.clone();
    closed.transition_to(SwapStatus::Expired, height)?;
    Ok((closed, supply))
}

fn trace_rejection(operation: &'static str, err: &SwapError) {
    match err.kind() {
        ErrorKind::Internal => error!(operation, error = %err, "Swap invariant violated"),
        ErrorKind::Policy => warn!(operation, error = %err, "Swap rejected by policy"),
        ErrorKind::Validation | ErrorKind::State => {
            debug!(operation, error = %err, "Swap operation rejected")
        }
    }
}
