//! # Genesis
//!
//! Snapshot of the whole subsystem: parameters, every swap ever created,
//! every supply record and the last processed block time.

use crate::domain::{
    validate_asset_params, validate_asset_supply, validate_swap, AssetSupply, AtomicSwap, Params,
    SwapDirection, SwapError, SwapStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Previous block time used by [`GenesisState::default`].
pub const DEFAULT_PREVIOUS_BLOCK_TIME: u64 = 1;

/// Serializable snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    /// Asset registry.
    pub params: Params,
    /// All swaps, open and closed.
    pub atomic_swaps: Vec<AtomicSwap>,
    /// Supply records.
    pub supplies: Vec<AssetSupply>,
    /// Time of the last processed block (Unix seconds, non-zero).
    pub previous_block_time: u64,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            params: Params::default(),
            atomic_swaps: Vec::new(),
            supplies: Vec::new(),
            previous_block_time: DEFAULT_PREVIOUS_BLOCK_TIME,
        }
    }
}

impl GenesisState {
    /// Check every record and the cross-record consistency a loaded keeper
    /// relies on. Fails on the first violation.
    pub fn validate(&self) -> Result<(), SwapError> {
        validate_asset_params(&self.params.asset_params)?;

        if self.previous_block_time == 0 {
            return Err(SwapError::InvalidGenesis(
                "previous block time cannot be 0".into(),
            ));
        }

        let open = self.validate_swaps()?;
        self.validate_supplies(open)
    }

    /// Returns open swap totals per denom.
    fn validate_swaps(&self) -> Result<BTreeMap<&str, OpenTotals>, SwapError> {
        let mut ids = HashSet::with_capacity(self.atomic_swaps.len());
        let mut open: BTreeMap<&str, OpenTotals> = BTreeMap::new();

        for swap in &self.atomic_swaps {
            validate_swap(swap)?;
            let id = swap.swap_id();
            if !ids.insert(id) {
                return Err(SwapError::DuplicateSwapId(id));
            }

            let coin = swap.coin()?;
            if self.params.asset(&coin.denom).is_none() {
                return Err(SwapError::InvalidGenesis(format!(
                    "swap {id} uses unregistered denom {}",
                    coin.denom
                )));
            }

            if swap.direction == SwapDirection::Outgoing && swap.supply_window.is_some() {
                return Err(SwapError::InvalidGenesis(format!(
                    "outgoing swap {id} is counted in a supply window"
                )));
            }

            if swap.status == SwapStatus::Open {
                let totals = open.entry(coin.denom.as_str()).or_default();
                let add = |total: &mut u128| {
                    *total = total
                        .checked_add(coin.amount)
                        .ok_or_else(|| SwapError::SupplyOverflow {
                            denom: coin.denom.clone(),
                            field: "open_swaps",
                        })?;
                    Ok::<(), SwapError>(())
                };
                match swap.direction {
                    SwapDirection::Incoming => add(&mut totals.incoming)?,
                    SwapDirection::Outgoing => add(&mut totals.outgoing)?,
                }
                if let Some(window) = swap.supply_window {
                    add(totals.windowed.entry(window).or_default())?;
                }
            }
        }
        Ok(open)
    }

    fn validate_supplies(&self, mut open: BTreeMap<&str, OpenTotals>) -> Result<(), SwapError> {
        let mut denoms = HashSet::with_capacity(self.supplies.len());

        for supply in &self.supplies {
            validate_asset_supply(supply)?;
            let denom = supply.denom();
            if !denoms.insert(denom) {
                return Err(SwapError::DuplicateDenom(denom.to_string()));
            }

            let asset = self.params.asset(denom).ok_or_else(|| {
                SwapError::InvalidGenesis(format!("supply for unregistered denom {denom}"))
            })?;

            let OpenTotals {
                incoming,
                outgoing,
                windowed,
            } = open.remove(denom).unwrap_or_default();
            if supply.incoming_supply.amount != incoming {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} incoming supply {} does not match open incoming swaps {incoming}",
                    supply.incoming_supply.amount
                )));
            }
            if supply.outgoing_supply.amount != outgoing {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} outgoing supply {} does not match open outgoing swaps {outgoing}",
                    supply.outgoing_supply.amount
                )));
            }
            let limit = &asset.supply_limit;
            if supply.current_supply.amount > limit.limit {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} current supply {} exceeds limit {}",
                    supply.current_supply.amount, limit.limit
                )));
            }
            let time_limited_current = supply.time_limited_current_supply.amount;
            if limit.time_limited && time_limited_current > limit.time_based_limit {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} time limited supply {time_limited_current} exceeds time based limit {}",
                    limit.time_based_limit
                )));
            }
            if supply.outgoing_supply.amount > supply.current_supply.amount {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} outgoing supply {} exceeds current supply {}",
                    supply.outgoing_supply.amount, supply.current_supply.amount
                )));
            }

            if let Some(&window) = windowed.keys().next_back().filter(|w| **w > supply.window) {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} swaps counted in window {window}, supply is at window {}",
                    supply.window
                )));
            }
            let current_window = windowed.get(&supply.window).copied().unwrap_or_default();
            if current_window > time_limited_current {
                return Err(SwapError::InvalidGenesis(format!(
                    "{denom} open swaps counted in the current window total {current_window}, \
                     time limited supply is {time_limited_current}"
                )));
            }
        }

        match open.into_keys().next() {
            Some(denom) => Err(SwapError::InvalidGenesis(format!(
                "open swaps for {denom} have no supply record"
            ))),
            None => Ok(()),
        }
    }
}

/// Open swap amounts for one denom.
#[derive(Default)]
struct OpenTotals {
    incoming: u128,
    outgoing: u128,
    /// Incoming amounts keyed by the supply window they were counted in.
    windowed: BTreeMap<u64, u128>,
}
