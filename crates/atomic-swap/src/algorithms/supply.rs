//! # Supply Ledger
//!
//! Per-denom supply accounting and cap enforcement.
//!
//! Every transition is a pure function from the old [`AssetSupply`] to a new
//! one, so callers can stage the result and commit it together with the
//! matching swap transition (or drop it on failure).
//!
//! | Event            | Incoming                                   | Outgoing                    |
//! |------------------|--------------------------------------------|-----------------------------|
//! | create           | +incoming, +current, +time_limited         | +outgoing                   |
//! | claim            | -incoming                                  | -outgoing, -current         |
//! | refund / expiry  | -incoming, -current, -time_limited if same window | -outgoing            |
//!
//! Each window reset bumps [`AssetSupply::window`]. An incoming swap records
//! the window it was counted in, and a refund only gives window room back
//! while that window is still current.

use crate::domain::{
    validate_asset_supply, AssetParam, AssetSupply, Coin, SwapDirection, SwapError,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Apply the creation side of a swap.
///
/// Also returns the window the amount was counted in, if the asset is
/// time limited and the swap is incoming.
pub fn apply_create(
    supply: &AssetSupply,
    asset: &AssetParam,
    coin: &Coin,
    direction: SwapDirection,
) -> Result<(AssetSupply, Option<u64>), SwapError> {
    let mut next = supply.clone();
    let mut counted_in = None;
    match direction {
        SwapDirection::Incoming => {
            let limit = &asset.supply_limit;
            let current = supply.current_supply.checked_add(coin)?;
            if current.amount > limit.limit {
                return Err(SwapError::SupplyLimitExceeded {
                    denom: coin.denom.clone(),
                    requested: coin.amount,
                    current: supply.current_supply.amount,
                    limit: limit.limit,
                });
            }
            if limit.time_limited {
                let windowed = supply.time_limited_current_supply.checked_add(coin)?;
                if windowed.amount > limit.time_based_limit {
                    return Err(SwapError::TimeLimitExceeded {
                        denom: coin.denom.clone(),
                        requested: coin.amount,
                        current: supply.time_limited_current_supply.amount,
                        limit: limit.time_based_limit,
                    });
                }
                next.time_limited_current_supply = windowed;
                counted_in = Some(supply.window);
            }
            next.incoming_supply = supply.incoming_supply.checked_add(coin)?;
            next.current_supply = current;
        }
        SwapDirection::Outgoing => {
            let outgoing = supply.outgoing_supply.checked_add(coin)?;
            if supply.current_supply.is_lt(&outgoing)? {
                return Err(SwapError::ExceedsAvailableSupply {
                    denom: coin.denom.clone(),
                    requested: coin.amount,
                    available: supply
                        .current_supply
                        .amount
                        .saturating_sub(supply.outgoing_supply.amount),
                });
            }
            next.outgoing_supply = outgoing;
        }
    }
    Ok((next, counted_in))
}

/// Apply a successful claim.
pub fn apply_claim(
    supply: &AssetSupply,
    coin: &Coin,
    direction: SwapDirection,
) -> Result<AssetSupply, SwapError> {
    let mut next = supply.clone();
    match direction {
        SwapDirection::Incoming => {
            next.incoming_supply = supply.incoming_supply.checked_sub(coin, "incoming_supply")?;
        }
        SwapDirection::Outgoing => {
            next.outgoing_supply = supply.outgoing_supply.checked_sub(coin, "outgoing_supply")?;
            next.current_supply = supply.current_supply.checked_sub(coin, "current_supply")?;
        }
    }
    Ok(next)
}

/// Apply a refund or expiry: the inverse of [`apply_create`].
///
/// `counted_in` is the window [`apply_create`] reported. The windowed
/// counter is only decremented while that window is still current; once it
/// has reset, the room belongs to swaps created since.
pub fn apply_refund(
    supply: &AssetSupply,
    coin: &Coin,
    direction: SwapDirection,
    counted_in: Option<u64>,
) -> Result<AssetSupply, SwapError> {
    let mut next = supply.clone();
    match direction {
        SwapDirection::Incoming => {
            next.incoming_supply = supply.incoming_supply.checked_sub(coin, "incoming_supply")?;
            next.current_supply = supply.current_supply.checked_sub(coin, "current_supply")?;
            if counted_in == Some(supply.window) {
                next.time_limited_current_supply = supply
                    .time_limited_current_supply
                    .checked_sub(coin, "time_limited_current_supply")?;
            }
        }
        SwapDirection::Outgoing => {
            next.outgoing_supply = supply.outgoing_supply.checked_sub(coin, "outgoing_supply")?;
        }
    }
    Ok(next)
}

/// Advance the rolling window by `elapsed`.
///
/// Returns the new record and whether the window reset. The reset is a hard
/// boundary: once accumulated time reaches the period both the windowed
/// supply and the accumulator return to zero and the window index moves on.
pub fn apply_elapsed(
    supply: &AssetSupply,
    asset: &AssetParam,
    elapsed: Duration,
) -> Result<(AssetSupply, bool), SwapError> {
    let mut next = supply.clone();
    let limit = &asset.supply_limit;
    if !limit.time_limited {
        // Swaps counted in a cleared window no longer own any of it
        if !supply.time_limited_current_supply.is_zero() {
            next.window = next_window(supply)?;
        }
        next.time_limited_current_supply = Coin::zero(&asset.denom);
        next.time_elapsed = Duration::ZERO;
        return Ok((next, false));
    }

    let total = supply
        .time_elapsed
        .checked_add(elapsed)
        .ok_or_else(|| SwapError::SupplyOverflow {
            denom: asset.denom.clone(),
            field: "time_elapsed",
        })?;
    if total >= limit.time_period {
        next.time_limited_current_supply = Coin::zero(&asset.denom);
        next.time_elapsed = Duration::ZERO;
        next.window = next_window(supply)?;
        Ok((next, true))
    } else {
        next.time_elapsed = total;
        Ok((next, false))
    }
}

fn next_window(supply: &AssetSupply) -> Result<u64, SwapError> {
    supply
        .window
        .checked_add(1)
        .ok_or_else(|| SwapError::SupplyOverflow {
            denom: supply.denom().to_string(),
            field: "window",
        })
}

/// All asset supplies, keyed by denom.
#[derive(Clone, Debug, Default)]
pub struct SupplyLedger {
    supplies: BTreeMap<String, AssetSupply>,
}

impl SupplyLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load supplies, rejecting invalid records and duplicate denoms.
    pub fn from_supplies(supplies: Vec<AssetSupply>) -> Result<Self, SwapError> {
        let mut ledger = Self::new();
        for supply in supplies {
            validate_asset_supply(&supply)?;
            let denom = supply.denom().to_string();
            if ledger.supplies.insert(denom.clone(), supply).is_some() {
                return Err(SwapError::DuplicateDenom(denom));
            }
        }
        Ok(ledger)
    }

    /// Supply for `denom`, if one has been created.
    pub fn get(&self, denom: &str) -> Option<&AssetSupply> {
        self.supplies.get(denom)
    }

    /// Supply for `denom`, or a zeroed record if none exists yet.
    pub fn get_or_new(&self, denom: &str) -> AssetSupply {
        self.supplies
            .get(denom)
            .cloned()
            .unwrap_or_else(|| AssetSupply::new(denom))
    }

    /// Commit a staged record.
    pub fn set(&mut self, supply: AssetSupply) {
        self.supplies.insert(supply.denom().to_string(), supply);
    }

    /// All records in denom order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetSupply> {
        self.supplies.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.supplies.len()
    }

    /// True when no records exist.
    pub fn is_empty(&self) -> bool {
        self.supplies.is_empty()
    }

    /// Advance every registered asset's window by `elapsed`, creating
    /// missing records. All-or-nothing across assets.
    pub fn advance_time(
        &mut self,
        assets: &[AssetParam],
        elapsed: Duration,
    ) -> Result<(), SwapError> {
        let mut staged = Vec::with_capacity(assets.len());
        for asset in assets {
            let supply = self.get_or_new(&asset.denom);
            let (next, reset) = apply_elapsed(&supply, asset, elapsed)?;
            if reset {
                debug!(
                    denom = %asset.denom,
                    released = supply.time_limited_current_supply.amount,
                    "Time-based supply window reset"
                );
            }
            staged.push(next);
        }
        for supply in staged {
            self.set(supply);
        }
        Ok(())
    }
}
