//! # Atomic Swap Logic
//!
//! Swap identity and the pure creation-policy checks applied before a swap
//! is admitted.

use crate::domain::{AccAddress, AssetParam, Coin, SwapDirection, SwapError, SwapId};
use sha2::{Digest, Sha256};

/// Derive the swap identifier.
///
/// `SHA-256(random_number_hash ‖ sender ‖ lowercase(sender_other_chain))`.
/// Lowercasing stops a relayer from aliasing one swap under differently
/// cased counterparty addresses.
pub fn calculate_swap_id(
    random_number_hash: &[u8],
    sender: &AccAddress,
    sender_other_chain: &str,
) -> SwapId {
    let mut hasher = Sha256::new();
    hasher.update(random_number_hash);
    hasher.update(sender.as_bytes());
    hasher.update(sender_other_chain.to_lowercase().as_bytes());
    SwapId::new(hasher.finalize().into())
}

/// Height span must lie within the asset's block-lock bounds.
pub fn validate_height_span(asset: &AssetParam, height_span: u64) -> Result<(), SwapError> {
    if height_span < asset.min_block_lock || height_span > asset.max_block_lock {
        return Err(SwapError::InvalidHeightSpan {
            span: height_span,
            min: asset.min_block_lock,
            max: asset.max_block_lock,
        });
    }
    Ok(())
}

/// Timestamp must lie in `[block_time - past, block_time + future)`.
pub fn validate_timestamp_window(
    timestamp: u64,
    block_time: u64,
    past_window_secs: u64,
    future_window_secs: u64,
) -> Result<(), SwapError> {
    let earliest = block_time.saturating_sub(past_window_secs);
    let latest = block_time.saturating_add(future_window_secs);
    if timestamp < earliest || timestamp >= latest {
        return Err(SwapError::InvalidTimestamp(format!(
            "timestamp {timestamp} outside [{earliest}, {latest})"
        )));
    }
    Ok(())
}

/// Infer direction from which side the deputy is on.
pub fn infer_direction(
    asset: &AssetParam,
    sender: &AccAddress,
    recipient: &AccAddress,
) -> Result<SwapDirection, SwapError> {
    let deputy = &asset.deputy_address;
    match (sender == deputy, recipient == deputy) {
        (true, false) => Ok(SwapDirection::Incoming),
        (false, true) => Ok(SwapDirection::Outgoing),
        (true, true) => Err(SwapError::InvalidSwapParticipants(
            "deputy cannot be both sender and recipient".into(),
        )),
        (false, false) => Err(SwapError::InvalidSwapParticipants(format!(
            "deputy {deputy} must be sender or recipient"
        ))),
    }
}

/// Amount must lie within the asset's swap bounds; outgoing swaps must also
/// cover the deputy's fixed fee.
pub fn validate_swap_amount(
    asset: &AssetParam,
    coin: &Coin,
    direction: SwapDirection,
) -> Result<(), SwapError> {
    if coin.amount < asset.min_swap_amount || coin.amount > asset.max_swap_amount {
        return Err(SwapError::AmountOutOfRange {
            denom: coin.denom.clone(),
            amount: coin.amount,
            min: asset.min_swap_amount,
            max: asset.max_swap_amount,
        });
    }
    match direction {
        SwapDirection::Outgoing if coin.amount <= asset.fixed_fee => {
            Err(SwapError::InsufficientAmount {
                denom: coin.denom.clone(),
                amount: coin.amount,
                fee: asset.fixed_fee,
            })
        }
        SwapDirection::Incoming | SwapDirection::Outgoing => Ok(()),
    }
}
