//! # Domain Invariants
//!
//! Structural validation of swaps, asset parameters and supply records.
//! Every check here is pure and fails fast on the first violation.

use super::coins::validate_denom;
use super::entities::{AssetParam, AssetSupply, AtomicSwap};
use super::errors::SwapError;
use super::value_objects::{SwapStatus, RANDOM_NUMBER_HASH_LENGTH};
use std::collections::HashSet;

/// Invariant: a swap record is structurally well formed.
pub fn validate_swap(swap: &AtomicSwap) -> Result<(), SwapError> {
    swap.amount.validate()?;

    if swap.random_number_hash.len() != RANDOM_NUMBER_HASH_LENGTH {
        return Err(SwapError::InvalidHashLength {
            expected: RANDOM_NUMBER_HASH_LENGTH,
            got: swap.random_number_hash.len(),
        });
    }
    if swap.expire_height == 0 {
        return Err(SwapError::InvalidExpiry);
    }
    if swap.timestamp == 0 {
        return Err(SwapError::InvalidTimestamp("timestamp cannot be 0".into()));
    }

    swap.sender.validate("sender")?;
    swap.recipient.validate("recipient")?;

    // Counterparty formats are chain specific, only blankness is checked
    if swap.sender_other_chain.trim().is_empty() {
        return Err(SwapError::InvalidCounterpartyAddress(
            "sender other chain cannot be blank".into(),
        ));
    }
    if swap.recipient_other_chain.trim().is_empty() {
        return Err(SwapError::InvalidCounterpartyAddress(
            "recipient other chain cannot be blank".into(),
        ));
    }

    match swap.status {
        SwapStatus::Completed if swap.closed_block == 0 => Err(SwapError::InvalidClosedState),
        SwapStatus::Open | SwapStatus::Completed | SwapStatus::Expired => Ok(()),
    }
}

fn invalid_asset(asset: &AssetParam, reason: String) -> SwapError {
    SwapError::InvalidAssetParam {
        denom: asset.denom.clone(),
        reason,
    }
}

/// Invariant: one asset parameter is self-consistent.
pub fn validate_asset_param(asset: &AssetParam) -> Result<(), SwapError> {
    validate_supply_limit(asset)?;
    validate_asset_terms(asset)
}

/// Denom syntax and supply-limit ordering.
fn validate_supply_limit(asset: &AssetParam) -> Result<(), SwapError> {
    validate_denom(&asset.denom).map_err(|e| invalid_asset(asset, e.to_string()))?;

    let limit = &asset.supply_limit;
    if limit.time_based_limit > limit.limit {
        return Err(invalid_asset(
            asset,
            format!(
                "time based supply limit {} exceeds supply limit {}",
                limit.time_based_limit, limit.limit
            ),
        ));
    }
    Ok(())
}

/// Deputy, block-lock and swap-amount bounds.
fn validate_asset_terms(asset: &AssetParam) -> Result<(), SwapError> {
    let invalid = |reason: String| invalid_asset(asset, reason);

    if asset.deputy_address.is_empty() {
        return Err(invalid("deputy address cannot be empty".into()));
    }
    asset
        .deputy_address
        .validate("deputy address")
        .map_err(|e| invalid(e.to_string()))?;

    if asset.min_block_lock > asset.max_block_lock {
        return Err(invalid(format!(
            "minimum block lock {} exceeds maximum block lock {}",
            asset.min_block_lock, asset.max_block_lock
        )));
    }
    if asset.min_swap_amount == 0 {
        return Err(invalid("minimum swap amount must be positive".into()));
    }
    if asset.max_swap_amount == 0 {
        return Err(invalid("maximum swap amount must be positive".into()));
    }
    if asset.min_swap_amount > asset.max_swap_amount {
        return Err(invalid(format!(
            "minimum swap amount {} exceeds maximum swap amount {}",
            asset.min_swap_amount, asset.max_swap_amount
        )));
    }
    Ok(())
}

/// Invariant: every asset is valid and denoms are unique.
pub fn validate_asset_params(params: &[AssetParam]) -> Result<(), SwapError> {
    let mut seen = HashSet::new();
    for asset in params {
        validate_supply_limit(asset)?;
        if !seen.insert(asset.denom.as_str()) {
            return Err(SwapError::DuplicateDenom(asset.denom.clone()));
        }
        validate_asset_terms(asset)?;
    }
    Ok(())
}

/// Invariant: all counters of a supply record share one valid denom.
pub fn validate_asset_supply(supply: &AssetSupply) -> Result<(), SwapError> {
    let denom = supply.denom();
    validate_denom(denom).map_err(|e| SwapError::InvalidAssetSupply {
        denom: denom.to_string(),
        reason: e.to_string(),
    })?;

    let fields = [
        ("incoming_supply", &supply.incoming_supply),
        ("outgoing_supply", &supply.outgoing_supply),
        ("time_limited_current_supply", &supply.time_limited_current_supply),
    ];
    if let Some((name, coin)) = fields.iter().find(|(_, coin)| coin.denom != denom) {
        return Err(SwapError::InvalidAssetSupply {
            denom: denom.to_string(),
            reason: format!("{name} has denom {}", coin.denom),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccAddress, AtomicSwapBuilder, Coin, Coins, HexBytes, Params, SupplyLimit, SwapDirection,
    };
    use std::time::Duration;

    fn valid_swap() -> AtomicSwap {
        AtomicSwapBuilder::new(
            HexBytes::from([7u8; 32]),
            1_700_000_000,
            Coins::single(Coin::new("bnb", 50_000)),
        )
        .expire_height(500)
        .parties(AccAddress::from([1u8; 20]), AccAddress::from([2u8; 20]))
        .other_chain("bnb1deputy", "bnb1user")
        .direction(SwapDirection::Incoming)
        .build()
    }

    fn valid_asset(denom: &str) -> AssetParam {
        AssetParam {
            denom: denom.to_string(),
            coin_id: 714,
            supply_limit: SupplyLimit {
                limit: 1_000_000,
                time_limited: true,
                time_period: Duration::from_secs(3600),
                time_based_limit: 100_000,
            },
            active: true,
            deputy_address: AccAddress::from([9u8; 20]),
            fixed_fee: 1_000,
            min_swap_amount: 1,
            max_swap_amount: 500_000,
            min_block_lock: 220,
            max_block_lock: 270,
        }
    }

    #[test]
    fn test_valid_swap_passes() {
        assert!(validate_swap(&valid_swap()).is_ok());
    }

    #[test]
    fn test_swap_empty_amount() {
        let mut swap = valid_swap();
        swap.amount = Coins::default();
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidAmount(_))));
    }

    #[test]
    fn test_swap_zero_amount() {
        let mut swap = valid_swap();
        swap.amount = Coins::single(Coin::new("bnb", 0));
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidAmount(_))));
    }

    #[test]
    fn test_swap_hash_length() {
        let mut swap = valid_swap();
        swap.random_number_hash = HexBytes::new(vec![1u8; 31]);
        assert!(matches!(
            validate_swap(&swap),
            Err(SwapError::InvalidHashLength { expected: 32, got: 31 })
        ));
    }

    #[test]
    fn test_swap_zero_expiry_and_timestamp() {
        let mut swap = valid_swap();
        swap.expire_height = 0;
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidExpiry)));

        let mut swap = valid_swap();
        swap.timestamp = 0;
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_swap_bad_addresses() {
        let mut swap = valid_swap();
        swap.sender = AccAddress::default();
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidAddress(_))));

        let mut swap = valid_swap();
        swap.recipient = AccAddress::new(vec![2u8; 32]);
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidAddress(_))));
    }

    #[test]
    fn test_swap_blank_counterparty() {
        let mut swap = valid_swap();
        swap.sender_other_chain = "   ".into();
        assert!(matches!(
            validate_swap(&swap),
            Err(SwapError::InvalidCounterpartyAddress(_))
        ));

        let mut swap = valid_swap();
        swap.recipient_other_chain = String::new();
        assert!(matches!(
            validate_swap(&swap),
            Err(SwapError::InvalidCounterpartyAddress(_))
        ));
    }

    #[test]
    fn test_completed_without_closed_block() {
        let mut swap = valid_swap();
        swap.status = SwapStatus::Completed;
        assert!(matches!(validate_swap(&swap), Err(SwapError::InvalidClosedState)));
        swap.closed_block = 10;
        assert!(validate_swap(&swap).is_ok());
    }

    #[test]
    fn test_default_params_valid() {
        assert!(validate_asset_params(&Params::default().asset_params).is_ok());
    }

    #[test]
    fn test_asset_params_duplicate_denom() {
        let params = vec![valid_asset("bnb"), valid_asset("btcb"), valid_asset("bnb")];
        assert_eq!(
            validate_asset_params(&params),
            Err(SwapError::DuplicateDenom("bnb".into()))
        );
    }

    #[test]
    fn test_duplicate_denom_reported_before_asset_terms() {
        let mut duplicate = valid_asset("bnb");
        duplicate.min_block_lock = duplicate.max_block_lock + 1;
        let params = vec![valid_asset("bnb"), duplicate];
        assert_eq!(
            validate_asset_params(&params),
            Err(SwapError::DuplicateDenom("bnb".into()))
        );

        let mut duplicate = valid_asset("bnb");
        duplicate.supply_limit.time_based_limit = duplicate.supply_limit.limit + 1;
        let err = validate_asset_params(&[valid_asset("bnb"), duplicate]).unwrap_err();
        assert!(matches!(err, SwapError::InvalidAssetParam { .. }));
    }

    #[test]
    fn test_asset_params_window_above_limit() {
        let mut asset = valid_asset("bnb");
        asset.supply_limit.time_based_limit = asset.supply_limit.limit + 1;
        let err = validate_asset_params(&[asset]).unwrap_err();
        assert!(matches!(err, SwapError::InvalidAssetParam { ref denom, .. } if denom == "bnb"));
    }

    #[test]
    fn test_asset_params_block_lock_order() {
        let mut asset = valid_asset("bnb");
        asset.min_block_lock = 300;
        assert!(validate_asset_params(&[asset.clone()]).is_err());
        asset.max_block_lock = 300;
        assert!(validate_asset_params(&[asset]).is_ok());
    }

    #[test]
    fn test_asset_params_swap_amounts() {
        let mut asset = valid_asset("bnb");
        asset.min_swap_amount = 0;
        assert!(validate_asset_params(&[asset]).is_err());

        let mut asset = valid_asset("bnb");
        asset.max_swap_amount = 0;
        assert!(validate_asset_params(&[asset]).is_err());

        let mut asset = valid_asset("bnb");
        asset.min_swap_amount = asset.max_swap_amount + 1;
        assert!(validate_asset_params(&[asset]).is_err());
    }

    #[test]
    fn test_asset_params_deputy() {
        let mut asset = valid_asset("bnb");
        asset.deputy_address = AccAddress::default();
        assert!(validate_asset_params(&[asset]).is_err());

        let mut asset = valid_asset("bnb");
        asset.deputy_address = AccAddress::new(vec![1u8; 8]);
        assert!(validate_asset_params(&[asset]).is_err());
    }

    #[test]
    fn test_asset_params_bad_denom() {
        assert!(validate_asset_params(&[valid_asset("B")]).is_err());
    }

    #[test]
    fn test_fail_fast_reports_first_offender() {
        let mut first = valid_asset("bnb");
        first.min_swap_amount = 0;
        let mut second = valid_asset("btcb");
        second.max_block_lock = 0;
        let err = validate_asset_params(&[first, second]).unwrap_err();
        assert!(matches!(err, SwapError::InvalidAssetParam { ref denom, .. } if denom == "bnb"));
    }

    #[test]
    fn test_asset_supply_denom_consistency() {
        let mut supply = AssetSupply::new("bnb");
        assert!(validate_asset_supply(&supply).is_ok());
        supply.outgoing_supply = Coin::zero("btcb");
        assert!(matches!(
            validate_asset_supply(&supply),
            Err(SwapError::InvalidAssetSupply { .. })
        ));
    }
}
