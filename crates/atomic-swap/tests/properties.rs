//! # Property Tests
//!
//! Identity, parameter validation, supply round trips and the expiry sweep,
//! checked over generated inputs.

use atomic_swap::{
    calculate_random_number_hash, calculate_swap_id, validate_asset_params, AccAddress,
    AssetParam, BlockInfo, Coin, Coins, CreateSwapRequest, HexBytes, Params, RandomNumber,
    SupplyLimit, SwapConfig, SwapError, SwapId, SwapKeeper, SwapStatus,
};
use proptest::prelude::*;
use std::time::Duration;

// =============================================================================
// TEST HELPERS
// =============================================================================

const T0: u64 = 1_700_000_000;
const DEPUTY: [u8; 20] = [0xDE; 20];
const USER: [u8; 20] = [0x0A; 20];

fn asset(denom: &str) -> AssetParam {
    AssetParam {
        denom: denom.to_string(),
        coin_id: 60,
        supply_limit: SupplyLimit {
            limit: 1_000_000_000,
            time_limited: true,
            time_period: Duration::from_secs(86_400),
            time_based_limit: 500_000_000,
        },
        active: true,
        deputy_address: AccAddress::from(DEPUTY),
        fixed_fee: 10,
        min_swap_amount: 1,
        max_swap_amount: 100_000_000,
        min_block_lock: 10,
        max_block_lock: 100,
    }
}

fn keeper() -> SwapKeeper {
    let params = Params {
        asset_params: vec![asset("bnb")],
    };
    let mut keeper = SwapKeeper::new(SwapConfig::default(), params).unwrap();
    keeper.begin_block(BlockInfo::new(1, T0)).unwrap();
    keeper
}

fn request(
    seed: u64,
    sender: [u8; 20],
    recipient: [u8; 20],
    amount: u128,
    height_span: u64,
) -> (CreateSwapRequest, RandomNumber) {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_be_bytes());
    let secret = RandomNumber::new(bytes);
    let request = CreateSwapRequest {
        sender: AccAddress::from(sender),
        recipient: AccAddress::from(recipient),
        sender_other_chain: "bnb1sender".into(),
        recipient_other_chain: "bnb1recipient".into(),
        random_number_hash: HexBytes::from(calculate_random_number_hash(&secret, T0)),
        timestamp: T0,
        amount: Coins::single(Coin::new("bnb", amount)),
        height_span,
    };
    (request, secret)
}

fn counters(keeper: &SwapKeeper) -> [u128; 4] {
    let supply = keeper.asset_supply("bnb").unwrap();
    [
        supply.incoming_supply.amount,
        supply.outgoing_supply.amount,
        supply.current_supply.amount,
        supply.time_limited_current_supply.amount,
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_swap_id_ignores_counterparty_case(
        hash in prop::array::uniform32(any::<u8>()),
        sender in prop::array::uniform20(any::<u8>()),
        other in "[a-zA-Z0-9]{1,64}",
    ) {
        let sender = AccAddress::from(sender);
        let id = calculate_swap_id(&hash, &sender, &other);
        prop_assert_eq!(id, calculate_swap_id(&hash, &sender, &other.to_uppercase()));
        prop_assert_eq!(id, calculate_swap_id(&hash, &sender, &other.to_lowercase()));
    }

    #[test]
    fn prop_duplicate_denom_always_rejected(
        count in 1usize..6,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut assets: Vec<AssetParam> =
            (0..count).map(|i| asset(&format!("coin{i}"))).collect();
        prop_assert!(validate_asset_params(&assets).is_ok());

        let duplicate = assets[pick.index(count)].clone();
        let denom = duplicate.denom.clone();
        assets.push(duplicate);
        prop_assert_eq!(
            validate_asset_params(&assets),
            Err(SwapError::DuplicateDenom(denom))
        );
    }

    #[test]
    fn prop_create_then_refund_restores_counters(
        seed_amount in 1_000u128..1_000_000,
        amount in 11u128..1_000,
        outgoing in any::<bool>(),
        span in 10u64..=100,
    ) {
        let mut keeper = keeper();
        let (seed_request, seed_secret) = request(1, DEPUTY, USER, seed_amount, 10);
        let seed_id = keeper.create_swap(seed_request).unwrap().swap_id();
        keeper.claim_swap(seed_id, &seed_secret).unwrap();
        let before = counters(&keeper);

        let (sender, recipient) = if outgoing { (USER, DEPUTY) } else { (DEPUTY, USER) };
        let (req, _) = request(2, sender, recipient, amount, span);
        let swap_id = keeper.create_swap(req).unwrap().swap_id();
        prop_assert_ne!(counters(&keeper), before);

        keeper.set_block(BlockInfo::new(2 + span, T0 + 5)).unwrap();
        keeper.refund_swap(swap_id).unwrap();
        prop_assert_eq!(counters(&keeper), before);
    }

    #[test]
    fn prop_sweep_expires_exactly_due_swaps(
        spans in prop::collection::vec(10u64..=100, 1..12),
        sweep_height in 1u64..150,
    ) {
        let mut keeper = keeper();
        let mut ids: Vec<(SwapId, u64)> = Vec::new();
        for (i, span) in spans.iter().enumerate() {
            let (req, _) = request(100 + i as u64, DEPUTY, USER, 10, *span);
            let swap_id = keeper.create_swap(req).unwrap().swap_id();
            ids.push((swap_id, 1 + span));
        }

        let events = keeper.sweep_expired(sweep_height).unwrap();
        let due = ids.iter().filter(|(_, expire)| *expire <= sweep_height).count();
        prop_assert_eq!(events.len(), due);

        for (swap_id, expire) in ids {
            let swap = keeper.swap(&swap_id).unwrap();
            if expire <= sweep_height {
                prop_assert_eq!(swap.status, SwapStatus::Expired);
                prop_assert_eq!(swap.closed_block, sweep_height);
            } else {
                prop_assert_eq!(swap.status, SwapStatus::Open);
                prop_assert_eq!(swap.closed_block, 0);
            }
        }
    }
}
