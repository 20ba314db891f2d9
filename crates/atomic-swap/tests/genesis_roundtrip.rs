//! # Genesis Tests
//!
//! Export a live keeper, reload it, and check the reloaded keeper behaves
//! exactly like the original.

use atomic_swap::{
    calculate_random_number_hash, generate_random_number, AccAddress, BlockInfo, Coin, Coins,
    CreateSwapRequest, GenesisState, HexBytes, Params, RandomNumber, SwapConfig, SwapError,
    SwapId, SwapKeeper, SwapStatus,
};

// =============================================================================
// TEST HELPERS
// =============================================================================

const T0: u64 = 1_700_000_000;

fn deputy() -> AccAddress {
    Params::default().asset_params[0].deputy_address.clone()
}

fn user() -> AccAddress {
    AccAddress::from([0x55u8; 20])
}

fn create(
    keeper: &mut SwapKeeper,
    sender: AccAddress,
    recipient: AccAddress,
    amount: u128,
) -> (SwapId, RandomNumber) {
    let secret = generate_random_number();
    let timestamp = keeper.block().time;
    let event = keeper
        .create_swap(CreateSwapRequest {
            sender,
            recipient,
            sender_other_chain: "bnb1sender".into(),
            recipient_other_chain: "bnb1recipient".into(),
            random_number_hash: HexBytes::from(calculate_random_number_hash(&secret, timestamp)),
            timestamp,
            amount: Coins::single(Coin::new("bnb", amount)),
            height_span: 250,
        })
        .unwrap();
    (event.swap_id(), secret)
}

/// Keeper with one claimed, one open incoming and one open outgoing swap.
fn populated() -> (SwapKeeper, SwapId, RandomNumber) {
    let mut keeper = SwapKeeper::new(SwapConfig::default(), Params::default()).unwrap();
    keeper.begin_block(BlockInfo::new(1, T0)).unwrap();

    let (claimed, secret) = create(&mut keeper, deputy(), user(), 50_000);
    keeper.claim_swap(claimed, &secret).unwrap();
    let (open_incoming, open_secret) = create(&mut keeper, deputy(), user(), 7_000);
    create(&mut keeper, user(), deputy(), 20_000);

    keeper.begin_block(BlockInfo::new(10, T0 + 60)).unwrap();
    (keeper, open_incoming, open_secret)
}

// =============================================================================
// ROUND TRIP
// =============================================================================

#[test]
fn test_export_import_export_is_stable() {
    let (keeper, _, _) = populated();
    let exported = keeper.export_genesis();
    assert!(exported.validate().is_ok());

    let reloaded = SwapKeeper::from_genesis(SwapConfig::default(), exported.clone()).unwrap();
    assert_eq!(reloaded.export_genesis(), exported);
}

#[test]
fn test_export_is_sorted() {
    let (keeper, _, _) = populated();
    let exported = keeper.export_genesis();

    let ids: Vec<SwapId> = exported.atomic_swaps.iter().map(|s| s.swap_id()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(exported.atomic_swaps.len(), 3);
    assert_eq!(exported.previous_block_time, T0 + 60);
}

#[test]
fn test_json_snapshot_reloads() {
    let (keeper, open_incoming, open_secret) = populated();
    let json = serde_json::to_string_pretty(&keeper.export_genesis()).unwrap();

    let genesis: GenesisState = serde_json::from_str(&json).unwrap();
    let mut reloaded = SwapKeeper::from_genesis(SwapConfig::default(), genesis).unwrap();
    reloaded.begin_block(BlockInfo::new(11, T0 + 66)).unwrap();

    reloaded.claim_swap(open_incoming, &open_secret).unwrap();
    assert_eq!(
        reloaded.swap(&open_incoming).unwrap().status,
        SwapStatus::Completed
    );
}

#[test]
fn test_reload_rebuilds_expiry_index() {
    let (keeper, open_incoming, _) = populated();
    let mut reloaded = SwapKeeper::from_genesis(SwapConfig::default(), keeper.export_genesis())
        .unwrap();

    let events = reloaded.begin_block(BlockInfo::new(251, T0 + 1_500)).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        reloaded.swap(&open_incoming).unwrap().status,
        SwapStatus::Expired
    );

    let supply = reloaded.asset_supply("bnb").unwrap();
    assert!(supply.incoming_supply.is_zero());
    assert!(supply.outgoing_supply.is_zero());
    assert_eq!(supply.current_supply.amount, 50_000);
}

// =============================================================================
// REJECTED SNAPSHOTS
// =============================================================================

#[test]
fn test_tampered_supply_rejected() {
    let (keeper, _, _) = populated();
    let mut genesis = keeper.export_genesis();
    genesis.supplies[0].incoming_supply.amount += 1;

    assert!(matches!(
        SwapKeeper::from_genesis(SwapConfig::default(), genesis),
        Err(SwapError::InvalidGenesis(_))
    ));
}

#[test]
fn test_duplicated_swap_rejected() {
    let (keeper, _, _) = populated();
    let mut genesis = keeper.export_genesis();
    let first = genesis.atomic_swaps[0].clone();
    genesis.atomic_swaps.push(first);

    assert!(matches!(
        SwapKeeper::from_genesis(SwapConfig::default(), genesis),
        Err(SwapError::DuplicateSwapId(_))
    ));
}

#[test]
fn test_invalid_swap_record_rejected() {
    let (keeper, _, _) = populated();
    let mut genesis = keeper.export_genesis();
    genesis.atomic_swaps[0].random_number_hash = HexBytes::new(vec![1u8; 31]);

    assert!(matches!(
        SwapKeeper::from_genesis(SwapConfig::default(), genesis),
        Err(SwapError::InvalidHashLength { got: 31, .. })
    ));
}

#[test]
fn test_unknown_status_rejected_at_decode() {
    let (keeper, _, _) = populated();
    let json = serde_json::to_string(&keeper.export_genesis()).unwrap();
    let tampered = json.replacen("\"Completed\"", "\"Pending\"", 1);

    assert!(serde_json::from_str::<GenesisState>(&tampered).is_err());
}

#[test]
fn test_fresh_keeper_export_not_loadable() {
    let keeper = SwapKeeper::new(SwapConfig::default(), Params::default()).unwrap();
    let genesis = keeper.export_genesis();
    assert_eq!(genesis.previous_block_time, 0);
    assert!(matches!(
        genesis.validate(),
        Err(SwapError::InvalidGenesis(_))
    ));
}
