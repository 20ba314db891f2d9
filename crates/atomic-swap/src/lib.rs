//! # Atomic Swap
//!
//! Hash Time-Locked atomic swaps between this ledger and an external chain,
//! with per-asset supply caps on the pegged side.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A deputy relays assets between chains. Each transfer is an HTLC swap:
//! - Locked by `SHA-256(random_number ‖ timestamp)`, claimable with the random number
//! - Refundable once the chain passes the swap's expire height
//! - Counted against an absolute and an optional rolling-window supply cap
//!
//! ## Supply Safety
//!
//! | Check | Rejects |
//! |-------|---------|
//! | Absolute cap | Incoming swap pushing current supply over the limit |
//! | Time-based cap | Incoming swap exceeding the window allowance |
//! | Available supply | Outgoing swap larger than un-committed supply |
//! | Checked arithmetic | Any counter underflow or overflow (fatal) |
//!
//! ## Module Structure
//!
//! ```text
//! atomic-swap/
//! ├── domain/          # AtomicSwap, AssetParam, AssetSupply, coins, errors
//! ├── algorithms/      # Swap id, random number hash, supply ledger
//! ├── application/     # SwapKeeper, GenesisState
//! ├── ports/           # AtomicSwapApi
//! └── adapters/        # SharedSwapKeeper
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::SharedSwapKeeper;
pub use algorithms::{
    calculate_random_number_hash, calculate_swap_id, generate_random_number, verify_random_number,
    SupplyLedger,
};
pub use application::{CreateSwapRequest, GenesisState, SwapFilter, SwapKeeper};
pub use config::SwapConfig;
pub use domain::{
    validate_asset_param, validate_asset_params, validate_asset_supply, validate_swap, AccAddress,
    AssetParam, AssetSupply, AtomicSwap, AtomicSwapBuilder, BlockInfo, Coin, Coins, ErrorKind,
    Hash, HexBytes, Params, RandomNumber, SupplyLimit, SwapDirection, SwapError, SwapEvent,
    SwapId, SwapStatus,
};
pub use ports::AtomicSwapApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
