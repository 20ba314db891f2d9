//! # Adapters Layer (Hexagonal Architecture)
//!
//! Hosting adapters for the keeper.

mod shared;

pub use shared::SharedSwapKeeper;
