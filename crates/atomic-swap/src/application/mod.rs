//! # Application Module
//!
//! The swap keeper and its snapshot format.

pub mod genesis;
pub mod service;

pub use genesis::{GenesisState, DEFAULT_PREVIOUS_BLOCK_TIME};
pub use service::{CreateSwapRequest, SwapFilter, SwapKeeper};
