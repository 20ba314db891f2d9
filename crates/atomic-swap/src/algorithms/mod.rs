//! # Algorithms Module
//!
//! Swap identity, preimage hashing and supply accounting.

pub mod atomic_swap;
pub mod secret;
pub mod supply;

pub use atomic_swap::{
    calculate_swap_id, infer_direction, validate_height_span, validate_swap_amount,
    validate_timestamp_window,
};
pub use secret::{calculate_random_number_hash, generate_random_number, verify_random_number};
pub use supply::{apply_claim, apply_create, apply_elapsed, apply_refund, SupplyLedger};
