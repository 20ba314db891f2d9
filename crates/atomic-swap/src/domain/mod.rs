//! # Domain Module
//!
//! Core domain types for the atomic swap subsystem.

pub mod coins;
pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod secure_secret;
pub mod value_objects;

pub use coins::*;
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use invariants::*;
pub use secure_secret::RandomNumber;
pub use value_objects::*;
