//! # Ports Module
//!
//! Hexagonal architecture ports. The keeper is self-contained, so only the
//! inbound API is defined.

pub mod inbound;

pub use inbound::*;
