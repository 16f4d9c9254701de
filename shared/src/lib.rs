//! Shared types and domain logic for the Smart Gear Manufacturing platform
//!
//! This crate contains the role model, status state machines, allocation
//! arithmetic and validation helpers shared between the backend and tests.

pub mod access;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
