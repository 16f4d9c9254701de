//! Domain models for the supply-chain workflow

pub mod inventory;
pub mod material_request;
pub mod purchase;
pub mod scrap;

pub use inventory::*;
pub use material_request::*;
pub use purchase::*;
pub use scrap::*;
