//! HTTP middleware for the Smart Gear Manufacturing backend

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
