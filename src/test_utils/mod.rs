//! Test utilities.
//!
//! This module provides:
//! - Store wrappers that inject failures, delays and referral-code collisions
//! - A helper for building an `AppState` around any store

mod app_state_builder;
mod store_mocks;

pub use app_state_builder::*;
pub use store_mocks::*;
