//! Helpers for infrastructure-provider resource handlers
//!
//! - [`flex`] - Composite IDs, map diffs and attribute conversions
//! - [`layout`] - Registry of per-resource composite ID layouts
//! - [`retry`] - Bounded retry for transiently failing API calls
//! - [`config`] - Persistent CLI configuration
//! - [`commands`] - Implementations behind the `provflex` binary

pub mod commands;
pub mod config;
pub mod error;
pub mod flex;
pub mod layout;
pub mod retry;

pub use error::{FormatError, IdTarget, ValueError};
