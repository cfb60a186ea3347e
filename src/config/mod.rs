//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, artifact naming)
//! - The ownership profile the classifier matches against
//! - CLI option types and parsing

mod constants;
mod profile;
mod types;

// Re-export all constants
pub use constants::*;
pub use profile::OwnershipProfile;
pub use types::{Config, LogFormat, LogLevel};
