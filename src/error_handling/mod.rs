//! Error handling and lookup statistics.
//!
//! This module provides:
//! - Typed errors for initialization, input parsing and report artifacts
//! - Lookup categories (which lookup, how it failed)
//! - Thread-safe lookup failure statistics
//!
//! Lookup failures are never job errors: they become sentinels for the
//! classifier and increments in [`LookupStats`]. Only input malformation and
//! initialization problems abort a job.

mod stats;
mod types;

// Re-export public API
pub use stats::LookupStats;
pub use types::{
    ArtifactKind, FailureClass, InitializationError, InputError, LookupKind, ReportError,
};
