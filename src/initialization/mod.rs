//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger (plain or JSON)
//! - DNS resolver pinned to the configured nameserver
//! - Worker-pool semaphore
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of domains processed at the same time.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
///
/// # Returns
///
/// An `Arc<Semaphore>` that can be shared across multiple tasks.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_permits() {
        let semaphore = init_semaphore(3);
        assert_eq!(semaphore.available_permits(), 3);
    }
}
