//! Lookup failure statistics.
//!
//! This module provides thread-safe counters for lookups that did not return
//! data, split by lookup kind and failure class. The classifier folds both
//! failure classes into the same sentinel; these counters keep the distinction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{FailureClass, LookupKind};

/// Thread-safe lookup statistics tracker.
///
/// All (kind, class) pairs are initialized to zero on creation, so increments
/// never allocate and the struct can be shared across tasks using `Arc`.
pub struct LookupStats {
    counters: HashMap<(LookupKind, FailureClass), AtomicUsize>,
}

impl LookupStats {
    pub fn new() -> Self {
        let mut counters = HashMap::new();
        for kind in LookupKind::iter() {
            for class in FailureClass::iter() {
                counters.insert((kind, class), AtomicUsize::new(0));
            }
        }
        LookupStats { counters }
    }

    /// Records one failed lookup.
    pub fn increment(&self, kind: LookupKind, class: FailureClass) {
        if let Some(counter) = self.counters.get(&(kind, class)) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment lookup counter for {:?}/{:?} which is not in the map. \
                 This indicates a bug in LookupStats initialization.",
                kind,
                class
            );
        }
    }

    pub fn get(&self, kind: LookupKind, class: FailureClass) -> usize {
        self.counters
            .get(&(kind, class))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Total failures of one class across all lookup kinds.
    pub fn total(&self, class: FailureClass) -> usize {
        LookupKind::iter().map(|kind| self.get(kind, class)).sum()
    }

    /// Logs a breakdown of every non-zero counter.
    pub fn log_summary(&self) {
        let not_found = self.total(FailureClass::NotFound);
        let transient = self.total(FailureClass::Transient);
        if not_found == 0 && transient == 0 {
            log::info!("All lookups returned data");
            return;
        }
        log::info!(
            "Lookup failures: {} not found, {} transient",
            not_found,
            transient
        );
        for kind in LookupKind::iter() {
            for class in FailureClass::iter() {
                let count = self.get(kind, class);
                if count > 0 {
                    log::info!("   {} {}: {}", kind, class.as_str(), count);
                }
            }
        }
    }
}

impl Default for LookupStats {
    fn default() -> Self {
        Self::new()
    }
}
