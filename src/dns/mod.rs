//! DNS resolution of email-authentication records.
//!
//! This module provides async DNS operations using `hickory-resolver`:
//! - DMARC policy records (TXT at `_dmarc.<domain>`)
//! - SPF records (first `v=spf1` TXT string)
//! - Mail exchanger queries (MX records)
//!
//! Every query goes to one configured nameserver with a per-query timeout and a
//! total deadline. Failures are reported as [`LookupOutcome::NotFound`] or
//! [`LookupOutcome::TransientError`], never as errors.

mod extract;
mod records;
mod types;

// Re-export public API
pub use extract::{extract_dmarc_tag, extract_spf_record, parse_dmarc_tags, policy_or_placeholder};
pub use records::{
    resolve, resolve_dmarc, resolve_mx, resolve_spf, spf_sentinel, DnsResolver, RecordResolver,
};
pub use types::{sentinel_for, LookupOutcome, QueryFailure, QueryType};

#[cfg(test)]
mod tests;
