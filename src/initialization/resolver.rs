//! DNS resolver initialization.
//!
//! This module builds the resolver used for DMARC, SPF and MX queries. Every
//! query goes to the single configured nameserver, never to the system
//! resolver configuration.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_PORT;
use crate::dns::DnsResolver;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for record lookups.
///
/// `timeout` bounds each individual query sent to `nameserver`; `deadline`
/// bounds a whole resolution including the resolver's own attempts.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if `nameserver` is not an
/// IP address.
pub fn init_resolver(
    nameserver: &str,
    timeout: Duration,
    deadline: Duration,
) -> Result<Arc<DnsResolver>, InitializationError> {
    let ip: IpAddr = nameserver.trim().parse().map_err(|e| {
        InitializationError::DnsResolverError(format!(
            "invalid nameserver address '{nameserver}': {e}"
        ))
    })?;

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 2;
    // Names are always fully qualified; never append search domains
    opts.ndots = 0;
    opts.use_hosts_file = false;

    let group = NameServerConfigGroup::from_ips_clear(&[ip], DNS_PORT, true);
    let config = ResolverConfig::from_parts(None, vec![], group);

    log::debug!(
        "DNS resolver using {} (timeout {:?}, deadline {:?})",
        ip,
        timeout,
        deadline
    );

    Ok(Arc::new(DnsResolver::new(
        TokioAsyncResolver::tokio(config, opts),
        deadline,
    )))
}
