//! WHOIS registration lookups.
//!
//! Backed by the `whois-service` crate, which tries RDAP first and falls back
//! to port-43 WHOIS with IANA discovery and registrar referrals. Each lookup
//! runs under the configured timeout.

mod parse;
mod types;

use std::time::Duration;

use async_trait::async_trait;

use parse::convert_response;

pub use parse::normalize_nameservers;
pub use types::{Registration, WhoisError};

/// Looks up registration data for a domain.
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<Registration, WhoisError>;
}

/// Registration client over `whois_service::WhoisClient`.
#[derive(Clone)]
pub struct WhoisClient {
    inner: whois_service::WhoisClient,
    timeout: Duration,
}

impl WhoisClient {
    /// Creates a client with whois-service's default configuration and cache.
    pub async fn new(timeout: Duration) -> Result<Self, WhoisError> {
        let inner = whois_service::WhoisClient::new().await?;
        Ok(Self { inner, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl RegistrationClient for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<Registration, WhoisError> {
        let domain = domain.trim().trim_end_matches('.');
        log::debug!("Starting WHOIS lookup for domain: {}", domain);

        let response = match tokio::time::timeout(self.timeout, self.inner.lookup(domain)).await {
            Ok(result) => result?,
            Err(_) => return Err(WhoisError::Timeout(self.timeout)),
        };
        log::debug!(
            "WHOIS answer for {} from {} in {}ms",
            domain,
            response.whois_server,
            response.query_time_ms
        );
        convert_response(&response)
    }
}
