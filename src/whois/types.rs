//! WHOIS data structures.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Registration data for one domain.
///
/// Nameservers are bare hostnames (glue addresses dropped, lowercased,
/// blanks and duplicates removed) kept in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub nameservers: Vec<String>,
    pub registrar: Option<String>,
    /// Domain creation date
    pub created_on: Option<DateTime<Utc>>,
    /// Domain expiration date
    pub expires_on: Option<DateTime<Utc>>,
    /// Last update of the registration
    pub updated_on: Option<DateTime<Utc>>,
}

/// Why a WHOIS lookup produced no registration.
#[derive(Error, Debug)]
pub enum WhoisError {
    #[error("WHOIS lookup timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("No match for domain \"{0}\"")]
    NotFound(String),

    #[error("WHOIS server rate limited the query for {0}")]
    RateLimited(String),

    #[error(transparent)]
    Service(#[from] whois_service::WhoisError),
}
