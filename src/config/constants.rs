//! Configuration constants.
//!
//! This module defines the operational defaults used throughout the application:
//! concurrency, lookup timeouts, artifact naming and the default ownership markers.

use std::time::Duration;

/// Default width of the per-domain worker pool (semaphore permits).
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default nameserver used for every DMARC/SPF/MX query.
pub const DEFAULT_NAMESERVER: &str = "1.1.1.1";

/// Port used when talking to the configured nameserver.
pub const DNS_PORT: u16 = 53;

// Network operation timeouts
/// Per-query DNS timeout in seconds (a single UDP/TCP exchange).
pub const DNS_TIMEOUT_SECS: u64 = 10;
/// Total per-resolution deadline in seconds. Exceeding it counts as a negative answer.
pub const DNS_DEADLINE_SECS: u64 = 20;
/// WHOIS lookup timeout in seconds, covering RDAP, WHOIS and referral hops.
pub const WHOIS_TIMEOUT_SECS: u64 = 15;
/// Upper bound on the whole per-domain workload (four lookups, run serially).
///
/// Formula: 3 DNS deadlines (60s) + WHOIS (15s) + buffer (15s) = 90s
pub const DOMAIN_PROCESSING_TIMEOUT: Duration = Duration::from_secs(90);

/// Progress is logged every N completed domains.
pub const LOGGING_INTERVAL: usize = 5;

// Input
/// Header of the CSV column holding the domains.
pub const DOMAIN_COLUMN: &str = "Domain";

// Output layout
/// Default root directory for job output.
pub const DEFAULT_OUTPUT_DIR: &str = "./results";
pub const IMAGES_DIR: &str = "Images";
pub const DASHBOARD_DIR: &str = "Dashboard";
pub const LOGS_DIR: &str = "Logs";
/// Timestamp format embedded in artifact file names.
pub const ARTIFACT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

// Default ownership profile (the organisation the report is produced for)
pub const DEFAULT_OWNER_NAME: &str = "Kenvue";
pub const DEFAULT_LEGACY_NAME: &str = "JNJ";
pub const DEFAULT_OWNED_NS_MARKER: &str = "kenvuedns";
pub const DEFAULT_INTERNAL_SPF_MARKERS: &[&str] =
    &["ce.spf-protect.dmp.cisco.com", "d.espf.dmp.cisco.com"];
pub const DEFAULT_PRIMARY_MX_MARKERS: &[&str] = &["kenvue-com.mail.protection.outlook.com"];
pub const DEFAULT_LEGACY_MX_MARKERS: &[&str] = &["mx1.jnj-sd.iphmx.com", "mx2.jnj-sd.iphmx.com"];
pub const DEFAULT_LEGACY_DMARC_RUA: &str = "jnj@rua.dmp.cisco.com";
pub const DEFAULT_LEGACY_DMARC_RUF: &str = "jnj@ruf.dmp.cisco.com";
pub const DEFAULT_MIGRATED_DMARC_MARKERS: &[&str] = &["93881cb5@inbox.ondmarc.com"];

/// SPF record consisting of nothing but a hard fail.
pub const SPF_HARD_FAIL: &str = "v=spf1 -all";
/// Prefix identifying an SPF TXT string.
pub const SPF_PREFIX: &str = "v=spf1";
