//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use super::constants::{
    DEFAULT_LEGACY_NAME, DEFAULT_MAX_CONCURRENCY, DEFAULT_NAMESERVER, DEFAULT_OUTPUT_DIR,
    DEFAULT_OWNED_NS_MARKER, DEFAULT_OWNER_NAME, DNS_DEADLINE_SECS, DNS_TIMEOUT_SECS,
    DOMAIN_PROCESSING_TIMEOUT, WHOIS_TIMEOUT_SECS,
};
use super::profile::OwnershipProfile;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Job configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// by library callers (all fields have defaults via `Default`).
///
/// # Examples
///
/// ```no_run
/// use mail_posture::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.csv"),
///     max_concurrency: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mail_posture",
    about = "Resolves DMARC, SPF, MX and WHOIS data for a domain list and builds a posture report."
)]
pub struct Config {
    /// CSV file with a `Domain` column
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Root directory for job output (one sub-directory per job)
    #[arg(long, value_parser, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Job identifier (defaults to `job_<unix millis>`)
    #[arg(long)]
    pub job_id: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Number of domains processed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Nameserver queried for DMARC, SPF and MX records
    #[arg(long, default_value = DEFAULT_NAMESERVER)]
    pub nameserver: String,

    /// Per-query DNS timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub dns_timeout_secs: u64,

    /// Total deadline for one DNS resolution in seconds
    #[arg(long, default_value_t = DNS_DEADLINE_SECS)]
    pub dns_deadline_secs: u64,

    /// WHOIS lookup timeout in seconds
    #[arg(long, default_value_t = WHOIS_TIMEOUT_SECS)]
    pub whois_timeout_secs: u64,

    /// Upper bound on all lookups for a single domain, in seconds
    #[arg(long, default_value_t = DOMAIN_PROCESSING_TIMEOUT.as_secs())]
    pub domain_timeout_secs: u64,

    /// Organisation the report is produced for
    #[arg(long, default_value = DEFAULT_OWNER_NAME)]
    pub owner_name: String,

    /// Organisation being migrated away from
    #[arg(long, default_value = DEFAULT_LEGACY_NAME)]
    pub legacy_name: String,

    /// Substring marking a nameserver as owner-operated
    #[arg(long, default_value = DEFAULT_OWNED_NS_MARKER)]
    pub owned_ns_marker: String,
}

impl Config {
    /// Validates option combinations that clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid option.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.dns_timeout_secs == 0 || self.dns_deadline_secs == 0 {
            return Err("DNS timeouts must be greater than zero".to_string());
        }
        if self.dns_deadline_secs < self.dns_timeout_secs {
            return Err(format!(
                "dns_deadline_secs ({}) must not be shorter than dns_timeout_secs ({})",
                self.dns_deadline_secs, self.dns_timeout_secs
            ));
        }
        if self.whois_timeout_secs == 0 || self.domain_timeout_secs == 0 {
            return Err("WHOIS and domain timeouts must be greater than zero".to_string());
        }
        if self.nameserver.parse::<std::net::IpAddr>().is_err() {
            return Err(format!(
                "nameserver must be an IP address, got '{}'",
                self.nameserver
            ));
        }
        Ok(())
    }

    /// Ownership profile with the CLI overrides applied to the default markers.
    pub fn profile(&self) -> OwnershipProfile {
        OwnershipProfile {
            owner_name: self.owner_name.clone(),
            legacy_name: self.legacy_name.clone(),
            owned_ns_marker: self.owned_ns_marker.to_lowercase(),
            ..OwnershipProfile::default()
        }
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn dns_deadline(&self) -> Duration {
        Duration::from_secs(self.dns_deadline_secs)
    }

    pub fn whois_timeout(&self) -> Duration {
        Duration::from_secs(self.whois_timeout_secs)
    }

    pub fn domain_timeout(&self) -> Duration {
        Duration::from_secs(self.domain_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("domains.csv"),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            job_id: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            nameserver: DEFAULT_NAMESERVER.to_string(),
            dns_timeout_secs: DNS_TIMEOUT_SECS,
            dns_deadline_secs: DNS_DEADLINE_SECS,
            whois_timeout_secs: WHOIS_TIMEOUT_SECS,
            domain_timeout_secs: DOMAIN_PROCESSING_TIMEOUT.as_secs(),
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            legacy_name: DEFAULT_LEGACY_NAME.to_string(),
            owned_ns_marker: DEFAULT_OWNED_NS_MARKER.to_string(),
        }
    }
}
