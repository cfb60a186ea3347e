//! Error type definitions.
//!
//! This module defines the typed errors of the job pipeline and the lookup
//! categories tracked by [`LookupStats`](super::LookupStats).

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The configured nameserver is not a usable address.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Errors reading the domain list. These are fatal to the job.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file could not be opened or read.
    #[error("Failed to read input file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row has no `Domain` column.
    #[error("Input file {path} has no '{column}' column (found: {found})")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        found: String,
    },

    /// A data row could not be decoded.
    #[error("Malformed row {line} in {path}: {source}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// The report artifacts, in the order they are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ArtifactKind {
    Chart,
    Workbook,
    Dashboard,
    Pdf,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Chart => "chart image",
            ArtifactKind::Workbook => "workbook",
            ArtifactKind::Dashboard => "HTML dashboard",
            ArtifactKind::Pdf => "PDF report",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure producing one report artifact.
///
/// Artifact failures are isolated: the synthesizer records them and carries on
/// with the artifacts that do not depend on the failed one.
#[derive(Error, Debug)]
#[error("Failed to generate {kind} {name}: {source:#}")]
pub struct ReportError {
    pub kind: ArtifactKind,
    /// File name (or chart key) of the artifact that failed.
    pub name: String,
    #[source]
    pub source: anyhow::Error,
}

impl ReportError {
    pub fn new(kind: ArtifactKind, name: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            kind,
            name: name.into(),
            source,
        }
    }
}

/// The four lookups performed for every domain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum LookupKind {
    Dmarc,
    Spf,
    Mx,
    Whois,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Dmarc => "DMARC",
            LookupKind::Spf => "SPF",
            LookupKind::Mx => "MX",
            LookupKind::Whois => "WHOIS",
        }
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single lookup ended when it did not produce data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureClass {
    /// Authoritative negative answer (NXDOMAIN, NODATA, no SPF string).
    NotFound,
    /// Timeout, SERVFAIL, network or protocol error.
    Transient,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::NotFound => "not found",
            FailureClass::Transient => "transient error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_lookup_kind_order_matches_execution_order() {
        let kinds: Vec<_> = LookupKind::iter().collect();
        assert_eq!(
            kinds,
            vec![
                LookupKind::Dmarc,
                LookupKind::Spf,
                LookupKind::Mx,
                LookupKind::Whois
            ]
        );
    }

    #[test]
    fn test_report_error_display_includes_kind_and_name() {
        let err = ReportError::new(
            ArtifactKind::Chart,
            "spf_chart.png",
            anyhow::anyhow!("font not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("chart image"));
        assert!(msg.contains("spf_chart.png"));
        assert!(msg.contains("font not found"));
    }

    #[test]
    fn test_missing_column_message_lists_found_headers() {
        let err = InputError::MissingColumn {
            path: PathBuf::from("in.csv"),
            column: "Domain",
            found: "Name, Owner".to_string(),
        };
        assert!(err.to_string().contains("'Domain'"));
        assert!(err.to_string().contains("Name, Owner"));
    }
}
