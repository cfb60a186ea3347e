//! DNS lookup result types.

use crate::error_handling::FailureClass;

/// Record types queried by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Txt,
    Mx,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Txt => "TXT",
            QueryType::Mx => "MX",
        }
    }

    /// Placeholder text stored when a query of this type yields nothing.
    pub fn sentinel(&self) -> String {
        sentinel_for(self.as_str())
    }
}

/// Uniform "nothing resolved" text, e.g. `No TXT record found`.
pub fn sentinel_for(label: &str) -> String {
    format!("No {label} record found")
}

/// Why a raw query returned no answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// NXDOMAIN or an empty answer section.
    NotFound,
    /// Timeout, SERVFAIL, refused, network or malformed response.
    Transient(String),
}

/// Result of one resolution as seen by the rest of the pipeline.
///
/// `NotFound` and `TransientError` produce the same sentinel text for
/// classification; the distinction survives for logging and statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
    TransientError(String),
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    /// Failure class, or `None` when data was found.
    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            LookupOutcome::Found(_) => None,
            LookupOutcome::NotFound => Some(FailureClass::NotFound),
            LookupOutcome::TransientError(_) => Some(FailureClass::Transient),
        }
    }

    /// Resolved text, or `sentinel` for either failure class.
    pub fn text_or(&self, sentinel: &str) -> String {
        match self {
            LookupOutcome::Found(text) => text.clone(),
            LookupOutcome::NotFound | LookupOutcome::TransientError(_) => sentinel.to_string(),
        }
    }
}

impl From<QueryFailure> for LookupOutcome {
    fn from(failure: QueryFailure) -> Self {
        match failure {
            QueryFailure::NotFound => LookupOutcome::NotFound,
            QueryFailure::Transient(cause) => LookupOutcome::TransientError(cause),
        }
    }
}
