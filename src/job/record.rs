//! Per-domain results.

use chrono::{DateTime, Utc};

use crate::classify::Observed;
use crate::dns::{policy_or_placeholder, spf_sentinel, LookupOutcome, QueryType};
use crate::error_handling::{FailureClass, LookupKind};
use crate::whois::{Registration, WhoisError};

/// Everything looked up for one input domain.
///
/// Built by exactly one worker and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub name: String,
    pub dmarc: LookupOutcome,
    pub spf: LookupOutcome,
    pub mx: LookupOutcome,
    /// Empty when the WHOIS lookup failed.
    pub registration: Registration,
    pub whois_error: Option<WhoisFailure>,
}

/// A WHOIS lookup that produced no registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisFailure {
    pub class: FailureClass,
    pub cause: String,
}

impl From<&WhoisError> for WhoisFailure {
    fn from(error: &WhoisError) -> Self {
        let class = match error {
            WhoisError::NotFound(_) => FailureClass::NotFound,
            _ => FailureClass::Transient,
        };
        Self {
            class,
            cause: error.to_string(),
        }
    }
}

impl DomainRecord {
    /// Record for a domain whose lookups never completed.
    pub fn abandoned(name: &str, cause: &str) -> Self {
        let failed = || LookupOutcome::TransientError(cause.to_string());
        Self {
            name: name.to_string(),
            dmarc: failed(),
            spf: failed(),
            mx: failed(),
            registration: Registration::default(),
            whois_error: Some(WhoisFailure {
                class: FailureClass::Transient,
                cause: cause.to_string(),
            }),
        }
    }

    /// DMARC record, if one was found.
    pub fn dmarc_record(&self) -> Option<&str> {
        found(&self.dmarc)
    }

    pub fn dmarc_text(&self) -> String {
        self.dmarc.text_or(&QueryType::Txt.sentinel())
    }

    pub fn dmarc_primary_policy(&self) -> String {
        policy_or_placeholder(self.dmarc_record(), "p")
    }

    pub fn dmarc_secondary_policy(&self) -> String {
        policy_or_placeholder(self.dmarc_record(), "sp")
    }

    pub fn spf_text(&self) -> String {
        self.spf.text_or(&spf_sentinel())
    }

    pub fn mx_text(&self) -> String {
        self.mx.text_or(&QueryType::Mx.sentinel())
    }

    pub fn nameservers(&self) -> &[String] {
        &self.registration.nameservers
    }

    pub fn registrar(&self) -> Option<&str> {
        self.registration.registrar.as_deref()
    }

    pub fn created_on(&self) -> Option<DateTime<Utc>> {
        self.registration.created_on
    }

    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.registration.expires_on
    }

    pub fn updated_on(&self) -> Option<DateTime<Utc>> {
        self.registration.updated_on
    }

    /// Classifier view of this record.
    pub fn observed(&self) -> Observed<'_> {
        Observed {
            dmarc: self.dmarc_record(),
            spf: found(&self.spf),
            mx: found(&self.mx),
            nameservers: self.nameservers(),
        }
    }

    /// Failed lookups, in execution order.
    pub fn failures(&self) -> Vec<(LookupKind, FailureClass)> {
        let mut failures: Vec<(LookupKind, FailureClass)> = [
            (LookupKind::Dmarc, &self.dmarc),
            (LookupKind::Spf, &self.spf),
            (LookupKind::Mx, &self.mx),
        ]
        .into_iter()
        .filter_map(|(kind, outcome)| outcome.failure_class().map(|class| (kind, class)))
        .collect();
        if let Some(failure) = &self.whois_error {
            failures.push((LookupKind::Whois, failure.class));
        }
        failures
    }
}

fn found(outcome: &LookupOutcome) -> Option<&str> {
    match outcome {
        LookupOutcome::Found(text) => Some(text.as_str()),
        _ => None,
    }
}

/// Renders a WHOIS date the way the workbook shows it.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
