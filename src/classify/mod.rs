//! Domain classification.
//!
//! Pure mapping from one domain's lookup results to one label per taxonomy:
//! - SPF provider
//! - MX provider
//! - DMARC ownership (may leave a domain unclassified)
//! - DMARC policy
//! - WHOIS nameserver ownership
//!
//! Rules live in ordered tables (see [`rules`]); the first match wins.

mod counters;
mod fill;
mod labels;
pub mod rules;

use crate::config::OwnershipProfile;

// Re-export public API
pub use counters::{AggregateCounters, Bucket, Tally};
pub use fill::{dmarc_fill, presence_fill, whois_fill, RowFill};
pub use labels::{
    DmarcOwnershipLabel, DmarcPolicyLabel, Label, MxLabel, SpfLabel, Taxonomy, WhoisLabel,
};
pub use rules::Observed;

use rules::{
    first_match, DMARC_OWNERSHIP_RULES, DMARC_POLICY_RULES, MX_RULES, SPF_RULES, WHOIS_RULES,
};

/// One domain's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub spf: SpfLabel,
    pub mx: MxLabel,
    /// `None` when a DMARC record exists but matches no known report address.
    pub dmarc_ownership: Option<DmarcOwnershipLabel>,
    pub dmarc_policy: DmarcPolicyLabel,
    pub whois: WhoisLabel,
}

/// Classifies one domain.
pub fn classify(observed: &Observed<'_>, profile: &OwnershipProfile) -> Classification {
    Classification {
        // Exhaustive tables end in a catch-all; the fallbacks mirror it
        spf: first_match(SPF_RULES, observed, profile).unwrap_or(SpfLabel::ThirdParty),
        mx: first_match(MX_RULES, observed, profile).unwrap_or(MxLabel::ThirdParty),
        dmarc_ownership: first_match(DMARC_OWNERSHIP_RULES, observed, profile),
        dmarc_policy: first_match(DMARC_POLICY_RULES, observed, profile)
            .unwrap_or(DmarcPolicyLabel::NoPolicy),
        whois: first_match(WHOIS_RULES, observed, profile).unwrap_or(WhoisLabel::NotOwned),
    }
}
