//! Ordered rule tables.
//!
//! Each taxonomy is an ordered list of `(predicate, label)` pairs evaluated
//! top to bottom; the first predicate that holds decides the label. Exhaustive
//! taxonomies end with a catch-all rule. Marker matching is a case-insensitive
//! substring test.

use crate::config::{OwnershipProfile, SPF_HARD_FAIL};
use crate::dns::extract_dmarc_tag;

use super::labels::{DmarcOwnershipLabel, DmarcPolicyLabel, MxLabel, SpfLabel, WhoisLabel};

/// What the lookups returned for one domain. `None` means no record.
#[derive(Debug, Clone, Copy)]
pub struct Observed<'a> {
    pub dmarc: Option<&'a str>,
    pub spf: Option<&'a str>,
    pub mx: Option<&'a str>,
    /// Normalized nameservers; empty when the WHOIS lookup failed.
    pub nameservers: &'a [String],
}

pub type Predicate = fn(&Observed<'_>, &OwnershipProfile) -> bool;

/// One row of a rule table.
pub struct Rule<L: 'static> {
    pub label: L,
    pub matches: Predicate,
}

/// Returns the label of the first matching rule.
pub fn first_match<L: Copy>(
    rules: &[Rule<L>],
    observed: &Observed<'_>,
    profile: &OwnershipProfile,
) -> Option<L> {
    rules
        .iter()
        .find(|rule| (rule.matches)(observed, profile))
        .map(|rule| rule.label)
}

fn contains_any<S: AsRef<str>>(text: &str, markers: &[S]) -> bool {
    let text = text.to_lowercase();
    markers
        .iter()
        .map(|m| m.as_ref().to_lowercase())
        .any(|m| !m.is_empty() && text.contains(&m))
}

fn otherwise(_: &Observed<'_>, _: &OwnershipProfile) -> bool {
    true
}

pub const SPF_RULES: &[Rule<SpfLabel>] = &[
    Rule {
        label: SpfLabel::NoRecord,
        matches: |o, _| o.spf.is_none(),
    },
    Rule {
        label: SpfLabel::ExplicitHardFail,
        matches: |o, _| o.spf.is_some_and(|spf| spf.trim() == SPF_HARD_FAIL),
    },
    Rule {
        label: SpfLabel::InternalProvider,
        matches: |o, p| {
            o.spf
                .is_some_and(|spf| contains_any(spf, &p.internal_spf_markers))
        },
    },
    Rule {
        label: SpfLabel::ThirdParty,
        matches: otherwise,
    },
];

pub const MX_RULES: &[Rule<MxLabel>] = &[
    Rule {
        label: MxLabel::NoRecord,
        matches: |o, _| o.mx.is_none(),
    },
    Rule {
        label: MxLabel::PrimaryProvider,
        matches: |o, p| o.mx.is_some_and(|mx| contains_any(mx, &p.primary_mx_markers)),
    },
    Rule {
        label: MxLabel::LegacyProvider,
        matches: |o, p| o.mx.is_some_and(|mx| contains_any(mx, &p.legacy_mx_markers)),
    },
    Rule {
        label: MxLabel::ThirdParty,
        matches: otherwise,
    },
];

/// Not exhaustive: a record with neither report address has no bucket.
pub const DMARC_OWNERSHIP_RULES: &[Rule<DmarcOwnershipLabel>] = &[
    Rule {
        label: DmarcOwnershipLabel::NoRecord,
        matches: |o, _| o.dmarc.is_none(),
    },
    Rule {
        label: DmarcOwnershipLabel::NonMigrated,
        matches: |o, p| {
            o.dmarc
                .is_some_and(|r| contains_any(r, &p.legacy_dmarc_markers()))
        },
    },
    Rule {
        label: DmarcOwnershipLabel::Migrated,
        matches: |o, p| {
            o.dmarc
                .is_some_and(|r| contains_any(r, &p.migrated_dmarc_markers))
        },
    },
];

fn dmarc_policy_is(observed: &Observed<'_>, policy: &str) -> bool {
    observed
        .dmarc
        .and_then(|r| extract_dmarc_tag(r, "p"))
        .is_some_and(|p| p.eq_ignore_ascii_case(policy))
}

pub const DMARC_POLICY_RULES: &[Rule<DmarcPolicyLabel>] = &[
    Rule {
        label: DmarcPolicyLabel::NoRecord,
        matches: |o, _| o.dmarc.is_none(),
    },
    Rule {
        label: DmarcPolicyLabel::Reject,
        matches: |o, _| dmarc_policy_is(o, "reject"),
    },
    Rule {
        label: DmarcPolicyLabel::Quarantine,
        matches: |o, _| dmarc_policy_is(o, "quarantine"),
    },
    // p=none, a missing p tag and unknown values alike
    Rule {
        label: DmarcPolicyLabel::NoPolicy,
        matches: otherwise,
    },
];

pub const WHOIS_RULES: &[Rule<WhoisLabel>] = &[
    Rule {
        label: WhoisLabel::NoNameservers,
        matches: |o, _| o.nameservers.is_empty(),
    },
    Rule {
        label: WhoisLabel::Owned,
        matches: |o, p| {
            o.nameservers
                .iter()
                .any(|ns| contains_any(ns, std::slice::from_ref(&p.owned_ns_marker)))
        },
    },
    Rule {
        label: WhoisLabel::NotOwned,
        matches: otherwise,
    },
];
