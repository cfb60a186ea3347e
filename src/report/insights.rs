//! Key-insight sentences for the dashboard.
//!
//! One sentence per taxonomy, chosen from the first non-zero bucket in rule
//! order, with a fallback when every bucket is empty.

use crate::classify::{
    AggregateCounters, DmarcOwnershipLabel, DmarcPolicyLabel, MxLabel, SpfLabel, WhoisLabel,
};
use crate::config::OwnershipProfile;

fn spf_insight(counters: &AggregateCounters, profile: &OwnershipProfile) -> String {
    match counters.spf.first_nonzero() {
        Some((SpfLabel::NoRecord, n)) => format!(
            "{n} domains are missing SPF records. Please review these for improved email security."
        ),
        Some((SpfLabel::ExplicitHardFail, n)) => format!(
            "{n} domains have explicit hard fail SPF policies. Ensure this is intentional."
        ),
        Some((SpfLabel::InternalProvider, n)) => format!(
            "{n} domains use {} Agari SPF. Confirm these are correctly configured.",
            profile.legacy_name
        ),
        Some((SpfLabel::ThirdParty, _)) | None => format!(
            "Most domains ({}) use third-party SPF records. Review for compliance.",
            counters.spf.get(SpfLabel::ThirdParty)
        ),
    }
}

fn mx_insight(counters: &AggregateCounters, profile: &OwnershipProfile) -> String {
    match counters.mx.first_nonzero() {
        Some((MxLabel::NoRecord, n)) => {
            format!("{n} domains are missing MX records. These domains cannot receive emails.")
        }
        Some((MxLabel::PrimaryProvider, n)) => format!(
            "{n} domains are using {} MX. Ensure these are managed as expected.",
            profile.owner_name
        ),
        Some((MxLabel::LegacyProvider, n)) => format!(
            "{n} domains are still using {} MX. Review migration status.",
            profile.legacy_name
        ),
        Some((MxLabel::ThirdParty, _)) | None => format!(
            "Most domains ({}) use third-party MX records. Review for compliance.",
            counters.mx.get(MxLabel::ThirdParty)
        ),
    }
}

fn dmarc_ownership_insight(counters: &AggregateCounters, profile: &OwnershipProfile) -> String {
    match counters.dmarc_ownership.first_nonzero() {
        Some((DmarcOwnershipLabel::NoRecord, n)) => {
            format!("{n} domains lack DMARC records. Add DMARC for better protection.")
        }
        Some((DmarcOwnershipLabel::NonMigrated, n)) => format!(
            "{n} domains still use {} DMARC. Review migration plan.",
            profile.legacy_name
        ),
        Some((DmarcOwnershipLabel::Migrated, n)) => format!(
            "{n} domains have migrated to {} DMARC. Good progress!",
            profile.owner_name
        ),
        None => "All domains have DMARC records.".to_string(),
    }
}

fn dmarc_policy_insight(counters: &AggregateCounters) -> String {
    match counters.dmarc_policy.first_nonzero() {
        Some((DmarcPolicyLabel::NoRecord, n)) => {
            format!("{n} domains lack DMARC records. Add DMARC for better protection.")
        }
        Some((DmarcPolicyLabel::Reject, n)) => {
            format!("{n} domains enforce reject DMARC policy. This is recommended.")
        }
        Some((DmarcPolicyLabel::Quarantine, n)) => format!(
            "{n} domains enforce quarantine DMARC policy. We can consider upgrading to reject policy."
        ),
        Some((DmarcPolicyLabel::NoPolicy, n)) => {
            format!("{n} domains have no DMARC policy. Set a policy for better protection.")
        }
        None => "All domains have DMARC policies.".to_string(),
    }
}

fn whois_insight(counters: &AggregateCounters, profile: &OwnershipProfile) -> String {
    let owner = &profile.owner_name;
    match counters.whois.first_nonzero() {
        Some((WhoisLabel::NoNameservers, n)) => format!(
            "{n} domains have no name servers. Review registration status and confirm with DNS Team if {owner} actually owns these."
        ),
        Some((WhoisLabel::Owned, n)) => {
            format!("{n} domains are {owner} owned. Good asset management!")
        }
        Some((WhoisLabel::NotOwned, n)) => {
            format!("{n} domains point to Non-{owner} DNS. Review ownership and risk.")
        }
        None => "All domains have valid name servers.".to_string(),
    }
}

/// Insight sentences in taxonomy order, exact duplicates dropped.
pub fn key_insights(counters: &AggregateCounters, profile: &OwnershipProfile) -> Vec<String> {
    let candidates = [
        spf_insight(counters, profile),
        mx_insight(counters, profile),
        dmarc_ownership_insight(counters, profile),
        dmarc_policy_insight(counters),
        whois_insight(counters, profile),
    ];

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for sentence in candidates {
        if !unique.contains(&sentence) {
            unique.push(sentence);
        }
    }
    unique
}
