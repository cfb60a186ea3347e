//! Ownership profile.
//!
//! The classifier buckets domains relative to one organisation (the *owner*) and
//! the organisation it is migrating away from (the *legacy* owner). The profile
//! carries both display names and every substring marker the rule tables match on.

use super::constants::*;

/// Organisation names and provider markers used by the classifier and the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipProfile {
    /// Organisation the report is produced for (e.g. "Kenvue").
    pub owner_name: String,
    /// Organisation whose infrastructure is being migrated away from (e.g. "JNJ").
    pub legacy_name: String,
    /// Substrings identifying the internal (managed) SPF provider.
    pub internal_spf_markers: Vec<String>,
    /// Substrings identifying the owner's primary mail exchanger.
    pub primary_mx_markers: Vec<String>,
    /// Substrings identifying the legacy mail exchanger.
    pub legacy_mx_markers: Vec<String>,
    /// Aggregate (rua) report address of the legacy DMARC provider.
    pub legacy_dmarc_rua: String,
    /// Forensic (ruf) report address of the legacy DMARC provider.
    pub legacy_dmarc_ruf: String,
    /// Report addresses of the provider domains have migrated to.
    pub migrated_dmarc_markers: Vec<String>,
    /// Substring that marks a nameserver as owner-operated.
    pub owned_ns_marker: String,
}

impl OwnershipProfile {
    /// Report addresses that identify a domain still reporting to the legacy provider.
    pub fn legacy_dmarc_markers(&self) -> [&str; 2] {
        [&self.legacy_dmarc_rua, &self.legacy_dmarc_ruf]
    }
}

impl Default for OwnershipProfile {
    fn default() -> Self {
        let owned = |markers: &[&str]| markers.iter().map(|m| (*m).to_string()).collect();
        Self {
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            legacy_name: DEFAULT_LEGACY_NAME.to_string(),
            internal_spf_markers: owned(DEFAULT_INTERNAL_SPF_MARKERS),
            primary_mx_markers: owned(DEFAULT_PRIMARY_MX_MARKERS),
            legacy_mx_markers: owned(DEFAULT_LEGACY_MX_MARKERS),
            legacy_dmarc_rua: DEFAULT_LEGACY_DMARC_RUA.to_string(),
            legacy_dmarc_ruf: DEFAULT_LEGACY_DMARC_RUF.to_string(),
            migrated_dmarc_markers: owned(DEFAULT_MIGRATED_DMARC_MARKERS),
            owned_ns_marker: DEFAULT_OWNED_NS_MARKER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_markers() {
        let profile = OwnershipProfile::default();
        assert_eq!(profile.owner_name, "Kenvue");
        assert_eq!(profile.legacy_name, "JNJ");
        assert_eq!(profile.internal_spf_markers.len(), 2);
        assert_eq!(profile.legacy_mx_markers.len(), 2);
        assert_eq!(
            profile.legacy_dmarc_markers(),
            ["jnj@rua.dmp.cisco.com", "jnj@ruf.dmp.cisco.com"]
        );
    }
}
