//! Classification labels.
//!
//! Each taxonomy is a closed enum whose variant order is the rule order of its
//! table; reports list buckets in that order. Display names depend on the
//! ownership profile.

use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

use crate::config::OwnershipProfile;

/// The five independent classification schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Taxonomy {
    Spf,
    Mx,
    DmarcOwnership,
    DmarcPolicy,
    Whois,
}

impl Taxonomy {
    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            Taxonomy::Spf => "SPF Summary",
            Taxonomy::Mx => "MX Summary",
            Taxonomy::DmarcOwnership => "DMARC Ownership",
            Taxonomy::DmarcPolicy => "DMARC Policy",
            Taxonomy::Whois => "WHOIS Summary",
        }
    }

    /// Chart image file name.
    pub fn chart_file(&self) -> &'static str {
        match self {
            Taxonomy::Spf => "spf_chart.png",
            Taxonomy::Mx => "mx_chart.png",
            Taxonomy::DmarcOwnership => "dmarc_ownership.png",
            Taxonomy::DmarcPolicy => "dmarc_policy.png",
            Taxonomy::Whois => "whois_chart.png",
        }
    }

    /// Whether every domain lands in exactly one bucket.
    pub fn is_exhaustive(&self) -> bool {
        !matches!(self, Taxonomy::DmarcOwnership)
    }
}

/// A bucket of one taxonomy.
pub trait Label: Copy + Eq + std::fmt::Debug + IntoEnumIterator + Send + Sync + 'static {
    const TAXONOMY: Taxonomy;

    /// Position in rule order.
    fn index(self) -> usize;

    fn display(self, profile: &OwnershipProfile) -> String;

    /// Number of buckets.
    fn count() -> usize {
        Self::iter().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum SpfLabel {
    NoRecord,
    ExplicitHardFail,
    InternalProvider,
    ThirdParty,
}

impl Label for SpfLabel {
    const TAXONOMY: Taxonomy = Taxonomy::Spf;

    fn index(self) -> usize {
        self as usize
    }

    fn display(self, profile: &OwnershipProfile) -> String {
        match self {
            SpfLabel::NoRecord => "No SPF Record".to_string(),
            SpfLabel::ExplicitHardFail => "Explicit Hard Fail".to_string(),
            SpfLabel::InternalProvider => format!("{} Agari SPF", profile.legacy_name),
            SpfLabel::ThirdParty => "Third Party SPF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum MxLabel {
    NoRecord,
    PrimaryProvider,
    LegacyProvider,
    ThirdParty,
}

impl Label for MxLabel {
    const TAXONOMY: Taxonomy = Taxonomy::Mx;

    fn index(self) -> usize {
        self as usize
    }

    fn display(self, profile: &OwnershipProfile) -> String {
        match self {
            MxLabel::NoRecord => "No MX Record".to_string(),
            MxLabel::PrimaryProvider => format!("{} MX", profile.owner_name),
            MxLabel::LegacyProvider => format!("{} MX", profile.legacy_name),
            MxLabel::ThirdParty => "Third Party MX".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DmarcOwnershipLabel {
    NoRecord,
    NonMigrated,
    Migrated,
}

impl Label for DmarcOwnershipLabel {
    const TAXONOMY: Taxonomy = Taxonomy::DmarcOwnership;

    fn index(self) -> usize {
        self as usize
    }

    fn display(self, profile: &OwnershipProfile) -> String {
        match self {
            DmarcOwnershipLabel::NoRecord => "No DMARC Record".to_string(),
            DmarcOwnershipLabel::NonMigrated => {
                format!("Non-Migrated {} DMARC", profile.legacy_name)
            }
            DmarcOwnershipLabel::Migrated => format!("Migrated {} DMARC", profile.owner_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DmarcPolicyLabel {
    NoRecord,
    Reject,
    Quarantine,
    NoPolicy,
}

impl Label for DmarcPolicyLabel {
    const TAXONOMY: Taxonomy = Taxonomy::DmarcPolicy;

    fn index(self) -> usize {
        self as usize
    }

    fn display(self, _profile: &OwnershipProfile) -> String {
        match self {
            DmarcPolicyLabel::NoRecord => "No DMARC Record",
            DmarcPolicyLabel::Reject => "Reject DMARC Policy",
            DmarcPolicyLabel::Quarantine => "Quarantine DMARC Policy",
            DmarcPolicyLabel::NoPolicy => "No DMARC Policy",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WhoisLabel {
    NoNameservers,
    Owned,
    NotOwned,
}

impl Label for WhoisLabel {
    const TAXONOMY: Taxonomy = Taxonomy::Whois;

    fn index(self) -> usize {
        self as usize
    }

    fn display(self, profile: &OwnershipProfile) -> String {
        match self {
            WhoisLabel::NoNameservers => "No Name Servers Found".to_string(),
            WhoisLabel::Owned => format!("{} Owned Domains", profile.owner_name),
            WhoisLabel::NotOwned => format!("Non-{} Domain", profile.owner_name),
        }
    }
}
