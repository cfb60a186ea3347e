//! Row highlight rules for the workbook.
//!
//! Fills are keyed to the same conditions as the classifier, so a reader can
//! scan a sheet and see the buckets.

use crate::config::OwnershipProfile;
use crate::dns::extract_dmarc_tag;

/// Background color of a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFill {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    /// No fill.
    Plain,
}

impl RowFill {
    /// RGB value, or `None` for an unfilled row.
    pub fn rgb(&self) -> Option<u32> {
        match self {
            RowFill::Red => Some(0xFF4433),
            RowFill::Green => Some(0x4CBB17),
            RowFill::Blue => Some(0x87CEEB),
            RowFill::Orange => Some(0xFBCEB1),
            RowFill::Yellow => Some(0xFFFF00),
            RowFill::Plain => None,
        }
    }
}

/// DMARC rows: red without a record, then by matching `p`/`sp` pairs.
/// Reports still going to the legacy provider turn the row yellow regardless.
pub fn dmarc_fill(record: Option<&str>, profile: &OwnershipProfile) -> RowFill {
    let Some(record) = record else {
        return RowFill::Red;
    };

    let p = extract_dmarc_tag(record, "p").map(|v| v.to_ascii_lowercase());
    let sp = extract_dmarc_tag(record, "sp").map(|v| v.to_ascii_lowercase());
    let lower = record.to_lowercase();
    let legacy_rua = format!("rua=mailto:{}", profile.legacy_dmarc_rua.to_lowercase());
    let legacy_ruf = format!("ruf=mailto:{}", profile.legacy_dmarc_ruf.to_lowercase());

    if lower.contains(&legacy_rua) || lower.contains(&legacy_ruf) {
        return RowFill::Yellow;
    }

    match (p.as_deref(), sp.as_deref()) {
        (Some("quarantine"), Some("quarantine")) => RowFill::Green,
        (Some("reject"), Some("reject")) => RowFill::Blue,
        (Some("none"), Some("none")) => RowFill::Orange,
        _ => RowFill::Plain,
    }
}

/// SPF and MX rows: green when a record exists.
pub fn presence_fill(found: bool) -> RowFill {
    if found {
        RowFill::Green
    } else {
        RowFill::Red
    }
}

/// WHOIS rows: green when owner-operated, red with no nameservers (or an
/// error), yellow otherwise.
pub fn whois_fill(nameservers: &[String], profile: &OwnershipProfile) -> RowFill {
    let marker = profile.owned_ns_marker.to_lowercase();
    if !marker.is_empty() && nameservers.iter().any(|ns| ns.contains(&marker)) {
        RowFill::Green
    } else if nameservers.is_empty() {
        RowFill::Red
    } else {
        RowFill::Yellow
    }
}
