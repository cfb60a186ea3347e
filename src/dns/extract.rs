//! DNS record extraction utilities.
//!
//! This module provides functions to extract SPF records from TXT record
//! collections and to read policy tags from DMARC records.

use crate::config::SPF_PREFIX;

/// Extracts SPF record from TXT records.
///
/// SPF records start with "v=spf1".
///
/// # Returns
///
/// The first SPF record found, or `None` if no SPF record exists.
pub fn extract_spf_record(txt_records: &[String]) -> Option<String> {
    txt_records
        .iter()
        .find(|txt| txt.trim().starts_with(SPF_PREFIX))
        .map(|s| s.trim().to_string())
}

/// Splits a DMARC record into `(tag, value)` pairs.
///
/// Tags are `;`-separated `name=value` pairs; whitespace around names and
/// values is ignored and malformed entries (no `=`) are skipped.
pub fn parse_dmarc_tags(record: &str) -> Vec<(String, String)> {
    record
        .split(';')
        .filter_map(|part| {
            let (tag, value) = part.split_once('=')?;
            let tag = tag.trim();
            if tag.is_empty() {
                return None;
            }
            Some((tag.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Returns the value of the first `tag=` in a DMARC record.
///
/// Tag names compare case-insensitively, so `sp` is never mistaken for `p`.
pub fn extract_dmarc_tag(record: &str, tag: &str) -> Option<String> {
    parse_dmarc_tags(record)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Policy text for the workbook: the tag value or `No <tag> policy found`.
pub fn policy_or_placeholder(record: Option<&str>, tag: &str) -> String {
    record
        .and_then(|r| extract_dmarc_tag(r, tag))
        .unwrap_or_else(|| format!("No {tag} policy found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spf_record_first_match() {
        let records = vec![
            "google-site-verification=abc".to_string(),
            "  v=spf1 include:_spf.example.com ~all ".to_string(),
            "v=spf1 -all".to_string(),
        ];
        assert_eq!(
            extract_spf_record(&records),
            Some("v=spf1 include:_spf.example.com ~all".to_string())
        );
    }

    #[test]
    fn test_extract_spf_record_none() {
        let records = vec!["v=DMARC1; p=none".to_string()];
        assert_eq!(extract_spf_record(&records), None);
        assert_eq!(extract_spf_record(&[]), None);
    }

    #[test]
    fn test_extract_dmarc_tag_ignores_sp_when_reading_p() {
        let record = "v=DMARC1; sp=none; p=reject; rua=mailto:a@example.com";
        assert_eq!(extract_dmarc_tag(record, "p"), Some("reject".to_string()));
        assert_eq!(extract_dmarc_tag(record, "sp"), Some("none".to_string()));
    }

    #[test]
    fn test_extract_dmarc_tag_first_occurrence_wins() {
        let record = "v=DMARC1; p=quarantine; p=none";
        assert_eq!(
            extract_dmarc_tag(record, "p"),
            Some("quarantine".to_string())
        );
    }

    #[test]
    fn test_extract_dmarc_tag_is_case_insensitive_on_name() {
        assert_eq!(
            extract_dmarc_tag("v=DMARC1; P=Reject", "p"),
            Some("Reject".to_string())
        );
    }

    #[test]
    fn test_policy_placeholder() {
        assert_eq!(policy_or_placeholder(None, "p"), "No p policy found");
        assert_eq!(
            policy_or_placeholder(Some("v=DMARC1; p=none"), "sp"),
            "No sp policy found"
        );
        assert_eq!(policy_or_placeholder(Some("v=DMARC1; p=none"), "p"), "none");
    }

    #[test]
    fn test_parse_dmarc_tags_skips_malformed_parts() {
        let tags = parse_dmarc_tags("v=DMARC1;; junk ; =x; p = reject ");
        assert_eq!(
            tags,
            vec![
                ("v".to_string(), "DMARC1".to_string()),
                ("p".to_string(), "reject".to_string())
            ]
        );
    }
}
