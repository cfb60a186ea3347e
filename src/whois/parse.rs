//! Conversion of whois-service answers into [`Registration`].

use chrono::{DateTime, Utc};
use whois_service::{LookupStatus, WhoisResponse};

use super::types::{Registration, WhoisError};

/// Maps a whois-service response onto a registration.
///
/// "Not registered" and throttled answers arrive as ordinary responses; both
/// become errors here so they are never mistaken for an empty registration.
pub(crate) fn convert_response(response: &WhoisResponse) -> Result<Registration, WhoisError> {
    match response.lookup_status {
        LookupStatus::Found => {}
        LookupStatus::NotFound => return Err(WhoisError::NotFound(response.domain.clone())),
        LookupStatus::RateLimited => {
            return Err(WhoisError::RateLimited(response.domain.clone()))
        }
    }

    let Some(parsed) = &response.parsed_data else {
        log::debug!(
            "No parsed WHOIS data for {} from {}",
            response.domain,
            response.whois_server
        );
        return Ok(Registration::default());
    };

    Ok(Registration {
        nameservers: normalize_nameservers(&parsed.name_servers),
        registrar: parsed
            .registrar
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        created_on: parse_date(parsed.creation_date.as_deref()),
        expires_on: parse_date(parsed.expiration_date.as_deref()),
        updated_on: parse_date(parsed.updated_date.as_deref()),
    })
}

/// Fixed WHOIS formats first, read as UTC; whois-service's parser covers the
/// rest. Its date-only results use local time, so they are not tried first.
fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    parse_date_string(value).or_else(|| whois_service::parse_date(value))
}

/// Attempts to parse a date string in various formats
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common WHOIS date formats
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%d-%b-%Y",
        "%d/%m/%Y",
        "%Y.%m.%d",
    ];

    for format in &formats {
        if let Ok(naive_dt) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    // "2020-01-01 00:00:00 UTC", "2015-03-02 (YYYY-MM-DD)" and similar
    let (head, _) = date_str.split_once(" (").unwrap_or((date_str, ""));
    let head = head.trim_end_matches(" UTC").trim_end_matches(" GMT").trim();
    if head != date_str {
        return parse_date_string(head);
    }

    None
}

/// Keeps the hostname of each entry, lowercased, dropping blanks and
/// duplicates.
///
/// Registries often list a glue address after the host
/// (`ns1.example.net 192.0.2.1`); only the first token is the nameserver.
pub fn normalize_nameservers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for ns in raw {
        let Some(host) = ns.as_ref().split_whitespace().next() else {
            continue;
        };
        let host = host.to_lowercase();
        if !out.contains(&host) {
            out.push(host);
        }
    }
    out
}
