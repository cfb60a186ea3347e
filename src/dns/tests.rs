//! DNS module tests.

use super::*;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use std::collections::HashMap;
use std::time::Duration;

/// Resolver answering from a fixed table; unknown names are NXDOMAIN.
struct TableResolver {
    answers: HashMap<(String, QueryType), Result<Vec<String>, QueryFailure>>,
}

impl TableResolver {
    fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    fn with(
        mut self,
        name: &str,
        query_type: QueryType,
        answer: Result<Vec<&str>, QueryFailure>,
    ) -> Self {
        let answer = answer.map(|a| a.into_iter().map(String::from).collect());
        self.answers.insert((name.to_string(), query_type), answer);
        self
    }
}

#[async_trait]
impl RecordResolver for TableResolver {
    async fn query(
        &self,
        name: &str,
        query_type: QueryType,
    ) -> Result<Vec<String>, QueryFailure> {
        self.answers
            .get(&(name.to_string(), query_type))
            .cloned()
            .unwrap_or(Err(QueryFailure::NotFound))
    }
}

#[tokio::test]
async fn test_resolve_joins_answers_in_server_order() {
    let resolver = TableResolver::new().with(
        "example.com",
        QueryType::Mx,
        Ok(vec!["20 mx2.example.com.", "10 mx1.example.com."]),
    );
    let outcome = resolve_mx(&resolver, "example.com").await;
    assert_eq!(
        outcome,
        LookupOutcome::Found("20 mx2.example.com., 10 mx1.example.com.".to_string())
    );
}

#[tokio::test]
async fn test_resolve_dmarc_queries_underscore_name() {
    let resolver = TableResolver::new().with(
        "_dmarc.example.com",
        QueryType::Txt,
        Ok(vec!["v=DMARC1; p=reject"]),
    );
    let outcome = resolve_dmarc(&resolver, "example.com").await;
    assert_eq!(outcome, LookupOutcome::Found("v=DMARC1; p=reject".to_string()));
}

#[tokio::test]
async fn test_timeout_and_negative_answer_share_sentinel() {
    let resolver = TableResolver::new().with(
        "slow.example",
        QueryType::Mx,
        Err(QueryFailure::Transient("deadline of 20s exceeded".to_string())),
    );
    let timed_out = resolve_mx(&resolver, "slow.example").await;
    let missing = resolve_mx(&resolver, "missing.example").await;

    assert!(matches!(timed_out, LookupOutcome::TransientError(_)));
    assert_eq!(missing, LookupOutcome::NotFound);

    let sentinel = QueryType::Mx.sentinel();
    assert_eq!(sentinel, "No MX record found");
    assert_eq!(timed_out.text_or(&sentinel), missing.text_or(&sentinel));
}

#[tokio::test]
async fn test_resolve_spf_ignores_other_txt_records() {
    let resolver = TableResolver::new().with(
        "example.com",
        QueryType::Txt,
        Ok(vec!["google-site-verification=xyz", "MS=ms123"]),
    );
    let outcome = resolve_spf(&resolver, "example.com").await;
    assert_eq!(outcome, LookupOutcome::NotFound);
    assert_eq!(outcome.text_or(&spf_sentinel()), "No SPF record found");
}

#[tokio::test]
async fn test_resolve_spf_picks_first_spf_string() {
    let resolver = TableResolver::new().with(
        "example.com",
        QueryType::Txt,
        Ok(vec!["MS=ms123", "v=spf1 -all", "v=spf1 include:other ~all"]),
    );
    let outcome = resolve_spf(&resolver, "example.com").await;
    assert_eq!(outcome, LookupOutcome::Found("v=spf1 -all".to_string()));
}

#[tokio::test]
async fn test_resolve_spf_propagates_transient_failure() {
    let resolver = TableResolver::new().with(
        "example.com",
        QueryType::Txt,
        Err(QueryFailure::Transient("SERVFAIL".to_string())),
    );
    let outcome = resolve_spf(&resolver, "example.com").await;
    assert_eq!(
        outcome.failure_class(),
        Some(crate::error_handling::FailureClass::Transient)
    );
}

#[test]
fn test_sentinel_text() {
    assert_eq!(QueryType::Txt.sentinel(), "No TXT record found");
    assert_eq!(sentinel_for("SPF"), "No SPF record found");
}

/// Creates a live resolver with short timeouts for faster test execution.
fn create_test_resolver() -> DnsResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(5);
    opts.attempts = 1; // Single attempt for faster failures in tests
    opts.ndots = 0;

    DnsResolver::new(
        hickory_resolver::TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        Duration::from_secs(10),
    )
}

#[tokio::test]
#[ignore] // Requires network access: cargo test -- --ignored
async fn test_live_mx_lookup() {
    let resolver = create_test_resolver();
    let outcome = resolve_mx(&resolver, "google.com").await;
    assert!(outcome.is_found(), "google.com should have MX records");
}

#[tokio::test]
#[ignore] // Requires network access: cargo test -- --ignored
async fn test_live_nxdomain_is_not_found() {
    let resolver = create_test_resolver();
    let outcome = resolve_mx(&resolver, "definitely-does-not-exist-12345.invalid").await;
    assert!(!outcome.is_found());
    assert_eq!(
        outcome.text_or(&QueryType::Mx.sentinel()),
        "No MX record found"
    );
}
