//! DNS record queries (TXT, MX) against a fixed nameserver.
//!
//! This module provides the [`RecordResolver`] seam used by the job workers and
//! its production implementation backed by `hickory-resolver`, plus the three
//! resolutions the scanner performs per domain (DMARC, SPF, MX).

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::extract::extract_spf_record;
use super::types::{sentinel_for, LookupOutcome, QueryFailure, QueryType};

/// Issues raw DNS queries.
///
/// Answers are rendered to text (TXT: concatenated character strings, MX:
/// `<preference> <exchange>`) in server order.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    async fn query(&self, name: &str, query_type: QueryType)
        -> Result<Vec<String>, QueryFailure>;
}

/// Production resolver: one nameserver, per-query timeout, total deadline.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
    deadline: Duration,
}

impl DnsResolver {
    pub fn new(inner: TokioAsyncResolver, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl RecordResolver for DnsResolver {
    async fn query(
        &self,
        name: &str,
        query_type: QueryType,
    ) -> Result<Vec<String>, QueryFailure> {
        let record_type = match query_type {
            QueryType::Txt => RecordType::TXT,
            QueryType::Mx => RecordType::MX,
        };
        let pending = self.inner.lookup(name, record_type);
        let lookup = match tokio::time::timeout(self.deadline, pending).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => return Err(classify_resolve_error(&e)),
            Err(_) => {
                return Err(QueryFailure::Transient(format!(
                    "deadline of {}s exceeded",
                    self.deadline.as_secs()
                )))
            }
        };

        let answers: Vec<String> = lookup.iter().filter_map(render_rdata).collect();
        if answers.is_empty() {
            Err(QueryFailure::NotFound)
        } else {
            Ok(answers)
        }
    }
}

/// Only NXDOMAIN and an empty NOERROR answer mean "no data"; a negative
/// response carrying SERVFAIL, REFUSED or similar is a server problem.
fn classify_resolve_error(error: &ResolveError) -> QueryFailure {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if matches!(response_code, ResponseCode::NXDomain | ResponseCode::NoError) =>
        {
            QueryFailure::NotFound
        }
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            QueryFailure::Transient(format!("server answered {response_code}"))
        }
        _ => QueryFailure::Transient(error.to_string()),
    }
}

fn render_rdata(rdata: &RData) -> Option<String> {
    match rdata {
        // TXT records can contain multiple strings - join them
        RData::TXT(txt) => Some(
            txt.iter()
                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                .collect::<Vec<String>>()
                .join(""),
        ),
        RData::MX(mx) => Some(format!("{} {}", mx.preference(), mx.exchange().to_utf8())),
        _ => None,
    }
}

/// Resolves `name`, joining all answers with `", "`.
pub async fn resolve(
    resolver: &dyn RecordResolver,
    name: &str,
    query_type: QueryType,
) -> LookupOutcome {
    match resolver.query(name, query_type).await {
        Ok(answers) => LookupOutcome::Found(answers.join(", ")),
        Err(failure) => {
            log::trace!(
                "{} lookup for {} returned no data: {:?}",
                query_type.as_str(),
                name,
                failure
            );
            failure.into()
        }
    }
}

/// Resolves the DMARC policy record published at `_dmarc.<domain>`.
pub async fn resolve_dmarc(resolver: &dyn RecordResolver, domain: &str) -> LookupOutcome {
    resolve(resolver, &format!("_dmarc.{domain}"), QueryType::Txt).await
}

/// Resolves the domain's SPF record: the first TXT answer beginning with `v=spf1`.
///
/// A domain whose TXT records contain no SPF string is `NotFound`, even though
/// the TXT query itself succeeded.
pub async fn resolve_spf(resolver: &dyn RecordResolver, domain: &str) -> LookupOutcome {
    match resolver.query(domain, QueryType::Txt).await {
        Ok(answers) => match extract_spf_record(&answers) {
            Some(spf) => LookupOutcome::Found(spf),
            None => LookupOutcome::NotFound,
        },
        Err(failure) => failure.into(),
    }
}

/// Resolves the domain's mail exchangers.
pub async fn resolve_mx(resolver: &dyn RecordResolver, domain: &str) -> LookupOutcome {
    resolve(resolver, domain, QueryType::Mx).await
}

/// Sentinel stored when no SPF record is found.
pub fn spf_sentinel() -> String {
    sentinel_for("SPF")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::op::Query;
    use hickory_resolver::Name;

    fn no_records(response_code: ResponseCode) -> ResolveError {
        let name = Name::from_ascii("_dmarc.example.com.").unwrap();
        ResolveErrorKind::NoRecordsFound {
            query: Box::new(Query::query(name, RecordType::TXT)),
            soa: None,
            negative_ttl: None,
            response_code,
            trusted: true,
        }
        .into()
    }

    #[test]
    fn test_negative_answers_are_not_found() {
        for code in [ResponseCode::NXDomain, ResponseCode::NoError] {
            assert_eq!(
                classify_resolve_error(&no_records(code)),
                QueryFailure::NotFound
            );
        }
    }

    #[test]
    fn test_server_failures_are_transient() {
        for code in [ResponseCode::ServFail, ResponseCode::Refused, ResponseCode::NotImp] {
            match classify_resolve_error(&no_records(code)) {
                QueryFailure::Transient(cause) => assert!(cause.contains("server answered")),
                other => panic!("{code:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_timeouts_are_transient() {
        let error = ResolveError::from(ResolveErrorKind::Timeout);
        assert!(matches!(
            classify_resolve_error(&error),
            QueryFailure::Transient(_)
        ));
    }
}
