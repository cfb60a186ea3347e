//! Work performed for a single domain.

use std::sync::Arc;
use std::time::Duration;

use crate::dns::{resolve_dmarc, resolve_mx, resolve_spf, LookupOutcome, RecordResolver};
use crate::error_handling::LookupKind;
use crate::whois::RegistrationClient;

use super::log::JobLog;
use super::record::{DomainRecord, WhoisFailure};

/// Shared, read-only resources for the workers of one job.
pub struct JobContext {
    pub resolver: Arc<dyn RecordResolver>,
    pub registrar: Arc<dyn RegistrationClient>,
    pub log: Arc<JobLog>,
    /// Upper bound on all lookups for one domain.
    pub domain_timeout: Duration,
}

fn log_outcome(log: &JobLog, kind: LookupKind, domain: &str, outcome: &LookupOutcome) {
    match outcome {
        LookupOutcome::Found(_) => {}
        LookupOutcome::NotFound => log.info(format!("No {kind} record found for {domain}")),
        LookupOutcome::TransientError(cause) => {
            log.warn(format!("Error fetching {kind} record for {domain}: {cause}"))
        }
    }
}

/// Runs DMARC, SPF, MX and WHOIS lookups for `domain`, in that order.
///
/// Never fails: every lookup failure is captured in the returned record.
pub async fn process_domain(domain: &str, ctx: &JobContext) -> DomainRecord {
    ctx.log.info(format!("Processing domain: {domain}"));
    let resolver = ctx.resolver.as_ref();

    let dmarc = resolve_dmarc(resolver, domain).await;
    log_outcome(&ctx.log, LookupKind::Dmarc, domain, &dmarc);

    let spf = resolve_spf(resolver, domain).await;
    log_outcome(&ctx.log, LookupKind::Spf, domain, &spf);

    let mx = resolve_mx(resolver, domain).await;
    log_outcome(&ctx.log, LookupKind::Mx, domain, &mx);

    let (registration, whois_error) = match ctx.registrar.lookup(domain).await {
        Ok(registration) => (registration, None),
        Err(e) => {
            ctx.log
                .error(format!("WHOIS lookup failed for {domain}: {e}"));
            (Default::default(), Some(WhoisFailure::from(&e)))
        }
    };

    DomainRecord {
        name: domain.to_string(),
        dmarc,
        spf,
        mx,
        registration,
        whois_error,
    }
}
