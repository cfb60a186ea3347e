//! Job orchestration.
//!
//! A job fans its domain list out across a bounded pool of tasks, one task per
//! domain, then merges the per-domain records into classifications and
//! aggregate counts at a single point, in input order.
//!
//! Lifecycle: `Pending → Running → Completed`. There is no partial or
//! cancelled state; a job runs to completion or the process dies.

mod input;
mod log;
mod record;
mod worker;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;

use crate::classify::{classify, AggregateCounters, Classification, Taxonomy};
use crate::config::{OwnershipProfile, LOGGING_INTERVAL};
use crate::error_handling::LookupStats;
use crate::initialization::init_semaphore;

// Re-export public API
pub use input::read_domains;
pub use log::JobLog;
pub use record::{format_date, DomainRecord, WhoisFailure};
pub use worker::{process_domain, JobContext};

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
}

/// Merged output of a completed job.
pub struct JobResults {
    /// One record per input domain, in input order.
    pub records: Vec<DomainRecord>,
    /// Labels of `records[i]` at index `i`.
    pub classifications: Vec<Classification>,
    pub counters: AggregateCounters,
    pub lookup_stats: LookupStats,
    pub elapsed_seconds: f64,
}

/// One batch of domains processed with one set of resources.
pub struct Job {
    id: String,
    state: JobState,
    domains: Vec<String>,
    ctx: Arc<JobContext>,
}

impl Job {
    pub fn new(id: impl Into<String>, domains: Vec<String>, ctx: JobContext) -> Self {
        Self {
            id: id.into(),
            state: JobState::Pending,
            domains,
            ctx: Arc::new(ctx),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Looks up every domain with at most `max_concurrency` in flight, then
    /// classifies and counts them.
    ///
    /// # Errors
    ///
    /// Returns an error if the job has already been started.
    pub async fn run(
        &mut self,
        max_concurrency: usize,
        profile: &OwnershipProfile,
    ) -> Result<JobResults> {
        if self.state != JobState::Pending {
            bail!("Job {} has already been run ({:?})", self.id, self.state);
        }
        self.state = JobState::Running;
        ::log::info!(
            "Starting job {}: {} domains, concurrency {}",
            self.id,
            self.domains.len(),
            max_concurrency
        );

        let start_time = Instant::now();
        let records = self.lookup_all(max_concurrency.max(1)).await;

        let lookup_stats = LookupStats::new();
        let (classifications, counters) = merge(&records, profile, &lookup_stats);

        self.state = JobState::Completed;
        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.ctx.log.info(format!(
            "Job {} completed: {} domains in {:.1}s",
            self.id,
            records.len(),
            elapsed_seconds
        ));

        Ok(JobResults {
            records,
            classifications,
            counters,
            lookup_stats,
            elapsed_seconds,
        })
    }

    /// Fan-out/fan-in. Records come back in input order regardless of
    /// completion order.
    async fn lookup_all(&self, max_concurrency: usize) -> Vec<DomainRecord> {
        let semaphore = init_semaphore(max_concurrency);
        let mut tasks = FuturesUnordered::new();
        let total = self.domains.len();
        let start_time = Instant::now();

        for (index, domain) in self.domains.iter().enumerate() {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    ::log::warn!("Semaphore closed, deferring domain: {domain}");
                    break;
                }
            };

            let ctx = Arc::clone(&self.ctx);
            let domain = domain.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let timeout = ctx.domain_timeout;
                match tokio::time::timeout(timeout, process_domain(&domain, &ctx)).await {
                    Ok(record) => (index, record),
                    Err(_) => {
                        let cause = format!(
                            "domain processing timed out after {}s",
                            timeout.as_secs()
                        );
                        ctx.log.error(format!("Timeout processing {domain}: {cause}"));
                        (index, DomainRecord::abandoned(&domain, &cause))
                    }
                }
            }));
        }

        let mut slots: Vec<Option<DomainRecord>> = vec![None; total];
        let mut completed = 0usize;
        while let Some(task_result) = tasks.next().await {
            match task_result {
                Ok((index, record)) => slots[index] = Some(record),
                Err(join_error) => ::log::warn!("Domain task panicked: {:?}", join_error),
            }
            completed += 1;
            if completed % LOGGING_INTERVAL == 0 || completed == total {
                log_progress(start_time, completed, total);
            }
        }

        // Domains whose task died still get exactly one record
        slots
            .into_iter()
            .zip(&self.domains)
            .map(|(slot, domain)| {
                slot.unwrap_or_else(|| {
                    self.ctx
                        .log
                        .error(format!("No result for {domain}; recording lookups as failed"));
                    DomainRecord::abandoned(domain, "domain task did not complete")
                })
            })
            .collect()
    }
}

fn log_progress(start_time: Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    ::log::info!(
        "Processed {}/{} domains in {:.2} seconds (~{:.2} domains/sec)",
        completed,
        total,
        elapsed_secs,
        rate
    );
}

/// Classifies records and folds them into counters, one contribution each.
///
/// This is the only place counters and lookup statistics are written.
pub fn merge(
    records: &[DomainRecord],
    profile: &OwnershipProfile,
    lookup_stats: &LookupStats,
) -> (Vec<Classification>, AggregateCounters) {
    let mut counters = AggregateCounters::new();
    let classifications: Vec<Classification> = records
        .iter()
        .map(|record| {
            let classification = classify(&record.observed(), profile);
            counters.record(&classification);
            for (kind, class) in record.failures() {
                lookup_stats.increment(kind, class);
            }
            classification
        })
        .collect();

    if counters.unclassified_dmarc_ownership > 0 {
        ::log::info!(
            "{} domains have a DMARC record matching no ownership rule",
            counters.unclassified_dmarc_ownership
        );
    }
    for taxonomy in [Taxonomy::Spf, Taxonomy::Mx, Taxonomy::DmarcPolicy, Taxonomy::Whois] {
        debug_assert_eq!(counters.total(taxonomy), records.len());
    }

    (classifications, counters)
}
