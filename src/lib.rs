//! mail_posture library: email-authentication posture of a domain portfolio
//!
//! This library resolves DMARC, SPF and MX records plus WHOIS registration data
//! for a list of domains, classifies each domain against an ownership profile,
//! and writes a report: an XLSX workbook, five pie charts, an HTML dashboard and
//! a PDF.
//!
//! # Example
//!
//! ```no_run
//! use mail_posture::{run_job, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.csv"),
//!     max_concurrency: 5,
//!     ..Default::default()
//! };
//!
//! let report = run_job(config).await?;
//! println!("Processed {} domains in {:.1}s",
//!          report.total_domains, report.elapsed_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod classify;
pub mod config;
pub mod dns;
pub mod error_handling;
pub mod initialization;
pub mod job;
pub mod report;
pub mod whois;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OwnershipProfile};
pub use run::{run_job, run_job_with, JobReport};

// Internal run module (wires configuration, lookups and reporting together)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::{anyhow, Context, Result};
    use chrono::{Local, Utc};
    use log::warn;

    use crate::classify::AggregateCounters;
    use crate::config::{Config, ARTIFACT_TIMESTAMP_FORMAT};
    use crate::dns::RecordResolver;
    use crate::error_handling::{FailureClass, LookupStats};
    use crate::initialization::init_resolver;
    use crate::job::{read_domains, Job, JobContext, JobLog};
    use crate::report::{synthesize, ArtifactPaths, ReportArtifactSet, ReportInput};
    use crate::whois::{RegistrationClient, WhoisClient};

    /// Results of a completed job.
    pub struct JobReport {
        /// Job identifier (format: `job_<timestamp_millis>` unless configured)
        pub job_id: String,
        /// Number of domains read from the input file
        pub total_domains: usize,
        /// Directory holding every artifact of this job
        pub job_dir: PathBuf,
        pub counters: AggregateCounters,
        pub lookup_stats: LookupStats,
        pub artifacts: ReportArtifactSet,
        /// Elapsed time in seconds, lookups and reporting included
        pub elapsed_seconds: f64,
    }

    impl JobReport {
        /// Lookups that returned no data, of any kind.
        pub fn failed_lookups(&self) -> usize {
            self.lookup_stats.total(FailureClass::NotFound)
                + self.lookup_stats.total(FailureClass::Transient)
        }
    }

    /// Runs a job with the DNS resolver and WHOIS client described by `config`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid
    /// - The input file cannot be read or has no `Domain` column
    /// - The DNS resolver or the WHOIS client cannot be initialized
    /// - The job directory or log file cannot be created
    ///
    /// Lookup failures and report artifact failures are not errors; see
    /// [`JobReport::lookup_stats`] and [`ReportArtifactSet::failures`].
    pub async fn run_job(config: Config) -> Result<JobReport> {
        config.validate().map_err(|e| anyhow!(e))?;
        let resolver = init_resolver(
            &config.nameserver,
            config.dns_timeout(),
            config.dns_deadline(),
        )
        .context("Failed to initialize DNS resolver")?;
        let registrar = Arc::new(
            WhoisClient::new(config.whois_timeout())
                .await
                .context("Failed to initialize WHOIS client")?,
        );
        run_job_with(config, resolver, registrar).await
    }

    /// Runs a job with caller-supplied lookup backends.
    pub async fn run_job_with(
        config: Config,
        resolver: Arc<dyn RecordResolver>,
        registrar: Arc<dyn RegistrationClient>,
    ) -> Result<JobReport> {
        config.validate().map_err(|e| anyhow!(e))?;
        let start_time = std::time::Instant::now();

        // Input problems abort before anything is written
        let domains = read_domains(&config.file)?;

        let job_id = config
            .job_id
            .clone()
            .unwrap_or_else(|| format!("job_{}", Utc::now().timestamp_millis()));
        let timestamp = Local::now().format(ARTIFACT_TIMESTAMP_FORMAT).to_string();
        let paths = ArtifactPaths::new(&config.output_dir, &job_id, &timestamp);
        paths.create_dirs()?;
        let log = Arc::new(JobLog::create(&paths.log)?);
        log.info(format!("Starting job: {job_id}"));

        let profile = config.profile();
        let total_domains = domains.len();
        let ctx = JobContext {
            resolver,
            registrar,
            log: Arc::clone(&log),
            domain_timeout: config.domain_timeout(),
        };
        let mut job = Job::new(job_id.clone(), domains, ctx);
        let results = job.run(config.max_concurrency, &profile).await?;
        results.lookup_stats.log_summary();

        let artifacts = synthesize(
            &paths,
            &ReportInput {
                job_id: &job_id,
                records: &results.records,
                counters: &results.counters,
                profile: &profile,
                log: &log,
                generated_at: Local::now(),
            },
        );
        if !artifacts.is_complete() {
            warn!(
                "{} of the report artifacts could not be generated",
                artifacts.failures.len()
            );
        }

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        log.info(format!("Job {job_id} finished in {elapsed_seconds:.1}s"));

        Ok(JobReport {
            job_id,
            total_domains,
            job_dir: paths.job_dir,
            counters: results.counters,
            lookup_stats: results.lookup_stats,
            artifacts,
            elapsed_seconds,
        })
    }
}
