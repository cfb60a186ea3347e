// Shared test helpers: in-memory lookup backends and input files.
//
// Each integration test file pulls this in with `mod helpers;`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use mail_posture::dns::{QueryFailure, QueryType, RecordResolver};
use mail_posture::whois::{Registration, RegistrationClient, WhoisError};
use mail_posture::Config;

/// DNS answers keyed by (name, type). Unknown names are NXDOMAIN.
#[derive(Default)]
pub struct FakeDns {
    answers: HashMap<(String, QueryType), Vec<String>>,
    delay: Duration,
}

#[allow(dead_code)] // Not every test file uses every builder
impl FakeDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn txt(mut self, name: &str, value: &str) -> Self {
        self.answers
            .entry((name.to_string(), QueryType::Txt))
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn mx(mut self, name: &str, value: &str) -> Self {
        self.answers
            .entry((name.to_string(), QueryType::Mx))
            .or_default()
            .push(value.to_string());
        self
    }

    /// Delays every answer, to shuffle completion order under concurrency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl RecordResolver for FakeDns {
    async fn query(
        &self,
        name: &str,
        query_type: QueryType,
    ) -> Result<Vec<String>, QueryFailure> {
        if !self.delay.is_zero() {
            // Vary the delay per name so tasks finish out of input order
            let jitter = name.len() as u32 % 4;
            tokio::time::sleep(self.delay * (jitter + 1)).await;
        }
        self.answers
            .get(&(name.to_string(), query_type))
            .cloned()
            .ok_or(QueryFailure::NotFound)
    }
}

/// WHOIS answers keyed by domain. Unknown domains time out.
#[derive(Default)]
pub struct FakeWhois {
    registrations: HashMap<String, Registration>,
}

#[allow(dead_code)]
impl FakeWhois {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(mut self, domain: &str, nameservers: &[&str]) -> Self {
        self.registrations.insert(
            domain.to_string(),
            Registration {
                nameservers: nameservers.iter().map(|s| s.to_string()).collect(),
                registrar: Some("Test Registrar".to_string()),
                ..Registration::default()
            },
        );
        self
    }
}

#[async_trait]
impl RegistrationClient for FakeWhois {
    async fn lookup(&self, domain: &str) -> Result<Registration, WhoisError> {
        self.registrations
            .get(domain)
            .cloned()
            .ok_or(WhoisError::Timeout(Duration::from_secs(15)))
    }
}

/// Writes `contents` as `domains.csv` under `dir`.
#[allow(dead_code)]
pub fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("domains.csv");
    std::fs::write(&path, contents).expect("Failed to write input file");
    path
}

/// Config reading `input` and writing under `output_dir` with a fixed job id.
#[allow(dead_code)]
pub fn test_config(input: PathBuf, output_dir: &Path, max_concurrency: usize) -> Config {
    Config {
        file: input,
        output_dir: output_dir.to_path_buf(),
        job_id: Some("job_test".to_string()),
        max_concurrency,
        ..Default::default()
    }
}
