//! Report synthesis.
//!
//! Turns a completed job into its artifacts, in this order:
//! 1. five PNG pie charts
//! 2. the XLSX workbook (which embeds the charts)
//! 3. the HTML dashboard
//! 4. the PDF report
//!
//! A failing artifact is recorded in [`ReportArtifactSet::failures`] and the
//! remaining artifacts are still produced. A missing chart is simply left out
//! of whatever would have embedded it.

mod chart;
mod dashboard;
mod insights;
mod pdf;
mod workbook;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use strum::IntoEnumIterator;

use crate::classify::{AggregateCounters, Taxonomy};
use crate::config::{OwnershipProfile, DASHBOARD_DIR, IMAGES_DIR, LOGS_DIR};
use crate::error_handling::{ArtifactKind, ReportError};
use crate::job::{DomainRecord, JobLog};

// Re-export public API
pub use chart::{render_pie_chart, save_png, slice_label, CHART_SIZE};
pub use dashboard::{png_data_uri, write_dashboard, DashboardSection, DashboardTemplate};
pub use insights::key_insights;
pub use pdf::write_pdf;
pub use workbook::{write_workbook, DMARC_HEADERS, MX_HEADERS, SPF_HEADERS, WHOIS_HEADERS};

const PDF_TITLE: &str = "DNS Lookup Report";

/// A chart that was rendered and saved.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub taxonomy: Taxonomy,
    pub path: PathBuf,
    /// Encoded PNG, reused by the workbook, dashboard and PDF.
    pub png: Vec<u8>,
}

/// File layout of one job under the output root.
///
/// ```text
/// <output>/<job_id>/DNS_Lookup_Results_<ts>.xlsx
/// <output>/<job_id>/Images/<chart>.png
/// <output>/<job_id>/Dashboard/DNS_Lookup_Summary_Dashboard_<ts>.html
/// <output>/<job_id>/Dashboard/DNS_Lookup_Report_<ts>.pdf
/// <output>/<job_id>/Logs/DNS_Script_Logs_<ts>.txt
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub job_dir: PathBuf,
    pub images_dir: PathBuf,
    pub dashboard_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub workbook: PathBuf,
    pub dashboard: PathBuf,
    pub pdf: PathBuf,
    pub log: PathBuf,
}

impl ArtifactPaths {
    pub fn new(output_root: &Path, job_id: &str, timestamp: &str) -> Self {
        let job_dir = output_root.join(job_id);
        let images_dir = job_dir.join(IMAGES_DIR);
        let dashboard_dir = job_dir.join(DASHBOARD_DIR);
        let logs_dir = job_dir.join(LOGS_DIR);
        Self {
            workbook: job_dir.join(format!("DNS_Lookup_Results_{timestamp}.xlsx")),
            dashboard: dashboard_dir.join(format!("DNS_Lookup_Summary_Dashboard_{timestamp}.html")),
            pdf: dashboard_dir.join(format!("DNS_Lookup_Report_{timestamp}.pdf")),
            log: logs_dir.join(format!("DNS_Script_Logs_{timestamp}.txt")),
            job_dir,
            images_dir,
            dashboard_dir,
            logs_dir,
        }
    }

    /// Creates the job directory and its subdirectories.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in [&self.images_dir, &self.dashboard_dir, &self.logs_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn chart(&self, taxonomy: Taxonomy) -> PathBuf {
        self.images_dir.join(taxonomy.chart_file())
    }
}

/// Everything the synthesizer reads from a completed job.
pub struct ReportInput<'a> {
    pub job_id: &'a str,
    pub records: &'a [DomainRecord],
    pub counters: &'a AggregateCounters,
    pub profile: &'a OwnershipProfile,
    pub log: &'a JobLog,
    pub generated_at: DateTime<Local>,
}

/// What was written, and what failed.
#[derive(Debug, Default)]
pub struct ReportArtifactSet {
    pub charts: Vec<PathBuf>,
    pub workbook: Option<PathBuf>,
    /// Data rows per sheet in the workbook.
    pub workbook_rows: usize,
    pub dashboard: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    pub pdf_pages: usize,
    pub log: PathBuf,
    pub failures: Vec<ReportError>,
}

impl ReportArtifactSet {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, log: &JobLog, error: ReportError) {
        log.error(error.to_string());
        self.failures.push(error);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render_charts(
    paths: &ArtifactPaths,
    input: &ReportInput<'_>,
    set: &mut ReportArtifactSet,
) -> Vec<RenderedChart> {
    let mut charts = Vec::new();
    for taxonomy in Taxonomy::iter() {
        let path = paths.chart(taxonomy);
        let buckets = input.counters.buckets(taxonomy, input.profile);
        let result =
            render_pie_chart(taxonomy.title(), &buckets).and_then(|img| save_png(img, &path));
        match result {
            Ok(png) => {
                set.charts.push(path.clone());
                charts.push(RenderedChart { taxonomy, path, png });
            }
            Err(e) => set.fail(
                input.log,
                ReportError::new(ArtifactKind::Chart, taxonomy.chart_file(), e),
            ),
        }
    }
    input.log.info(format!("{} of 5 charts saved to {}", charts.len(), paths.images_dir.display()));
    charts
}

/// Writes every artifact for a completed job.
pub fn synthesize(paths: &ArtifactPaths, input: &ReportInput<'_>) -> ReportArtifactSet {
    let mut set = ReportArtifactSet {
        log: input.log.path().to_path_buf(),
        ..ReportArtifactSet::default()
    };
    if let Err(e) = paths.create_dirs() {
        // Nothing below can be written without the directories
        for (kind, path) in [
            (ArtifactKind::Workbook, &paths.workbook),
            (ArtifactKind::Dashboard, &paths.dashboard),
            (ArtifactKind::Pdf, &paths.pdf),
        ] {
            set.fail(input.log, ReportError::new(kind, file_name(path), anyhow::anyhow!("{e:#}")));
        }
        return set;
    }

    let charts = render_charts(paths, input, &mut set);

    match write_workbook(&paths.workbook, input.records, &charts, input.profile) {
        Ok(rows) => {
            input.log.info(format!("Results written to {}", paths.workbook.display()));
            set.workbook = Some(paths.workbook.clone());
            set.workbook_rows = rows;
        }
        Err(e) => set.fail(
            input.log,
            ReportError::new(ArtifactKind::Workbook, file_name(&paths.workbook), e),
        ),
    }

    let dashboard = DashboardTemplate::new(
        input.job_id,
        input.counters,
        &charts,
        input.profile,
        input.generated_at,
    );
    match write_dashboard(&paths.dashboard, &dashboard) {
        Ok(()) => {
            input.log.info(format!("Dashboard written to {}", paths.dashboard.display()));
            set.dashboard = Some(paths.dashboard.clone());
        }
        Err(e) => set.fail(
            input.log,
            ReportError::new(ArtifactKind::Dashboard, file_name(&paths.dashboard), e),
        ),
    }

    match write_pdf(&paths.pdf, PDF_TITLE, &charts) {
        Ok(pages) => {
            input.log.info(format!("PDF report written to {}", paths.pdf.display()));
            set.pdf = Some(paths.pdf.clone());
            set.pdf_pages = pages;
        }
        Err(e) => set.fail(
            input.log,
            ReportError::new(ArtifactKind::Pdf, file_name(&paths.pdf), e),
        ),
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::LookupOutcome;
    use crate::error_handling::LookupStats;
    use crate::job::merge;
    use crate::whois::Registration;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_paths_layout() {
        let paths = ArtifactPaths::new(Path::new("/out"), "job_1", "20250304_1415");
        assert_eq!(paths.job_dir, PathBuf::from("/out/job_1"));
        assert_eq!(
            paths.workbook,
            PathBuf::from("/out/job_1/DNS_Lookup_Results_20250304_1415.xlsx")
        );
        assert_eq!(
            paths.dashboard,
            PathBuf::from("/out/job_1/Dashboard/DNS_Lookup_Summary_Dashboard_20250304_1415.html")
        );
        assert_eq!(
            paths.pdf,
            PathBuf::from("/out/job_1/Dashboard/DNS_Lookup_Report_20250304_1415.pdf")
        );
        assert_eq!(
            paths.log,
            PathBuf::from("/out/job_1/Logs/DNS_Script_Logs_20250304_1415.txt")
        );
        assert_eq!(
            paths.chart(Taxonomy::DmarcPolicy),
            PathBuf::from("/out/job_1/Images/dmarc_policy.png")
        );
    }

    #[test]
    fn test_synthesize_writes_everything() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "job_1", "20250304_1415");
        let log = JobLog::create(&paths.log).unwrap();
        let profile = OwnershipProfile::default();
        let records = vec![DomainRecord {
            name: "a.example".to_string(),
            dmarc: LookupOutcome::NotFound,
            spf: LookupOutcome::Found("v=spf1 -all".to_string()),
            mx: LookupOutcome::NotFound,
            registration: Registration::default(),
            whois_error: None,
        }];
        let (_, counters) = merge(&records, &profile, &LookupStats::new());

        let set = synthesize(
            &paths,
            &ReportInput {
                job_id: "job_1",
                records: &records,
                counters: &counters,
                profile: &profile,
                log: &log,
                generated_at: Local::now(),
            },
        );

        assert!(set.is_complete(), "failures: {:?}", set.failures);
        assert_eq!(set.charts.len(), 5);
        assert!(set.charts.iter().all(|p| p.exists()));
        assert_eq!(set.workbook.as_deref(), Some(paths.workbook.as_path()));
        assert_eq!(set.workbook_rows, 1);
        assert!(paths.dashboard.exists());
        assert!(paths.pdf.exists());
        assert_eq!(set.pdf_pages, 5);
        assert_eq!(set.log, paths.log);
    }

    #[test]
    fn test_synthesize_isolates_failures() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::new(dir.path(), "job_2", "20250304_1415");
        let log = JobLog::create(&paths.log).unwrap();
        // A directory where the workbook file should go makes that one save fail
        std::fs::create_dir_all(&paths.workbook).unwrap();
        let profile = OwnershipProfile::default();
        let counters = AggregateCounters::new();

        let set = synthesize(
            &paths,
            &ReportInput {
                job_id: "job_2",
                records: &[],
                counters: &counters,
                profile: &profile,
                log: &log,
                generated_at: Local::now(),
            },
        );

        assert_eq!(set.failures.len(), 1);
        assert_eq!(set.failures[0].kind, ArtifactKind::Workbook);
        assert!(set.workbook.is_none());
        assert!(set.dashboard.is_some());
        assert_eq!(set.pdf_pages, 5);

        let log_text = std::fs::read_to_string(&paths.log).unwrap();
        assert!(log_text.contains("ERROR - Failed to generate workbook"));
    }
}
