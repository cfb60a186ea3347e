//! Standalone HTML dashboard.
//!
//! Charts are embedded as base64 data URIs so the file can be moved or mailed
//! on its own.

use std::path::Path;

use anyhow::{Context, Result};
use askama::Template;
use base64::Engine as _;
use chrono::{DateTime, Local};
use strum::IntoEnumIterator;

use crate::classify::{AggregateCounters, Bucket, Taxonomy};
use crate::config::OwnershipProfile;

use super::insights::key_insights;
use super::RenderedChart;

/// Display format of the generation time, e.g. `March 04, 2025 at 02:15 PM +01:00`.
const HUMAN_TIMESTAMP_FORMAT: &str = "%B %d, %Y at %I:%M %p %:z";

/// One table and chart per taxonomy.
pub struct DashboardSection {
    pub title: &'static str,
    pub chart_file: &'static str,
    pub buckets: Vec<Bucket>,
    pub chart_data_uri: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub job_id: String,
    pub owner_name: String,
    pub domain_count: usize,
    pub generated_on: String,
    pub insights: Vec<String>,
    pub sections: Vec<DashboardSection>,
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

impl DashboardTemplate {
    pub fn new(
        job_id: &str,
        counters: &AggregateCounters,
        charts: &[RenderedChart],
        profile: &OwnershipProfile,
        generated_at: DateTime<Local>,
    ) -> Self {
        let sections = Taxonomy::iter()
            .map(|taxonomy| DashboardSection {
                title: taxonomy.title(),
                chart_file: taxonomy.chart_file(),
                buckets: counters.buckets(taxonomy, profile),
                chart_data_uri: charts
                    .iter()
                    .find(|c| c.taxonomy == taxonomy)
                    .map(|c| png_data_uri(&c.png)),
            })
            .collect();

        Self {
            job_id: job_id.to_string(),
            owner_name: profile.owner_name.clone(),
            domain_count: counters.domains,
            generated_on: generated_at.format(HUMAN_TIMESTAMP_FORMAT).to_string(),
            insights: key_insights(counters, profile),
            sections,
        }
    }
}

/// Renders the dashboard and writes it to `path`.
pub fn write_dashboard(path: &Path, dashboard: &DashboardTemplate) -> Result<()> {
    let html = dashboard
        .render()
        .context("Failed to render dashboard template")?;
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write dashboard {}", path.display()))?;
    log::info!("Dashboard saved to {}", path.display());
    Ok(())
}
