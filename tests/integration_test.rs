//! End-to-end job tests with in-memory DNS and WHOIS backends.

mod helpers;

use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook, Data, Reader, Xlsx};
use helpers::{test_config, write_input, FakeDns, FakeWhois};
use mail_posture::classify::{
    DmarcOwnershipLabel, DmarcPolicyLabel, MxLabel, SpfLabel, Taxonomy, WhoisLabel,
};
use mail_posture::error_handling::{FailureClass, LookupKind};
use mail_posture::run_job_with;
use tempfile::TempDir;

/// Data rows per sheet, read back from the saved workbook.
fn sheet_rows(path: &Path) -> Vec<(String, usize)> {
    let mut xlsx: Xlsx<_> = open_workbook(path).expect("workbook opens");
    xlsx.sheet_names()
        .into_iter()
        .map(|name| {
            let range = xlsx.worksheet_range(&name).expect("sheet reads");
            // The header row is not data; the Summary sheet holds only images
            (name, range.height().saturating_sub(1))
        })
        .collect()
}

/// a.example has nothing, b.example is fully owned, c.example fails WHOIS.
fn backends() -> (FakeDns, FakeWhois) {
    let dns = FakeDns::new()
        .txt(
            "_dmarc.b.example",
            "v=DMARC1; p=reject; rua=mailto:93881cb5@inbox.ondmarc.com",
        )
        .mx("b.example", "0 kenvue-com.mail.protection.outlook.com.");
    let whois = FakeWhois::new()
        .registered("a.example", &[])
        .registered("b.example", &["ns1.kenvuedns.com", "ns2.kenvuedns.com"]);
    (dns, whois)
}

#[tokio::test]
async fn test_three_domain_job() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(dir.path(), "Domain,Owner\na.example,x\nb.example,y\nc.example,z\n");
    let out = dir.path().join("results");
    let (dns, whois) = backends();

    let report = run_job_with(
        test_config(input, &out, 2),
        Arc::new(dns),
        Arc::new(whois),
    )
    .await
    .expect("job completes");

    assert_eq!(report.total_domains, 3);
    assert_eq!(report.job_dir, out.join("job_test"));

    let c = &report.counters;
    assert_eq!(c.spf.get(SpfLabel::NoRecord), 3);
    assert_eq!(c.mx.get(MxLabel::PrimaryProvider), 1);
    assert_eq!(c.mx.get(MxLabel::NoRecord), 2);
    assert_eq!(c.dmarc_policy.get(DmarcPolicyLabel::Reject), 1);
    assert_eq!(c.dmarc_policy.get(DmarcPolicyLabel::NoRecord), 2);
    assert_eq!(c.dmarc_ownership.get(DmarcOwnershipLabel::Migrated), 1);
    assert_eq!(c.dmarc_ownership.get(DmarcOwnershipLabel::NoRecord), 2);
    assert_eq!(c.whois.get(WhoisLabel::NoNameservers), 2);
    assert_eq!(c.whois.get(WhoisLabel::Owned), 1);
    for taxonomy in [Taxonomy::Spf, Taxonomy::Mx, Taxonomy::DmarcPolicy, Taxonomy::Whois] {
        assert_eq!(c.total(taxonomy), 3);
    }

    assert_eq!(
        report.lookup_stats.get(LookupKind::Whois, FailureClass::Transient),
        1
    );
    assert_eq!(
        report.lookup_stats.get(LookupKind::Spf, FailureClass::NotFound),
        3
    );

    let artifacts = &report.artifacts;
    assert!(artifacts.is_complete(), "failures: {:?}", artifacts.failures);
    assert_eq!(artifacts.charts.len(), 5);
    assert!(artifacts.charts.iter().all(|p| p.exists()));
    assert_eq!(artifacts.workbook_rows, 3);
    let workbook = artifacts.workbook.as_ref().expect("workbook written");
    assert_eq!(
        sheet_rows(workbook),
        vec![
            ("DMARC".to_string(), 3),
            ("SPF".to_string(), 3),
            ("MX".to_string(), 3),
            ("WHOIS".to_string(), 3),
            ("Summary".to_string(), 0),
        ]
    );
    let mut xlsx: Xlsx<_> = open_workbook(workbook).unwrap();
    let whois = xlsx.worksheet_range("WHOIS").unwrap();
    let cell = |row, col| whois.get((row, col)).map(|d: &Data| d.to_string());
    assert_eq!(cell(1, 0).as_deref(), Some("a.example"));
    assert_eq!(cell(2, 1).as_deref(), Some("ns1.kenvuedns.com\nns2.kenvuedns.com"));
    assert!(cell(3, 1).is_some_and(|ns| ns.starts_with("Error: ")));

    assert_eq!(artifacts.pdf_pages, 5);
    let pdf = artifacts.pdf.as_ref().expect("pdf written");
    let doc = lopdf::Document::load(pdf).expect("pdf reads back");
    assert_eq!(doc.get_pages().len(), 5);

    let dashboard = artifacts.dashboard.as_ref().expect("dashboard written");
    let html = std::fs::read_to_string(dashboard).unwrap();
    assert!(html.contains("covers <b>3</b> domains"));
    assert!(html.contains("WHOIS Summary Table"));

    let log = std::fs::read_to_string(&artifacts.log).unwrap();
    assert!(log.contains(" - INFO - Processing domain: a.example"));
    assert!(log.contains("No SPF record found for c.example"));
    assert!(log.contains(" - ERROR - "));
}

#[tokio::test]
async fn test_artifact_layout_on_disk() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "Domain\nb.example\n");
    let out = dir.path().join("results");
    let (dns, whois) = backends();

    let report = run_job_with(test_config(input, &out, 1), Arc::new(dns), Arc::new(whois))
        .await
        .unwrap();

    let job_dir = out.join("job_test");
    for sub in ["Images", "Dashboard", "Logs"] {
        assert!(job_dir.join(sub).is_dir(), "{sub} missing");
    }
    let workbook = report.artifacts.workbook.unwrap();
    let name = workbook.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("DNS_Lookup_Results_") && name.ends_with(".xlsx"));
    assert!(job_dir.join("Images").join("spf_chart.png").exists());
    assert!(report.artifacts.pdf.unwrap().starts_with(job_dir.join("Dashboard")));
}

#[tokio::test]
async fn test_empty_input_still_reports() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "Domain\n\n");
    let out = dir.path().join("results");

    let report = run_job_with(
        test_config(input, &out, 4),
        Arc::new(FakeDns::new()),
        Arc::new(FakeWhois::new()),
    )
    .await
    .unwrap();

    assert_eq!(report.total_domains, 0);
    assert_eq!(report.artifacts.workbook_rows, 0);
    let rows = sheet_rows(report.artifacts.workbook.as_ref().unwrap());
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|(_, n)| *n == 0));
    assert_eq!(report.artifacts.charts.len(), 5);
    assert_eq!(report.artifacts.pdf_pages, 5);
}
