//! Color-coded XLSX export.
//!
//! Sheets `DMARC`, `SPF`, `MX` and `WHOIS` hold one row per domain in input
//! order; `Summary` holds the chart images.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet, XlsxError,
};

use crate::classify::{dmarc_fill, presence_fill, whois_fill, RowFill, Taxonomy};
use crate::config::OwnershipProfile;
use crate::job::{format_date, DomainRecord};

use super::RenderedChart;

const HEADER_COLOR: u32 = 0xFFA500;

pub const DMARC_HEADERS: [&str; 4] = [
    "Domain",
    "Primary_Domain_Policy",
    "Secondary_Domain_Policy",
    "DMARC_Record",
];
pub const SPF_HEADERS: [&str; 2] = ["Domain", "SPF_Record"];
pub const MX_HEADERS: [&str; 2] = ["Domain", "MX_Record"];
pub const WHOIS_HEADERS: [&str; 6] = [
    "Domain",
    "NameServers",
    "Registrar",
    "RegisteredOn",
    "ExpiresOn",
    "UpdatedOn",
];

/// Cell positions of the charts on the Summary sheet, as (row, col).
const SUMMARY_ANCHORS: [(Taxonomy, u32, u16); 5] = [
    (Taxonomy::Spf, 0, 0),            // A1
    (Taxonomy::Mx, 0, 9),             // J1
    (Taxonomy::DmarcOwnership, 24, 0), // A25
    (Taxonomy::DmarcPolicy, 24, 9),   // J25
    (Taxonomy::Whois, 48, 0),         // A49
];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_COLOR))
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter)
}

fn row_format(fill: RowFill) -> Format {
    let format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
        .set_align(FormatAlign::VerticalCenter);
    match fill.rgb() {
        Some(rgb) => format.set_background_color(Color::RGB(rgb)),
        None => format,
    }
}

/// Writes a header row, the data rows and the autofilter, then sizes columns.
fn fill_sheet(
    sheet: &mut Worksheet,
    name: &str,
    headers: &[&str],
    rows: &[(Vec<String>, RowFill)],
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    let header = header_format();
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, (cells, fill)) in rows.iter().enumerate() {
        let format = row_format(*fill);
        let row = i as u32 + 1;
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, value, &format)?;
        }
    }
    sheet.autofilter(0, 0, rows.len() as u32, headers.len() as u16 - 1)?;
    sheet.autofit();
    Ok(())
}

fn dmarc_rows(records: &[DomainRecord], profile: &OwnershipProfile) -> Vec<(Vec<String>, RowFill)> {
    records
        .iter()
        .map(|r| {
            (
                vec![
                    r.name.clone(),
                    r.dmarc_primary_policy(),
                    r.dmarc_secondary_policy(),
                    r.dmarc_text(),
                ],
                dmarc_fill(r.dmarc_record(), profile),
            )
        })
        .collect()
}

fn spf_rows(records: &[DomainRecord]) -> Vec<(Vec<String>, RowFill)> {
    records
        .iter()
        .map(|r| (vec![r.name.clone(), r.spf_text()], presence_fill(r.spf.is_found())))
        .collect()
}

fn mx_rows(records: &[DomainRecord]) -> Vec<(Vec<String>, RowFill)> {
    records
        .iter()
        .map(|r| (vec![r.name.clone(), r.mx_text()], presence_fill(r.mx.is_found())))
        .collect()
}

fn whois_rows(records: &[DomainRecord], profile: &OwnershipProfile) -> Vec<(Vec<String>, RowFill)> {
    records
        .iter()
        .map(|r| match &r.whois_error {
            Some(failure) => (
                vec![
                    r.name.clone(),
                    format!("Error: {}", failure.cause),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ],
                RowFill::Red,
            ),
            None => (
                vec![
                    r.name.clone(),
                    r.nameservers().join("\n"),
                    r.registrar().unwrap_or_default().to_string(),
                    format_date(r.created_on()),
                    format_date(r.expires_on()),
                    format_date(r.updated_on()),
                ],
                whois_fill(r.nameservers(), profile),
            ),
        })
        .collect()
}

/// Builds the workbook and saves it to `path`. Returns the number of data
/// rows written to each taxonomy sheet.
///
/// Charts missing from `charts` are left off the Summary sheet.
pub fn write_workbook(
    path: &Path,
    records: &[DomainRecord],
    charts: &[RenderedChart],
    profile: &OwnershipProfile,
) -> Result<usize> {
    let mut workbook = Workbook::new();

    let sheets: [(&str, &[&str], Vec<(Vec<String>, RowFill)>); 4] = [
        ("DMARC", &DMARC_HEADERS, dmarc_rows(records, profile)),
        ("SPF", &SPF_HEADERS, spf_rows(records)),
        ("MX", &MX_HEADERS, mx_rows(records)),
        ("WHOIS", &WHOIS_HEADERS, whois_rows(records, profile)),
    ];
    let rows_per_sheet = sheets[0].2.len();
    if let Some((name, _, rows)) = sheets.iter().find(|(_, _, r)| r.len() != rows_per_sheet) {
        return Err(anyhow!(
            "Sheet {name} has {} rows, expected {rows_per_sheet}",
            rows.len()
        ));
    }
    for (name, headers, rows) in &sheets {
        let mut sheet = Worksheet::new();
        fill_sheet(&mut sheet, name, headers, rows)
            .with_context(|| format!("Failed to fill sheet {name}"))?;
        workbook.push_worksheet(sheet);
    }

    let mut summary = Worksheet::new();
    summary.set_name("Summary")?;
    for (taxonomy, row, col) in SUMMARY_ANCHORS {
        let Some(chart) = charts.iter().find(|c| c.taxonomy == taxonomy) else {
            log::warn!("Summary sheet: no {} chart to embed", taxonomy.title());
            continue;
        };
        let image = Image::new_from_buffer(&chart.png)
            .with_context(|| format!("Failed to load chart {}", chart.path.display()))?;
        summary.insert_image(row, col, &image)?;
    }
    workbook.push_worksheet(summary);

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;
    log::info!("Workbook saved to {}", path.display());
    Ok(rows_per_sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::LookupOutcome;
    use crate::error_handling::FailureClass;
    use crate::job::WhoisFailure;
    use crate::whois::Registration;
    use calamine::{open_workbook, Data, Reader, Xlsx};

    fn record(name: &str) -> DomainRecord {
        DomainRecord {
            name: name.to_string(),
            dmarc: LookupOutcome::Found("v=DMARC1; p=reject; sp=reject".to_string()),
            spf: LookupOutcome::NotFound,
            mx: LookupOutcome::Found("10 mx.example.com.".to_string()),
            registration: Registration {
                nameservers: vec!["ns1.kenvuedns.com".to_string(), "ns2.kenvuedns.com".to_string()],
                registrar: Some("Example Registrar".to_string()),
                ..Registration::default()
            },
            whois_error: None,
        }
    }

    #[test]
    fn test_rows_follow_records() {
        let profile = OwnershipProfile::default();
        let mut failed = record("b.example");
        failed.whois_error = Some(WhoisFailure {
            class: FailureClass::Transient,
            cause: "WHOIS lookup timed out after 15s".to_string(),
        });
        failed.registration = Registration::default();
        let records = vec![record("a.example"), failed];

        let dmarc = dmarc_rows(&records, &profile);
        assert_eq!(dmarc.len(), 2);
        assert_eq!(
            dmarc[0].0,
            vec!["a.example", "reject", "reject", "v=DMARC1; p=reject; sp=reject"]
        );
        assert_eq!(dmarc[0].1, RowFill::Blue);

        let spf = spf_rows(&records);
        assert_eq!(spf[0].0[1], "No SPF record found");
        assert_eq!(spf[0].1, RowFill::Red);
        assert_eq!(mx_rows(&records)[0].1, RowFill::Green);

        let whois = whois_rows(&records, &profile);
        assert_eq!(whois[0].0[1], "ns1.kenvuedns.com\nns2.kenvuedns.com");
        assert_eq!(whois[0].1, RowFill::Green);
        assert_eq!(whois[1].0[1], "Error: WHOIS lookup timed out after 15s");
        assert!(whois[1].0[2..].iter().all(String::is_empty));
        assert_eq!(whois[1].1, RowFill::Red);
    }

    #[test]
    fn test_write_workbook_without_charts() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("results.xlsx");
        let records = [record("a.example"), record("b.example")];
        let rows = write_workbook(&path, &records, &[], &OwnershipProfile::default())
            .expect("workbook written");
        assert_eq!(rows, 2);

        let mut xlsx: Xlsx<_> = open_workbook(&path).expect("workbook reads back");
        assert_eq!(xlsx.sheet_names(), vec!["DMARC", "SPF", "MX", "WHOIS", "Summary"]);
        for (name, width) in [("DMARC", 4), ("SPF", 2), ("MX", 2), ("WHOIS", 6)] {
            let range = xlsx.worksheet_range(name).expect("sheet exists");
            // Header plus one row per record
            assert_eq!(range.get_size(), (3, width), "sheet {name}");
        }
        let whois = xlsx.worksheet_range("WHOIS").unwrap();
        assert_eq!(
            whois.get((1, 0)),
            Some(&Data::String("a.example".to_string()))
        );
    }

    #[test]
    fn test_summary_anchors_match_cells() {
        let cells: Vec<_> = SUMMARY_ANCHORS.iter().map(|(_, r, c)| (*r, *c)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 9), (24, 0), (24, 9), (48, 0)]);
    }
}
