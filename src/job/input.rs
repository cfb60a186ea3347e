//! Domain list input.

use std::path::Path;

use crate::config::DOMAIN_COLUMN;
use crate::error_handling::InputError;

/// Reads the `Domain` column of a CSV file.
///
/// The header must contain a column named exactly `Domain` (surrounding
/// whitespace ignored). Values are trimmed; empty values are skipped. Input
/// order is preserved and duplicates are kept.
///
/// # Errors
///
/// Any problem with the file is fatal to the job: an unreadable file, a
/// missing `Domain` column, or a row the CSV reader cannot decode.
pub fn read_domains(path: &Path) -> Result<Vec<String>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let Some(column) = headers.iter().position(|h| h.trim() == DOMAIN_COLUMN) else {
        return Err(InputError::MissingColumn {
            path: path.to_path_buf(),
            column: DOMAIN_COLUMN,
            found: headers.iter().collect::<Vec<_>>().join(", "),
        });
    };

    let mut domains = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|source| InputError::MalformedRow {
            path: path.to_path_buf(),
            // Header is line 1
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(i as u64 + 2),
            source,
        })?;
        match row.get(column).map(str::trim) {
            Some(domain) if !domain.is_empty() => domains.push(domain.to_string()),
            _ => log::debug!("Skipping row {} without a domain", i + 2),
        }
    }

    log::info!("Read {} domains from {}", domains.len(), path.display());
    Ok(domains)
}
