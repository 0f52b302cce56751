//! Tab-separated onboarding records.

use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::{CliError, CliResult};

/// Column holding the user email (0-indexed).
pub const EMAIL_COLUMN: usize = 6;
/// Column holding the activation marker (0-indexed).
pub const ACTIVATION_COLUMN: usize = 8;
/// Column holding the department code (0-indexed).
pub const DEPARTMENT_COLUMN: usize = 9;

const MIN_COLUMNS: usize = DEPARTMENT_COLUMN + 1;

/// One data row of the onboarding file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRecord {
    /// Line number in the file (1-based, header is line 1)
    pub line: usize,
    pub email: String,
    pub activation: String,
    pub department: String,
}

impl ProvisioningRecord {
    /// True when the activation field contains "activate" in any case.
    pub fn is_activation(&self) -> bool {
        self.activation.to_lowercase().contains("activate")
    }
}

/// A parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRow {
    Record(ProvisioningRecord),
    /// Row that cannot be read: too few columns or undecodable text.
    Malformed { line: usize, reason: String },
}

impl ParsedRow {
    pub fn line(&self) -> usize {
        match self {
            ParsedRow::Record(record) => record.line,
            ParsedRow::Malformed { line, .. } => *line,
        }
    }
}

/// Parses onboarding rows, skipping the header line.
pub fn read_records<R: Read>(reader: R) -> CliResult<Vec<ParsedRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.byte_records().enumerate() {
        let raw = result?;
        let line = raw
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        if raw.iter().all(|field| field.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        if raw.len() < MIN_COLUMNS {
            warn!(line, columns = raw.len(), "Skipping row with too few columns");
            rows.push(ParsedRow::Malformed {
                line,
                reason: format!("only {} columns", raw.len()),
            });
            continue;
        }

        let record = match csv::StringRecord::from_byte_record(raw) {
            Ok(record) => record,
            Err(e) => {
                let column = e.utf8_error().field();
                warn!(line, column, "Skipping row with invalid UTF-8");
                rows.push(ParsedRow::Malformed {
                    line,
                    reason: format!("invalid UTF-8 in column {column}"),
                });
                continue;
            }
        };

        rows.push(ParsedRow::Record(ProvisioningRecord {
            line,
            email: record[EMAIL_COLUMN].trim().to_string(),
            activation: record[ACTIVATION_COLUMN].trim().to_string(),
            department: record[DEPARTMENT_COLUMN].trim().to_string(),
        }));
    }

    Ok(rows)
}

/// Reads the onboarding file. A zero-byte file yields no rows.
pub fn read_records_from_path(path: &Path) -> CliResult<Vec<ParsedRow>> {
    let content = std::fs::read(path)
        .map_err(|e| CliError::InputFile(format!("Failed to read {}: {}", path.display(), e)))?;

    if content.is_empty() {
        return Ok(Vec::new());
    }

    read_records(content.as_slice())
}
