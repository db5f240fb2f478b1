// src/ingest/mod.rs
use csv::StringRecord;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{LimitsError, Result};

pub mod delimited;
pub mod xlsx;

/// Positional schema width. Columns are mapped by order, never by label.
pub const COLUMN_COUNT: usize = 9;

/// Rows above the data: the structural header, then the row holding the real labels.
pub const HEADER_ROWS: usize = 2;

/// One data row, re-keyed onto the fixed nine-column schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub fips_state: String,
    pub fips_county: String,
    pub county: String,
    pub state: String,
    pub cbsa: String,
    pub one_unit: String,
    pub two_unit: String,
    pub three_unit: String,
    pub four_unit: String,
}

/// A loaded sheet: the label row as written in the file, plus every data row.
#[derive(Debug)]
pub struct RawSheet {
    pub labels: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Load the first worksheet of `path` (`.xlsx` or `.csv`, chosen by extension).
///
/// Both header rows are discarded; every remaining row must be exactly
/// [`COLUMN_COUNT`] cells wide.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<RawSheet> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let rows = match ext.as_str() {
        "xlsx" => xlsx::read_rows(path)?,
        "csv" => delimited::read_rows(path)?,
        _ => return Err(LimitsError::UnsupportedInput(path.display().to_string())),
    };

    let sheet = records_from_rows(rows)?;
    info!(rows = sheet.records.len(), "loaded sheet");
    Ok(sheet)
}

/// Drop the header rows and deserialize the rest onto [`RawRecord`].
pub fn records_from_rows(rows: Vec<StringRecord>) -> Result<RawSheet> {
    let mut rows = rows.into_iter().skip(HEADER_ROWS - 1);
    let labels = rows.next().ok_or(LimitsError::ColumnCount {
        expected: COLUMN_COUNT,
        found: 0,
    })?;
    check_width(&labels)?;
    let labels: Vec<String> = labels.iter().map(|s| s.trim().to_string()).collect();
    debug!(?labels, "column labels");

    let mut records = Vec::new();
    for row in rows {
        check_width(&row)?;
        let record: RawRecord = row.deserialize(None)?;
        records.push(record);
    }

    Ok(RawSheet { labels, records })
}

fn check_width(row: &StringRecord) -> Result<()> {
    if row.len() != COLUMN_COUNT {
        return Err(LimitsError::ColumnCount {
            expected: COLUMN_COUNT,
            found: row.len(),
        });
    }
    Ok(())
}
