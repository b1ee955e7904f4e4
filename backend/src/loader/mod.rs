//! Bulk loader behind `backend import <file>`.
//!
//! Reads a JSON array (or a CSV file with a header row) of raw participant
//! rows, normalizes them into `EnrollmentRecord`s and writes them to the store
//! in transactions of at most `MAX_BATCH` inserts. Incomplete rows are skipped
//! with one warning each.

use crate::store::{SqliteStore, StoreError};
use common::model::record::{normalize_mobile, EnrollmentRecord, Score, ABSENT_LABEL};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use uuid::Uuid;

/// Largest number of inserts committed in one transaction.
pub const MAX_BATCH: usize = 499;

/// Service stored when a row names none.
pub const UNSPECIFIED_SERVICE: &str = "غير محدد";

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("input is not a JSON array of records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV input is unreadable: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub batches: usize,
}

/// One input row before normalization. Fields keep their JSON type so numeric
/// codes and mobile numbers are accepted as-is.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default, alias = "mobile_number")]
    pub mobile_number: Option<Value>,
    #[serde(default)]
    pub service: Option<Value>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub attendance: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    code: Option<String>,
    name: Option<String>,
    #[serde(alias = "mobile_number")]
    mobile_number: Option<String>,
    service: Option<String>,
    score: Option<String>,
    attendance: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        RawRecord {
            code: row.code.map(Value::String),
            name: row.name.map(Value::String),
            mobile_number: row.mobile_number.map(Value::String),
            service: row.service.map(Value::String),
            score: row.score.map(Value::String),
            attendance: row.attendance.map(Value::String),
        }
    }
}

/// Reads `path` as CSV when its extension says so, otherwise as a JSON array.
pub fn read_file(path: &Path) -> Result<Vec<RawRecord>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        read_csv(file)
    } else {
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<RawRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut rows = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        rows.push(row?.into());
    }
    Ok(rows)
}

/// Non-empty trimmed text of a string or number value. A numeric zero counts
/// as missing.
fn text(value: &Option<Value>) -> Option<String> {
    let text = match value.as_ref()? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn number(value: &Option<Value>) -> Option<f64> {
    match value.as_ref()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `Err` carries the reason the row is skipped.
pub fn normalize(raw: &RawRecord) -> Result<EnrollmentRecord, String> {
    let (code, name, mobile) = match (text(&raw.code), text(&raw.name), text(&raw.mobile_number)) {
        (Some(c), Some(n), Some(m)) => (c, n, m),
        _ => return Err("missing code, name, or mobile number".to_string()),
    };

    let score = match &raw.score {
        Some(Value::String(s)) if s.trim() == ABSENT_LABEL => Score::Absent,
        other => {
            let points = number(other).filter(|n| n.is_finite()).unwrap_or(0.0);
            Score::from_number(points).ok_or_else(|| format!("score {} out of range", points))?
        }
    };

    let fraction = number(&raw.attendance).filter(|n| n.is_finite()).unwrap_or(0.0);
    let percent = (fraction * 100.0).round();
    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("attendance {} out of range", fraction));
    }

    Ok(EnrollmentRecord {
        id: Uuid::new_v4().to_string(),
        code,
        name,
        mobile_number: normalize_mobile(mobile.as_str()),
        service: text(&raw.service).unwrap_or_else(|| UNSPECIFIED_SERVICE.to_string()),
        score,
        attendance: percent as u8,
    })
}

/// Normalizes `rows` and hands them to `write_batch` in chunks of at most
/// `MAX_BATCH`. Each call is expected to commit one transaction.
pub fn import_rows<F>(rows: &[RawRecord], mut write_batch: F) -> Result<ImportReport, ImportError>
where
    F: FnMut(&[EnrollmentRecord]) -> Result<usize, StoreError>,
{
    let mut report = ImportReport::default();
    let mut pending = Vec::with_capacity(MAX_BATCH.min(rows.len()));

    for (index, raw) in rows.iter().enumerate() {
        match normalize(raw) {
            Ok(record) => pending.push(record),
            Err(reason) => {
                warn!("Skipping record at index {}: {}", index, reason);
                report.skipped += 1;
                continue;
            }
        }
        if pending.len() == MAX_BATCH {
            info!("Committing batch of {} records...", pending.len());
            report.imported += write_batch(&pending)?;
            report.batches += 1;
            pending.clear();
        }
    }
    if !pending.is_empty() {
        info!("Committing the final batch of {} records...", pending.len());
        report.imported += write_batch(&pending)?;
        report.batches += 1;
    }
    Ok(report)
}

/// Full import of `path` into the database at `db_path`.
pub fn run(path: &Path, db_path: &Path) -> Result<ImportReport, ImportError> {
    info!("Starting import from {} into {}", path.display(), db_path.display());
    let rows = read_file(path)?;
    info!("Found {} records to import", rows.len());
    let store = SqliteStore::open(db_path)?;
    let report = import_rows(&rows, |batch| store.insert_batch(batch))?;
    info!(
        "Import completed: {} imported, {} skipped",
        report.imported, report.skipped
    );
    Ok(report)
}
