//! Sales history ingestion.
//!
//! Reads a delimited file of raw sales events and aggregates it into one row
//! per `(item, store, date)`:
//!
//! - required columns: `item, store, date, sales` (extra columns are ignored)
//! - `date` must parse as `%Y-%m-%d`
//! - `sales` values that fail numeric coercion become missing (NaN), not an
//!   error; downstream stages decide the fill policy
//! - duplicate `(item, store, date)` keys are reduced by the mean of their
//!   non-missing observations
//! - output is sorted chronologically (ties broken by item, then store) so a
//!   load is fully deterministic
//!
//! Category names are normalized (trimmed, uppercased) at load time so that
//! filtering and vocabulary lookups agree on the same spelling.
//!
//! The loaded table is never mutated in place; re-aggregation produces a new
//! `Vec<SalesRecord>`.

use crate::error::{ForecastError, Result};
use crate::labels::normalize;
use ahash::AHashMap;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns a source file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["item", "store", "date", "sales"];

/// One aggregated sales observation: unique per `(item, store, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Product category, normalized (trimmed, uppercase)
    pub item: String,

    /// Store identifier, trimmed
    pub store: String,

    /// Observation date
    pub date: NaiveDate,

    /// Mean daily sales for the key; NaN when every raw observation for the
    /// key was missing
    pub sales: f64,
}

/// Load and aggregate a sales history file.
///
/// # Errors
///
/// - [`ForecastError::DataUnavailable`] when the file cannot be opened
/// - [`ForecastError::SchemaError`] when required columns are absent
/// - [`ForecastError::Generic`] on malformed rows (unparseable dates)
pub fn read_sales<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ForecastError::DataUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    read_sales_from_reader(file)
}

/// Load and aggregate a sales history from any reader.
///
/// Useful for tests and for serving layers that receive CSV request bodies
/// rather than file paths.
pub fn read_sales_from_reader<R: Read>(reader: R) -> Result<Vec<SalesRecord>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    // (sum of non-missing observations, non-missing count)
    let mut groups: AHashMap<(String, String, NaiveDate), (f64, usize)> = AHashMap::new();

    for (row_idx, record) in csv_reader.records().enumerate() {
        let record = record?;

        let item = normalize(field(&record, columns.item));
        let store = field(&record, columns.store).trim().to_string();
        let date_raw = field(&record, columns.date);
        let date = NaiveDate::parse_from_str(date_raw.trim(), "%Y-%m-%d").map_err(|e| {
            ForecastError::generic(format!(
                "row {}: unparseable date '{}': {}",
                row_idx + 1,
                date_raw,
                e
            ))
        })?;

        // Lenient numeric coercion: anything that isn't a number is missing.
        let sales = field(&record, columns.sales).trim().parse::<f64>().ok();

        let entry = groups.entry((item, store, date)).or_insert((0.0, 0));
        if let Some(value) = sales {
            if value.is_finite() {
                entry.0 += value;
                entry.1 += 1;
            }
        }
    }

    let mut records: Vec<SalesRecord> = groups
        .into_iter()
        .map(|((item, store, date), (sum, count))| SalesRecord {
            item,
            store,
            date,
            sales: if count > 0 { sum / count as f64 } else { f64::NAN },
        })
        .collect();

    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.item.cmp(&b.item))
            .then_with(|| a.store.cmp(&b.store))
    });

    Ok(records)
}

struct ColumnIndices {
    item: usize,
    store: usize,
    date: usize,
    sales: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndices> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let indices = [
        find(REQUIRED_COLUMNS[0]),
        find(REQUIRED_COLUMNS[1]),
        find(REQUIRED_COLUMNS[2]),
        find(REQUIRED_COLUMNS[3]),
    ];

    match indices {
        [Some(item), Some(store), Some(date), Some(sales)] => Ok(ColumnIndices {
            item,
            store,
            date,
            sales,
        }),
        _ => Err(ForecastError::SchemaError {
            missing: REQUIRED_COLUMNS
                .iter()
                .zip(indices.iter())
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect(),
        }),
    }
}

#[inline]
fn field<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}
