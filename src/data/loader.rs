use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{FieldValue, REQUIRED_COLUMNS, Record, RecordSet, TEXT_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a startup dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one startup per line (recommended)
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
/// * `.json`    – `[{ "name": ..., "founded_year": ..., ... }, ...]`
///
/// Any failure is reported as [`DataError::DataUnavailable`] carrying the
/// full context chain.
pub fn load_file(path: &Path) -> Result<RecordSet, DataError> {
    match load_any(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} startups from {} (founded {:?})",
                dataset.len(),
                path.display(),
                dataset.year_bounds()
            );
            Ok(dataset)
        }
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            Err(DataError::DataUnavailable {
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            })
        }
    }
}

fn load_any(path: &Path) -> Result<RecordSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    Ok(RecordSet::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, at least [`REQUIRED_COLUMNS`].
/// Other columns are ignored. Text columns are kept verbatim; the numeric
/// and flag cells have their type guessed per value.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for col in REQUIRED_COLUMNS {
        let idx = headers
            .iter()
            .position(|h| h == col)
            .with_context(|| format!("CSV missing '{col}' column"))?;
        columns.push((col, idx));
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let fields: BTreeMap<String, FieldValue> = columns
            .iter()
            .map(|&(col, idx)| {
                let raw = row.get(idx).unwrap_or("");
                let value = if TEXT_COLUMNS.contains(&col) {
                    FieldValue::String(raw.to_string())
                } else {
                    guess_field_type(raw)
                };
                (col.to_string(), value)
            })
            .collect();

        let record = Record::from_fields(fields).with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(records)
}

fn guess_field_type(s: &str) -> FieldValue {
    let s = s.trim();
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    // `parse::<f64>` also accepts words like "inf" and "NaN"; only digits count as numbers.
    if s.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = s.parse::<f64>() {
            return FieldValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "name": "Acme",
///     "primary_category": "software",
///     "country_code": "USA",
///     "founded_year": 2007,
///     "funding_total_usd": 1500000.0,
///     "startup_age_years": 6.5,
///     "failed": 0,
///     "status": "operating"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let fields: BTreeMap<String, FieldValue> = REQUIRED_COLUMNS
            .iter()
            .filter_map(|&col| obj.get(col).map(|v| (col.to_string(), json_to_field(v))))
            .collect();

        let record = Record::from_fields(fields).with_context(|| format!("JSON row {i}"))?;
        records.push(record);
    }

    Ok(records)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing startup records.
///
/// Every name in [`REQUIRED_COLUMNS`] must be a top-level column. Strings,
/// integers, floats and booleans are read natively; dictionary-encoded
/// (categorical) and other numeric columns are cast first.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: Vec<(&str, ArrayRef)> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for col in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(col)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{col}' column"))?;
            let array = normalize_column(batch.column(idx))
                .with_context(|| format!("column '{col}'"))?;
            columns.push((col, array));
        }

        for row in 0..batch.num_rows() {
            let fields: BTreeMap<String, FieldValue> = columns
                .iter()
                .map(|(col, array)| (col.to_string(), extract_field_value(array, row)))
                .collect();

            let record = Record::from_fields(fields)
                .with_context(|| format!("Parquet row {}", records.len()))?;
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Cast columns the extractor does not read natively into one it does.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => return Ok(col.clone()),
        DataType::Dictionary(_, _) | DataType::Utf8View => DataType::Utf8,
        t if t.is_numeric() => DataType::Float64,
        other => bail!("unsupported column type {other:?}"),
    };
    arrow::compute::cast(col, &target).context("casting column")
}

/// Extract a single cell from a normalized Arrow column at a given row.
fn extract_field_value(col: &ArrayRef, row: usize) -> FieldValue {
    if col.is_null(row) {
        return FieldValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => FieldValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => FieldValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => FieldValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => FieldValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            FieldValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => FieldValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => FieldValue::Bool(col.as_boolean().value(row)),
        other => FieldValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_field_type_keeps_words_as_text() {
        assert_eq!(guess_field_type(""), FieldValue::Null);
        assert_eq!(guess_field_type("2005"), FieldValue::Integer(2005));
        assert_eq!(guess_field_type("2005.0"), FieldValue::Float(2005.0));
        assert_eq!(guess_field_type("true"), FieldValue::Bool(true));
        assert_eq!(
            guess_field_type("Infinity Labs"),
            FieldValue::String("Infinity Labs".into())
        );
        assert_eq!(guess_field_type("NaN"), FieldValue::String("NaN".into()));
    }

    #[test]
    fn unsupported_extension_is_data_unavailable() {
        let err = load_file(Path::new("startups.xlsx")).unwrap_err();
        match err {
            DataError::DataUnavailable { reason, .. } => {
                assert!(reason.contains("Unsupported file extension"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
