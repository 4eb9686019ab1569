use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldValue – a single cell as read from a source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe would infer.
/// Loaders produce these; [`Record::from_fields`] turns them into typed rows.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Numeric view of the cell. `Null` is `None`; text that does not parse is an error.
    pub fn as_f64(&self) -> Result<Option<f64>> {
        match self {
            FieldValue::Float(v) if v.is_nan() => Ok(None),
            FieldValue::Float(v) => Ok(Some(*v)),
            FieldValue::Integer(i) => Ok(Some(*i as f64)),
            FieldValue::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            FieldValue::Null => Ok(None),
            FieldValue::String(s) if s.trim().is_empty() => Ok(None),
            FieldValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|v| (!v.is_nan()).then_some(v))
                .with_context(|| format!("'{s}' is not a number")),
        }
    }

    /// Integer view; floats with no fractional part (`2005.0`) are accepted.
    pub fn as_year(&self) -> Result<i32> {
        let v = self.as_f64()?.context("missing value")?;
        if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
            bail!("'{self}' is not a whole year");
        }
        Ok(v as i32)
    }

    /// Binary indicator: 0/1 numbers or true/false text in any case.
    pub fn as_flag(&self) -> Result<bool> {
        match self {
            FieldValue::Bool(b) => Ok(*b),
            FieldValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "1.0" => Ok(true),
                "false" | "0" | "0.0" => Ok(false),
                _ => bail!("'{s}' is not a 0/1 indicator"),
            },
            FieldValue::Null => bail!("missing value"),
            other => match other.as_f64()? {
                Some(v) if v == 0.0 => Ok(false),
                Some(v) if v == 1.0 => Ok(true),
                _ => bail!("'{other}' is not a 0/1 indicator"),
            },
        }
    }

    /// Text view; numbers are rendered back to text, `Null` becomes empty.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::String(s) => s,
            FieldValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "name",
    "primary_category",
    "country_code",
    "founded_year",
    "funding_total_usd",
    "startup_age_years",
    "failed",
    "status",
];

/// Required columns that hold free text. Their cells are never type-guessed.
pub const TEXT_COLUMNS: [&str; 4] = ["name", "primary_category", "country_code", "status"];

/// A single startup (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub primary_category: String,
    pub country_code: String,
    pub founded_year: i32,
    /// Total funding in USD; `None` when the cell was empty.
    pub funding_total_usd: Option<f64>,
    /// Years between founding and closure (or the snapshot date).
    pub startup_age_years: Option<f64>,
    pub failed: bool,
    /// operating / acquired / ipo / closed ...
    pub status: String,
}

impl Record {
    /// Build a typed record from a row of named cells.
    ///
    /// Extra columns are ignored. A missing column or an uninterpretable
    /// year / failure flag is an error; empty numeric cells become `None`.
    pub fn from_fields(mut fields: BTreeMap<String, FieldValue>) -> Result<Self> {
        let mut take = |col: &str| -> Result<FieldValue> {
            fields
                .remove(col)
                .with_context(|| format!("missing '{col}' column"))
        };

        let name = take("name")?.into_text();
        let primary_category = take("primary_category")?.into_text();
        let country_code = take("country_code")?.into_text();
        let founded_year = take("founded_year")?
            .as_year()
            .context("invalid 'founded_year'")?;
        let funding_total_usd = take("funding_total_usd")?
            .as_f64()
            .context("invalid 'funding_total_usd'")?;
        let startup_age_years = take("startup_age_years")?
            .as_f64()
            .context("invalid 'startup_age_years'")?;
        let failed = take("failed")?.as_flag().context("invalid 'failed'")?;
        let status = take("status")?.into_text();

        Ok(Record {
            name,
            primary_category,
            country_code,
            founded_year,
            funding_total_usd,
            startup_age_years,
            failed,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// RecordSet – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices for the filter widgets.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    year_bounds: Option<(i32, i32)>,
    industries: BTreeSet<String>,
    countries: BTreeSet<String>,
    statuses: BTreeSet<String>,
}

impl RecordSet {
    /// Build the indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut year_bounds: Option<(i32, i32)> = None;
        let mut industries = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut statuses = BTreeSet::new();

        for r in &records {
            year_bounds = Some(match year_bounds {
                None => (r.founded_year, r.founded_year),
                Some((lo, hi)) => (lo.min(r.founded_year), hi.max(r.founded_year)),
            });
            industries.insert(r.primary_category.clone());
            countries.insert(r.country_code.clone());
            statuses.insert(r.status.clone());
        }

        RecordSet {
            records,
            year_bounds,
            industries,
            countries,
            statuses,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Observed `(min, max)` founding year, `None` for an empty dataset.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.year_bounds
    }

    /// Sorted unique industries.
    pub fn industries(&self) -> &BTreeSet<String> {
        &self.industries
    }

    /// Sorted unique country codes.
    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn statuses(&self) -> &BTreeSet<String> {
        &self.statuses
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
