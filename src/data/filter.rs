use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::model::{Record, RecordSet};

/// First year of the initial range when the dataset reaches back further.
pub const DEFAULT_START_YEAR: i32 = 2000;

// ---------------------------------------------------------------------------
// Filter selection: year range plus industry / country sets
// ---------------------------------------------------------------------------

/// The active filter constraints.
///
/// An empty `industries` or `countries` set means "no restriction" for that
/// dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub year_min: i32,
    pub year_max: i32,
    pub industries: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

impl FilterSelection {
    /// Selection over an explicit year range with no category restriction.
    pub fn years(year_min: i32, year_max: i32) -> Self {
        FilterSelection {
            year_min,
            year_max,
            industries: BTreeSet::new(),
            countries: BTreeSet::new(),
        }
    }

    /// Initial selection for a freshly loaded dataset: from 2000 (or the
    /// first observed year, if later) to the last observed year.
    pub fn for_dataset(dataset: &RecordSet) -> Self {
        match dataset.year_bounds() {
            Some((lo, hi)) => {
                let start = if hi >= DEFAULT_START_YEAR {
                    lo.max(DEFAULT_START_YEAR)
                } else {
                    lo
                };
                Self::years(start, hi)
            }
            None => Self::years(DEFAULT_START_YEAR, DEFAULT_START_YEAR),
        }
    }

    /// Reject inverted year bounds.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.year_min > self.year_max {
            return Err(DataError::InvalidSelection {
                year_min: self.year_min,
                year_max: self.year_max,
            });
        }
        Ok(())
    }

    /// Normalize user input: swap inverted bounds, then clamp both into the
    /// dataset's observed year range.
    pub fn clamped(mut self, dataset: &RecordSet) -> Self {
        if self.year_min > self.year_max {
            std::mem::swap(&mut self.year_min, &mut self.year_max);
        }
        if let Some((lo, hi)) = dataset.year_bounds() {
            self.year_min = self.year_min.clamp(lo, hi);
            self.year_max = self.year_max.clamp(lo, hi);
        }
        self
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        (self.year_min..=self.year_max).contains(&record.founded_year)
            && (self.industries.is_empty() || self.industries.contains(&record.primary_category))
            && (self.countries.is_empty() || self.countries.contains(&record.country_code))
    }

    /// Whether any restriction beyond the year range is active.
    pub fn has_category_filters(&self) -> bool {
        !self.industries.is_empty() || !self.countries.is_empty()
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::years(DEFAULT_START_YEAR, DEFAULT_START_YEAR)
    }
}

/// Return indices of records that pass the selection, in source order.
pub fn filtered_indices(dataset: &RecordSet, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, industry: &str, country: &str) -> Record {
        Record {
            name: format!("{industry}-{year}"),
            primary_category: industry.into(),
            country_code: country.into(),
            founded_year: year,
            funding_total_usd: Some(1.0e6),
            startup_age_years: Some(3.0),
            failed: false,
            status: "operating".into(),
        }
    }

    fn dataset() -> RecordSet {
        RecordSet::from_records(vec![
            record(1995, "software", "USA"),
            record(2005, "biotech", "GBR"),
            record(2010, "software", "GBR"),
            record(2012, "games", "USA"),
        ])
    }

    #[test]
    fn year_range_is_inclusive() {
        let ds = dataset();
        let sel = FilterSelection::years(2005, 2010);
        assert_eq!(filtered_indices(&ds, &sel), vec![1, 2]);
    }

    #[test]
    fn empty_sets_do_not_restrict() {
        let ds = dataset();
        let sel = FilterSelection::years(1900, 2100);
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2, 3]);
        assert!(!sel.has_category_filters());
    }

    #[test]
    fn industry_and_country_filters_combine() {
        let ds = dataset();
        let mut sel = FilterSelection::years(1900, 2100);
        sel.industries.insert("software".into());
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 2]);

        sel.countries.insert("GBR".into());
        assert_eq!(filtered_indices(&ds, &sel), vec![2]);
    }

    #[test]
    fn default_selection_starts_at_2000() {
        let sel = FilterSelection::for_dataset(&dataset());
        assert_eq!((sel.year_min, sel.year_max), (2000, 2012));

        let old = RecordSet::from_records(vec![record(1980, "x", "y"), record(1990, "x", "y")]);
        let sel = FilterSelection::for_dataset(&old);
        assert_eq!((sel.year_min, sel.year_max), (1980, 1990));
    }

    #[test]
    fn clamped_swaps_and_bounds() {
        let ds = dataset();
        let sel = FilterSelection::years(2050, 1800).clamped(&ds);
        assert_eq!((sel.year_min, sel.year_max), (1995, 2012));
        assert!(sel.validate().is_ok());
    }

    #[test]
    fn inverted_selection_is_invalid() {
        let err = FilterSelection::years(2011, 2010).validate().unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidSelection {
                year_min: 2011,
                year_max: 2010
            }
        ));
    }
}
