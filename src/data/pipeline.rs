use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::filter::{FilterSelection, filtered_indices};
use super::model::{Record, RecordSet};
use super::stats::{self, FiveNumberSummary, HistogramBin};

/// Bins in the log-funding histogram.
pub const HISTOGRAM_BINS: usize = 40;
/// Industries with fewer startups than this are left out of the ranking.
pub const MIN_INDUSTRY_SIZE: usize = 50;
/// Length of the failing-industries ranking.
pub const TOP_INDUSTRIES: usize = 10;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Five-number summary of positive funding for one status group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusFunding {
    pub status: String,
    /// Number of values the summary was computed from.
    pub count: usize,
    /// Summary in USD; plot with `summary.map(f64::log10)` on a log axis.
    pub summary: FiveNumberSummary,
}

/// Failure statistics for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryFailure {
    pub primary_category: String,
    pub total: usize,
    /// Fraction of failed startups, `0.0..=1.0`.
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub filtered_row_count: usize,
    /// Percentage of failed startups, `0.0..=100.0`; `0.0` when nothing matched.
    pub failure_rate: f64,
    /// `None` when no matching startup reports funding.
    pub median_funding: Option<f64>,
    /// `None` when no matching startup reports an age.
    pub mean_survival_years: Option<f64>,
    /// Histogram of `ln(1 + funding_total_usd)`.
    pub funding_log_histogram: Vec<HistogramBin>,
    /// One entry per status, ordered by status name.
    pub funding_by_status: Vec<StatusFunding>,
    pub top_failing_industries: Vec<IndustryFailure>,
    /// Ascending by year; only years present in the filtered set.
    pub startups_per_year: Vec<YearCount>,
}

// ---------------------------------------------------------------------------
// compute
// ---------------------------------------------------------------------------

/// Filter `dataset` by `selection` and derive KPIs and chart series.
///
/// Pure: the same inputs always produce an equal result. An empty filtered
/// set is not an error; only inverted year bounds are.
pub fn compute(
    dataset: &RecordSet,
    selection: &FilterSelection,
) -> Result<PipelineResult, DataError> {
    selection.validate()?;

    let records = dataset.records();
    let filtered: Vec<&Record> = filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &records[i])
        .collect();

    let total = filtered.len();
    let failed = filtered.iter().filter(|r| r.failed).count();
    let failure_rate = if total > 0 {
        100.0 * failed as f64 / total as f64
    } else {
        0.0
    };

    let funding: Vec<f64> = filtered.iter().filter_map(|r| r.funding_total_usd).collect();
    let ages: Vec<f64> = filtered.iter().filter_map(|r| r.startup_age_years).collect();

    let log_funding: Vec<f64> = funding.iter().map(|v| v.ln_1p()).collect();

    log::debug!(
        "compute: {total} of {} startups match years {}..={}",
        dataset.len(),
        selection.year_min,
        selection.year_max
    );

    Ok(PipelineResult {
        filtered_row_count: total,
        failure_rate,
        median_funding: stats::median(&funding),
        mean_survival_years: stats::mean(&ages),
        funding_log_histogram: stats::histogram(&log_funding, HISTOGRAM_BINS),
        funding_by_status: funding_by_status(&filtered),
        top_failing_industries: top_failing_industries(&filtered),
        startups_per_year: startups_per_year(&filtered),
    })
}

/// Group by status and summarize positive funding per group.
fn funding_by_status(filtered: &[&Record]) -> Vec<StatusFunding> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in filtered {
        let values = groups.entry(r.status.as_str()).or_default();
        if let Some(v) = r.funding_total_usd.filter(|v| *v > 0.0) {
            values.push(v);
        }
    }

    groups
        .into_iter()
        .filter_map(|(status, values)| {
            let summary = FiveNumberSummary::from_values(&values)?;
            Some(StatusFunding {
                status: status.to_string(),
                count: values.len(),
                summary,
            })
        })
        .collect()
}

/// Industries with at least [`MIN_INDUSTRY_SIZE`] startups, highest failure
/// rate first, ties by name, at most [`TOP_INDUSTRIES`].
fn top_failing_industries(filtered: &[&Record]) -> Vec<IndustryFailure> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for r in filtered {
        let (total, failed) = groups.entry(r.primary_category.as_str()).or_default();
        *total += 1;
        if r.failed {
            *failed += 1;
        }
    }

    let mut ranked: Vec<IndustryFailure> = groups
        .into_iter()
        .filter(|(_, (total, _))| *total >= MIN_INDUSTRY_SIZE)
        .map(|(category, (total, failed))| IndustryFailure {
            primary_category: category.to_string(),
            total,
            failure_rate: failed as f64 / total as f64,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.failure_rate
            .partial_cmp(&a.failure_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.primary_category.cmp(&b.primary_category))
    });
    ranked.truncate(TOP_INDUSTRIES);
    ranked
}

fn startups_per_year(filtered: &[&Record]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in filtered {
        *counts.entry(r.founded_year).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}
