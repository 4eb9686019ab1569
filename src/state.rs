use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::StatusColors;
use crate::data::filter::FilterSelection;
use crate::data::model::RecordSet;
use crate::data::pipeline::{PipelineResult, compute};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<RecordSet>,

    /// Where the dataset came from, for the top bar.
    pub source: Option<PathBuf>,

    /// Current filter selection, edited directly by the side panel.
    pub selection: FilterSelection,

    /// Pipeline output for `computed_for` (cached).
    pub result: Option<PipelineResult>,

    /// Selection the cached `result` belongs to.
    computed_for: Option<FilterSelection>,

    /// Box-plot colours, one per status.
    pub status_colors: Option<StatusColors>,

    /// Search text of the industry / country lists.
    pub industry_query: String,
    pub country_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

/// Snapshot written by "Export summary…".
#[derive(Serialize)]
struct SummaryExport<'a> {
    source: Option<&'a Path>,
    selection: &'a FilterSelection,
    result: &'a PipelineResult,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: RecordSet, source: Option<PathBuf>) {
        self.selection = FilterSelection::for_dataset(&dataset);
        self.status_colors = Some(StatusColors::new(dataset.statuses()));
        self.dataset = Some(dataset);
        self.source = source;
        self.result = None;
        self.computed_for = None;
        self.industry_query.clear();
        self.country_query.clear();
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the pipeline if the selection changed since the last run.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.selection = self.selection.clone().clamped(ds);
        if self.computed_for.as_ref() == Some(&self.selection) {
            return;
        }
        match compute(ds, &self.selection) {
            Ok(result) => {
                self.result = Some(result);
                self.computed_for = Some(self.selection.clone());
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Pipeline rejected selection: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Add or remove an industry from the selection.
    pub fn toggle_industry(&mut self, industry: &str) {
        toggle(&mut self.selection.industries, industry);
        self.refresh();
    }

    /// Add or remove a country from the selection.
    pub fn toggle_country(&mut self, country: &str) {
        toggle(&mut self.selection.countries, country);
        self.refresh();
    }

    /// Drop the industry restriction.
    pub fn clear_industries(&mut self) {
        self.selection.industries.clear();
        self.refresh();
    }

    /// Drop the country restriction.
    pub fn clear_countries(&mut self) {
        self.selection.countries.clear();
        self.refresh();
    }

    /// Set both year bounds; out-of-range or inverted input is clamped.
    pub fn set_year_range(&mut self, year_min: i32, year_max: i32) {
        self.selection.year_min = year_min;
        self.selection.year_max = year_max;
        self.refresh();
    }

    /// Reset every filter to its initial value.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = FilterSelection::for_dataset(ds);
            self.refresh();
        }
    }

    /// Write the current selection and result as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let result = self.result.as_ref().context("nothing to export yet")?;
        let export = SummaryExport {
            source: self.source.as_deref(),
            selection: &self.selection,
            result,
        };
        let json = serde_json::to_string_pretty(&export).context("serializing summary")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn dataset() -> RecordSet {
        let records = (0..120)
            .map(|i| Record {
                name: format!("s{i}"),
                primary_category: if i % 2 == 0 { "software" } else { "games" }.into(),
                country_code: if i % 3 == 0 { "USA" } else { "DEU" }.into(),
                founded_year: 1995 + (i % 20) as i32,
                funding_total_usd: Some(1000.0 * i as f64),
                startup_age_years: Some((i % 9) as f64),
                failed: i % 4 == 0,
                status: if i % 4 == 0 { "closed" } else { "operating" }.into(),
            })
            .collect();
        RecordSet::from_records(records)
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(dataset(), None);
        state
    }

    #[test]
    fn set_dataset_computes_initial_result() {
        let state = loaded();
        assert_eq!((state.selection.year_min, state.selection.year_max), (2000, 2014));
        let result = state.result.as_ref().unwrap();
        assert_eq!(
            result,
            &compute(state.dataset.as_ref().unwrap(), &state.selection).unwrap()
        );
    }

    #[test]
    fn cached_result_matches_fresh_compute_after_edits() {
        let mut state = loaded();
        state.toggle_industry("games");
        state.toggle_country("USA");
        state.set_year_range(1990, 2030);

        let ds = state.dataset.as_ref().unwrap();
        assert_eq!((state.selection.year_min, state.selection.year_max), (1995, 2014));
        assert_eq!(state.result.as_ref().unwrap(), &compute(ds, &state.selection).unwrap());

        state.toggle_industry("games");
        assert!(state.selection.industries.is_empty());
        state.clear_countries();
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(state.result.as_ref().unwrap(), &compute(ds, &state.selection).unwrap());
        assert_eq!(state.result.as_ref().unwrap().filtered_row_count, 120);
    }

    #[test]
    fn inverted_years_are_clamped_not_rejected() {
        let mut state = loaded();
        state.set_year_range(2010, 2005);
        assert_eq!((state.selection.year_min, state.selection.year_max), (2005, 2010));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn successful_recompute_clears_stale_error() {
        let mut state = loaded();
        state.status_message = Some("Error: writing summary.json".into());
        state.toggle_country("USA");
        assert!(state.status_message.is_none());
        assert!(state.result.is_some());
    }

    #[test]
    fn export_summary_writes_json() {
        let state = loaded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        state.export_summary(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["selection"]["year_min"], 2000);
        assert!(json["result"]["filtered_row_count"].as_u64().unwrap() > 0);
    }

    #[test]
    fn export_without_data_fails() {
        let state = AppState::default();
        assert!(state.export_summary(Path::new("unused.json")).is_err());
    }
}
