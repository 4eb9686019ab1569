use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::loader::load_file;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What a multi-select list asks the state to do.
enum Pick {
    Toggle(String),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    let Some((first_year, last_year)) = dataset.year_bounds() else {
        ui.label("Dataset is empty.");
        return;
    };

    // Clone what we need so we can mutate state inside the panel.
    let industries: Vec<String> = dataset.industries().iter().cloned().collect();
    let countries: Vec<String> = dataset.countries().iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Founded year range ----
            ui.strong("Select Founded Year Range");
            let mut from = state.selection.year_min;
            let mut to = state.selection.year_max;
            let from_changed = ui
                .add(Slider::new(&mut from, first_year..=last_year).text("from"))
                .changed();
            let to_changed = ui
                .add(Slider::new(&mut to, first_year..=last_year).text("to"))
                .changed();
            if from_changed || to_changed {
                // Dragging one handle past the other pushes the other along.
                if from > to {
                    if from_changed {
                        to = from;
                    } else {
                        from = to;
                    }
                }
                state.set_year_range(from, to);
            }
            ui.separator();

            // ---- Industry / country multi-selects ----
            match multi_select(
                ui,
                "Select Industry",
                &industries,
                &state.selection.industries,
                &mut state.industry_query,
            ) {
                Some(Pick::Toggle(v)) => state.toggle_industry(&v),
                Some(Pick::Clear) => state.clear_industries(),
                None => {}
            }

            match multi_select(
                ui,
                "Select Country",
                &countries,
                &state.selection.countries,
                &mut state.country_query,
            ) {
                Some(Pick::Toggle(v)) => state.toggle_country(&v),
                Some(Pick::Clear) => state.clear_countries(),
                None => {}
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Collapsible checkbox list with a search box. Nothing checked means
/// "no restriction".
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
    query: &mut String,
) -> Option<Pick> {
    let mut pick = None;

    let header_text = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::singleline(query)
                        .hint_text("Search…")
                        .desired_width(120.0),
                );
                if ui.small_button("All").clicked() {
                    pick = Some(Pick::Clear);
                }
            });

            let needle = query.to_lowercase();
            for option in options
                .iter()
                .filter(|o| needle.is_empty() || o.to_lowercase().contains(&needle))
            {
                let label = if option.is_empty() { "(blank)" } else { option.as_str() };
                let mut checked = selected.contains(option);
                if ui.checkbox(&mut checked, label).changed() {
                    pick = Some(Pick::Toggle(option.clone()));
                }
            }
        });

    pick
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.result.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let matching = state
                .result
                .as_ref()
                .map(|r| r.filtered_row_count)
                .unwrap_or(0);
            ui.label(format!("{} startups loaded, {matching} match", ds.len()));
            if state.selection.has_category_filters() {
                ui.label(RichText::new("industry / country filters active").italics());
            }
            if let Some(path) = &state.source {
                ui.label(RichText::new(path.display().to_string()).weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open startup dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, Some(path)),
            Err(e) => state.status_message = Some(format!("Error: {e}")),
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_summary(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export summary: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
