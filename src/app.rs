use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{insights, kpi, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, insights ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("Venture Success & Failure Dashboard");
    ui.label(
        "An interactive analysis of global startup success, funding, survival trends, and industry risk.",
    );
    ui.separator();

    let Some(result) = &state.result else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open…)");
        });
        return;
    };

    section(ui, "Key Metrics");
    kpi::kpi_row(ui, result);

    section(ui, "Funding Distribution (Log Scale)");
    plot::funding_histogram(ui, &result.funding_log_histogram);

    section(ui, "Funding by Startup Status");
    plot::funding_by_status(ui, &result.funding_by_status, state.status_colors.as_ref());

    section(ui, "Top Industries by Failure Rate");
    if result.top_failing_industries.is_empty() {
        ui.label("No industry has enough startups in the current selection.");
    } else {
        plot::industry_failure_chart(ui, &result.top_failing_industries);
        plot::industry_failure_table(ui, &result.top_failing_industries);
    }

    section(ui, "Startups Founded Per Year");
    plot::startups_per_year(ui, &result.startups_per_year);

    section(ui, "Key Insights Summary");
    insights::key_insights(ui);
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
}
