use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::{StatusColors, accent};
use crate::data::pipeline::{IndustryFailure, StatusFunding, YearCount};
use crate::data::stats::HistogramBin;
use crate::ui::kpi::{format_count, format_usd_short};

const CHART_HEIGHT: f32 = 280.0;

/// Axis label for category charts: the name at integer positions, blank elsewhere.
fn category_label(names: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Funding distribution (log scale)
// ---------------------------------------------------------------------------

/// Histogram of `ln(1 + funding)`.
pub fn funding_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{:.2} – {:.2}", b.lower, b.upper))
        })
        .collect();

    Plot::new("funding_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Log Funding")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(accent()));
        });
}

// ---------------------------------------------------------------------------
// Funding by status (box plot, log10 axis)
// ---------------------------------------------------------------------------

/// One box per status; the y axis is `log10(USD)` labelled in dollars.
pub fn funding_by_status(ui: &mut Ui, groups: &[StatusFunding], colors: Option<&StatusColors>) {
    let names: Vec<String> = groups.iter().map(|g| g.status.clone()).collect();

    Plot::new("funding_by_status")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("status")
        .y_axis_label("funding_total_usd (log)")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&names, mark)
        })
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_usd_short(10f64.powf(mark.value))
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, group) in groups.iter().enumerate() {
                let color = colors
                    .map(|c| c.color_for(&group.status))
                    .unwrap_or_else(accent);
                let s = group.summary.map(f64::log10);
                let elem = BoxElem::new(i as f64, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                    .name(format!("{} (n={})", group.status, group.count))
                    .box_width(0.5)
                    .whisker_width(0.3)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.status).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top industries by failure rate
// ---------------------------------------------------------------------------

pub fn industry_failure_chart(ui: &mut Ui, industries: &[IndustryFailure]) {
    let names: Vec<String> = industries.iter().map(|i| i.primary_category.clone()).collect();
    let bars: Vec<Bar> = industries
        .iter()
        .enumerate()
        .map(|(i, ind)| {
            Bar::new(i as f64, ind.failure_rate)
                .width(0.6)
                .name(&ind.primary_category)
        })
        .collect();

    Plot::new("industry_failure")
        .height(CHART_HEIGHT)
        .x_axis_label("Industry")
        .y_axis_label("Failure Rate")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&names, mark)
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(accent()));
        });
}

/// The same ranking as a table, with group sizes.
pub fn industry_failure_table(ui: &mut Ui, industries: &[IndustryFailure]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(90.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Industry");
            });
            header.col(|ui| {
                ui.strong("Startups");
            });
            header.col(|ui| {
                ui.strong("Failure Rate");
            });
        })
        .body(|mut body| {
            for ind in industries {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(ind.primary_category.as_str());
                    });
                    row.col(|ui| {
                        ui.label(format_count(ind.total as u64));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}%", ind.failure_rate * 100.0));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Startups founded per year
// ---------------------------------------------------------------------------

pub fn startups_per_year(ui: &mut Ui, years: &[YearCount]) {
    let points: PlotPoints = years
        .iter()
        .map(|y| [y.year as f64, y.count as f64])
        .collect();

    Plot::new("startups_per_year")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Number of Startups")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Startups").color(accent()).width(2.0));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_at_integer_ticks() {
        let names = vec!["acquired".to_string(), "closed".to_string()];
        let mark = |value| GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(category_label(&names, mark(1.0)), "closed");
        assert_eq!(category_label(&names, mark(0.5)), "");
        assert_eq!(category_label(&names, mark(-1.0)), "");
        assert_eq!(category_label(&names, mark(5.0)), "");
    }
}
