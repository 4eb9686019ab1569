use eframe::egui::{self, RichText, Ui};

use crate::data::pipeline::PipelineResult;

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Four metric cards side by side.
pub fn kpi_row(ui: &mut Ui, result: &PipelineResult) {
    ui.columns(4, |cols: &mut [Ui]| {
        card(&mut cols[0], "Total Startups", format_count(result.filtered_row_count as u64));
        card(&mut cols[1], "Failure Rate", format!("{:.2}%", result.failure_rate));
        card(&mut cols[2], "Median Funding (USD)", format_usd(result.median_funding));
        card(&mut cols[3], "Avg Survival Years", format_years(result.mean_survival_years));
    });
}

fn card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole dollars with separators; `None` renders as `n/a`.
pub fn format_usd(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let sign = if v < 0.0 { "-" } else { "" };
            format!("{sign}${}", format_count(v.abs().round() as u64))
        }
        _ => "n/a".to_string(),
    }
}

/// Compact dollar label for axis ticks: `$1.5M`, `$20k`.
pub fn format_usd_short(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("${:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("${:.0}k", v / 1e3)
    } else {
        format!("${v:.0}")
    }
}

pub fn format_years(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}"),
        _ => "n/a".to_string(),
    }
}
