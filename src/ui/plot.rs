use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color;
use crate::state::AppState;
use crate::ui::panels::format_usd;

const CHART_HEIGHT: f32 = 300.0;

/// Angular step for donut slices; each step is drawn as its own convex quad.
const ARC_STEP: f64 = TAU / 180.0;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Horizontal bars, one per role, best-paid on top.
pub fn top_roles_chart(ui: &mut Ui, state: &AppState) {
    let series = &state.aggregates.top_roles;
    chart_title(ui, &format!("Top {} roles by mean salary", state.config.top_roles));
    if series.is_empty() {
        no_data(ui, "roles");
        return;
    }

    let (min, max) = min_max(series.iter().map(|r| r.mean_salary));
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_salary)
                .name(&r.role)
                .fill(state.color_scale.for_value(r.mean_salary, min, max))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = series.iter().map(|r| r.role.clone()).collect();

    static_plot("top_roles")
        .x_axis_label("Mean annual salary (USD)")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .element_formatter(Box::new(|bar, _chart| {
                        format!("{}\n{}", bar.name, format_usd(bar.value))
                    })),
            );
        });
}

/// Salary distribution as adjacent bars.
pub fn histogram_chart(ui: &mut Ui, state: &AppState) {
    let buckets = &state.aggregates.histogram;
    chart_title(ui, "Annual salary distribution");
    if buckets.is_empty() {
        no_data(ui, "the salary distribution");
        return;
    }

    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{} – {}", format_usd(b.lower), format_usd(b.upper)))
                .fill(color::ACCENT)
                .stroke(Stroke::new(1.0, color::SECONDARY))
        })
        .collect();

    static_plot("salary_histogram")
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Records")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Donut chart of the work-arrangement share, with percent labels.
pub fn remote_ratio_chart(ui: &mut Ui, state: &AppState) {
    let counts = &state.aggregates.remote_ratio;
    chart_title(ui, "Work arrangement share");
    if counts.is_empty() {
        no_data(ui, "work arrangements");
        return;
    }

    let total: usize = counts.iter().map(|c| c.count).sum();
    static_plot("remote_ratio")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Start at 12 o'clock, go clockwise.
            let mut start = FRAC_PI_2;
            for (i, slice) in counts.iter().enumerate() {
                let share = slice.count as f64 / total as f64;
                let end = start - share * TAU;
                let fill = color::categorical(i);
                let name = format!("{} ({:.1}%)", slice.category, share * 100.0);

                for points in donut_segments(start, end, 0.5, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(points))
                            .fill_color(fill)
                            .stroke(Stroke::new(0.0, fill))
                            .name(&name),
                    );
                }

                let mid = (start + end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.75 * mid.cos(), 0.75 * mid.sin()),
                    RichText::new(format!("{:.1}%", share * 100.0))
                        .color(Color32::WHITE)
                        .strong(),
                ));
                start = end;
            }
        });
}

/// Mean salary of one role per residence country.
pub fn country_chart(ui: &mut Ui, state: &AppState) {
    let series = &state.aggregates.salary_by_country;
    chart_title(ui, &format!("Mean {} salary by country", state.config.country_role));
    if series.is_empty() {
        no_data(ui, "countries");
        return;
    }

    let (min, max) = min_max(series.iter().map(|c| c.mean_salary));
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.mean_salary)
                .name(&c.country)
                .fill(state.color_scale.for_value(c.mean_salary, min, max))
                .width(0.8)
        })
        .collect();
    let labels: Vec<String> = series.iter().map(|c| c.country.clone()).collect();

    static_plot("salary_by_country")
        .y_axis_label("Mean salary (USD)")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).element_formatter(Box::new(|bar, _chart| {
                format!("{}\n{}", bar.name, format_usd(bar.value))
            })));
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A plot that doesn't pan or zoom; the dashboard charts are read-only.
fn static_plot(id: &str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
}

fn no_data(ui: &mut Ui, what: &str) {
    ui.colored_label(
        Color32::from_rgb(0xE8, 0xC5, 0x47),
        format!("No data to display for {what}."),
    );
}

/// Label for a category axis: only integer ticks inside the series get text.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Split the ring sector between angles `start` and `end` (radians, either
/// direction) into quads of at most [`ARC_STEP`].
fn donut_segments(start: f64, end: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let sweep = end - start;
    // Tolerance keeps a full turn at exactly 360 / ARC_STEP pieces.
    let steps = ((sweep.abs() / ARC_STEP - 1e-9).ceil() as usize).max(1);
    let at = |angle: f64, r: f64| [r * angle.cos(), r * angle.sin()];
    (0..steps)
        .map(|i| {
            let a0 = start + sweep * i as f64 / steps as f64;
            let a1 = start + sweep * (i + 1) as f64 / steps as f64;
            vec![at(a0, inner), at(a0, outer), at(a1, outer), at(a1, inner)]
        })
        .collect()
}
