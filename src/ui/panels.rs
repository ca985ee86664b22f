use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{export_csv, export_summary_json};
use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters 🔎");
    ui.label(
        RichText::new(
            "Use the filters below to explore salaries by year, seniority, \
             contract type and company size.",
        )
        .small(),
    );
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Per-dimension multi-select (collapsible) ----
            for dim in Dimension::ALL {
                // Clone so the checkboxes can mutate state inside the loop.
                let all_values = state.filters.domain().get(dim).clone();
                let selected = state.filters.selection().get(dim).clone();

                let header_text = format!("{dim}  ({}/{})", selected.len(), all_values.len());

                let response = egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_dimension(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in &all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(dim, val);
                            }
                        }
                    });
                response
                    .header_response
                    .on_hover_text(format!("Column `{}`", dim.column()));
            }

            ui.separator();
            ui.label(RichText::new("Quick actions").small());
            if ui.button("Select all filters").clicked() {
                state.select_all();
            }
        });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Four headline metrics side by side.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let kpis = &state.aggregates.kpis;
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Mean salary", &format_usd(kpis.mean_salary));
        metric(&mut cols[1], "Max salary", &format_usd(kpis.max_salary));
        metric(&mut cols[2], "Total records", &format_count(kpis.record_count));
        metric(&mut cols[3], "Most frequent role", &kpis.mode_role);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

/// `1234567.8` → `$1,234,568`
pub fn format_usd(value: f64) -> String {
    format!("${}", group_thousands(value.round().max(0.0) as u64))
}

/// `12345` → `12,345`
pub fn format_count(n: usize) -> String {
    group_thousands(n as u64)
}

fn group_thousands(n: u64) -> String {
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
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            let has_data = state.dataset.is_some();
            if ui
                .add_enabled(has_data, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Export summary JSON…"))
                .clicked()
            {
                export_json_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                format_count(ds.len()),
                format_count(state.view.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::YELLOW));
        }
        if let Some(msg) = &state.load_error {
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
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

fn export_csv_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_salaries.csv")
        .save_file()
    else {
        return;
    };
    let result = export_csv(&path, &state.visible_records());
    if let Err(e) = result {
        log::error!("Export failed: {e}");
        state.status_message = Some(format!("Export failed: {e}"));
    }
}

fn export_json_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export summary")
        .add_filter("JSON", &["json"])
        .set_file_name("salary_summary.json")
        .save_file()
    else {
        return;
    };
    if let Err(e) = export_summary_json(&path, &state.aggregates) {
        log::error!("Export failed: {e}");
        state.status_message = Some(format!("Export failed: {e}"));
    }
}
