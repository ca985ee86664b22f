use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{
    COL_COMPANY_SIZE, COL_CONTRACT, COL_REMOTE, COL_RESIDENCE, COL_ROLE, COL_SALARY_USD,
    COL_SENIORITY, COL_YEAR,
};
use crate::state::AppState;

const HEADERS: [&str; 8] = [
    COL_YEAR,
    COL_SENIORITY,
    COL_CONTRACT,
    COL_COMPANY_SIZE,
    COL_ROLE,
    COL_SALARY_USD,
    COL_REMOTE,
    COL_RESIDENCE,
];

/// Unformatted dump of the filtered records, one virtualised row each.
pub fn detail_table(ui: &mut Ui, state: &AppState) {
    let records = state.visible_records();
    if records.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(70.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .max_scroll_height(400.0)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(state.config.table_row_height, records.len(), |mut row| {
                let r = records[row.index()];
                let cells = [
                    r.year.to_string(),
                    r.seniority.clone(),
                    r.contract_type.clone(),
                    r.company_size.clone(),
                    r.role.clone(),
                    r.salary_usd.to_string(),
                    r.remote_ratio.clone(),
                    r.residence_country_code.clone(),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
