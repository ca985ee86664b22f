use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let startup = config.dataset.clone();
        let mut state = AppState::new(config);
        if let Some(path) = startup {
            state.open(&path);
        }
        Self { state }
    }
}

impl eframe::App for SalaryDashboardApp {
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

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(err).color(Color32::RED));
        });
        return;
    }
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a salary dataset to begin  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Salary Dashboard 📊");
            ui.label(
                "Explore data-industry salaries over the last few years. \
                 Use the filters on the left to refine the analysis.",
            );
            ui.add_space(8.0);

            ui.strong("Key metrics (annual salary in USD)");
            panels::kpi_row(ui, state);
            ui.separator();

            ui.strong("Charts");
            ui.columns(2, |cols| {
                plot::top_roles_chart(&mut cols[0], state);
                plot::histogram_chart(&mut cols[1], state);
            });
            ui.add_space(8.0);
            ui.columns(2, |cols| {
                plot::remote_ratio_chart(&mut cols[0], state);
                plot::country_chart(&mut cols[1], state);
            });
            ui.separator();

            ui.strong("Detailed data");
            table::detail_table(ui, state);
        });
}
