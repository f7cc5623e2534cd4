use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct JobScopeApp {
    pub state: AppState,
}

impl JobScopeApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for JobScopeApp {
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

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::overview(ui, &self.state);
            ui.separator();
            ui.columns(2, |cols| {
                charts::demand_chart(&mut cols[0], &self.state);
                charts::salary_scatter(&mut cols[1], &self.state);
            });
            ui.separator();
            table::category_stats_grid(ui, &self.state);
            ui.separator();
            table::jobs_table(ui, &self.state);
        });
    }
}
