use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use super::{format_money, format_optional};
use crate::state::AppState;

const HEADERS: [&str; 6] = [
    "Job Title",
    "Industry",
    "Employment Type",
    "Job Status",
    "Experience (yrs)",
    "Avg Salary",
];

/// The first `table_row_limit` postings of the current view.
pub fn jobs_table(ui: &mut Ui, state: &AppState) {
    let limit = state.settings.table_row_limit.min(state.visible_indices.len());
    let rows = &state.visible_indices[..limit];
    ui.strong(format!("Available Jobs (showing {limit})"));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(180.0).clip(true))
        .columns(Column::auto().at_least(90.0), 5)
        .max_scroll_height(420.0)
        .header(20.0, |mut header| {
            for name in HEADERS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let p = &state.table.postings[rows[row.index()]];
                row.col(|ui| {
                    ui.label(p.job_title.as_str());
                });
                row.col(|ui| {
                    ui.label(p.category.as_str());
                });
                row.col(|ui| {
                    ui.label(p.employment_type.as_deref().unwrap_or("–"));
                });
                row.col(|ui| {
                    ui.label(p.job_status.as_deref().unwrap_or("–"));
                });
                row.col(|ui| {
                    ui.label(format_optional(p.experience_years.map(|y| y as f64), |v| {
                        format!("{v}")
                    }));
                });
                row.col(|ui| {
                    ui.label(format_money(p.avg_salary));
                });
            });
        });
}

/// Median salary, application and vacancy totals per industry.
pub fn category_stats_grid(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new("Market Stats by Industry")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::ScrollArea::vertical()
                .id_salt("category_stats")
                .max_height(200.0)
                .show(ui, |ui: &mut Ui| {
                    egui::Grid::new("category_stats_grid")
                        .striped(true)
                        .num_columns(6)
                        .show(ui, |ui: &mut Ui| {
                            for h in [
                                "Industry",
                                "Jobs",
                                "Median Salary",
                                "Applications",
                                "Vacancies",
                                "Competition",
                            ] {
                                ui.strong(h);
                            }
                            ui.end_row();

                            for s in &state.category_stats {
                                ui.label(s.category.as_str());
                                ui.label(s.job_count.to_string());
                                ui.label(format_money(s.median_salary));
                                ui.label(format_optional(s.total_applications, |v| {
                                    format!("{v:.0}")
                                }));
                                ui.label(format_optional(s.total_vacancies, |v| {
                                    format!("{v:.0}")
                                }));
                                ui.label(format_optional(s.competition_index, |v| {
                                    if v.is_finite() {
                                        format!("{v:.2}")
                                    } else {
                                        "n/a".to_string()
                                    }
                                }));
                                ui.end_row();
                            }
                        });
                });
        });
}
