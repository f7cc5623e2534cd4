use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::{format_money, format_optional};
use crate::state::{AppState, FilterField};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Job Filters");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No postings survived cleaning.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            choice_filter(ui, state, FilterField::Category, "Industry", true);
            choice_filter(ui, state, FilterField::EmploymentType, "Employment Type", false);
            choice_filter(ui, state, FilterField::JobStatus, "Job Status", false);
            ui.separator();
            salary_filter(ui, state);
            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

/// Collapsible checkbox list for one set-valued field. Nothing ticked means
/// no restriction, as in a multiselect.
fn choice_filter(ui: &mut Ui, state: &mut AppState, field: FilterField, label: &str, colored: bool) {
    let choices = state.choices(field).to_vec();
    let n_selected = state.selected(field).len();
    let header_text = if n_selected == 0 {
        format!("{label}  (all)")
    } else {
        format!("{label}  ({n_selected}/{})", choices.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(label)
        .default_open(field != FilterField::Category)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Any").clicked() {
                state.clear_field(field);
            }

            ScrollArea::vertical()
                .id_salt(label)
                .max_height(220.0)
                .show(ui, |ui: &mut Ui| {
                    for value in &choices {
                        let mut checked = state.selected(field).contains(value);
                        let mut text = RichText::new(value);
                        if colored {
                            text = text.color(state.color_map.color_for(value));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_filter_value(field, value);
                        }
                    }
                });
        });
}

fn salary_filter(ui: &mut Ui, state: &mut AppState) {
    let (min, max) = state.options.salary_bounds;
    let (mut lo, mut hi) = state.filter.salary_range;

    ui.strong("Average Salary Range");
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, min..=max).text("min"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, min..=max).text("max"))
        .changed();
    if lo_changed || hi_changed {
        state.set_salary_range(lo, hi);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!(
            "{} postings loaded, {} visible",
            state.table.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::GRAY));
        }
    });
}

// ---------------------------------------------------------------------------
// Market overview metrics
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, state: &AppState) {
    let s = &state.summary;
    ui.heading("Market Overview");
    ui.columns(5, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Active Jobs", s.active_jobs.to_string());
        metric(&mut cols[1], "Industries", s.industries.to_string());
        metric(&mut cols[2], "Avg Salary", format_optional(s.mean_salary, format_money));
        metric(&mut cols[3], "Median Salary", format_optional(s.median_salary, format_money));
        metric(
            &mut cols[4],
            "Avg Experience",
            format_optional(s.mean_experience, |v| format!("{v:.1} yrs")),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).color(Color32::GRAY));
            ui.heading(value);
        });
    });
}
