use std::collections::BTreeMap;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Demand by industry (horizontal bars)
// ---------------------------------------------------------------------------

/// Top categories of the current view, busiest at the top.
pub fn demand_chart(ui: &mut Ui, state: &AppState) {
    ui.strong(format!(
        "Job Market Demand (Top {} Industries)",
        state.settings.top_categories
    ));

    let n = state.demand.len();
    let bars: Vec<Bar> = state
        .demand
        .iter()
        .enumerate()
        .map(|(rank, d)| {
            Bar::new((n - 1 - rank) as f64, d.job_count as f64)
                .name(&d.category)
                .fill(state.color_map.color_for(&d.category))
        })
        .collect();

    Plot::new("demand_chart")
        .height(300.0)
        .x_axis_label("Number of Jobs")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
            for (rank, d) in state.demand.iter().enumerate() {
                let label = Text::new(
                    PlotPoint::new(0.0, (n - 1 - rank) as f64),
                    RichText::new(format!(" {}", d.category)).color(Color32::WHITE),
                )
                .anchor(egui::Align2::LEFT_CENTER);
                plot_ui.text(label);
            }
        });
}

// ---------------------------------------------------------------------------
// Salary vs experience (sampled scatter with trend line)
// ---------------------------------------------------------------------------

pub fn salary_scatter(ui: &mut Ui, state: &AppState) {
    ui.strong(format!(
        "Salary vs Experience ({} sampled)",
        state.sample_indices.len()
    ));

    let mut by_category: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    let mut x_max: f64 = 0.0;
    for &i in &state.sample_indices {
        let p = &state.table.postings[i];
        if let Some(years) = p.experience_years {
            by_category
                .entry(p.category.as_str())
                .or_default()
                .push([years as f64, p.avg_salary]);
            x_max = x_max.max(years as f64);
        }
    }

    Plot::new("salary_scatter")
        .height(300.0)
        .x_axis_label("Years of Experience")
        .y_axis_label("Average Salary")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in by_category {
                let color = state.color_map.color_for(category).gamma_multiply(0.6);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(color)
                        .radius(3.0),
                );
            }
            if let Some(fit) = state.trend {
                let line = Line::new(PlotPoints::from(vec![
                    [0.0, fit.predict(0.0)],
                    [x_max, fit.predict(x_max)],
                ]))
                .name("trend")
                .color(Color32::WHITE)
                .width(2.0);
                plot_ui.line(line);
            }
        });
}
