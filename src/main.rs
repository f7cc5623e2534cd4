mod app;
mod color;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use app::JobScopeApp;
use jobscope::config::{Cli, Settings};
use jobscope::data::cache::{self, Origin};
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    log::debug!("Settings: {settings:?}");

    let (table, origin) =
        cache::load_or_clean(&settings.raw_path, &settings.cache_path, cli.rebuild)?;
    let status = match &origin {
        Origin::Cache => format!("from cache {}", settings.cache_path.display()),
        Origin::Raw(report) => format!(
            "cleaned {} raw rows from {}",
            report.raw_rows,
            settings.raw_path.display()
        ),
    };

    let state = AppState::new(table, settings, Some(status));
    if cli.summary {
        print_summary(&state);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HR Market Intelligence Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(JobScopeApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard failed: {e}"))
}

/// Text rendering of the unfiltered dashboard for terminals and scripts.
fn print_summary(state: &AppState) {
    let s = &state.summary;
    println!("Market overview ({})", state.status_message.as_deref().unwrap_or(""));
    println!("  Active jobs     {}", s.active_jobs);
    println!("  Industries      {}", s.industries);
    println!(
        "  Avg salary      {}",
        ui::format_optional(s.mean_salary, ui::format_money)
    );
    println!(
        "  Median salary   {}",
        ui::format_optional(s.median_salary, ui::format_money)
    );
    println!(
        "  Avg experience  {}",
        ui::format_optional(s.mean_experience, |v| format!("{v:.1} yrs"))
    );

    println!();
    println!("Top industries");
    for d in &state.demand {
        println!("  {:>6}  {}", d.job_count, d.category);
    }

    println!();
    println!("Industry stats (median salary / applications / vacancies / competition)");
    for c in &state.category_stats {
        println!(
            "  {:<40} {:>10} {:>10} {:>10} {:>8}",
            c.category,
            ui::format_money(c.median_salary),
            ui::format_optional(c.total_applications, |v| format!("{v:.0}")),
            ui::format_optional(c.total_vacancies, |v| format!("{v:.0}")),
            ui::format_optional(c.competition_index, |v| format!("{v:.2}")),
        );
    }

    if let Some(fit) = state.trend {
        println!();
        println!(
            "Trend: salary ≈ {:.0} + {:.0} × years ({} sampled rows)",
            fit.intercept,
            fit.slope,
            state.sample_indices.len()
        );
    }
}
