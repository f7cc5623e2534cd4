use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use jobscope::data::model::col;

/// Write a synthetic raw job-postings export, including the kinds of broken
/// rows the cleaner has to cope with.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV path
    #[arg(short, long, default_value = "SGJobData.csv")]
    output: PathBuf,

    /// Number of postings
    #[arg(short, long, default_value_t = 20_000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const CATEGORIES: [(&str, f64); 10] = [
    ("Information Technology", 6500.0),
    ("Banking and Finance", 6000.0),
    ("Engineering", 5000.0),
    ("Healthcare / Pharmaceutical", 4500.0),
    ("Sales / Retail", 3200.0),
    ("Logistics / Supply Chain", 3400.0),
    ("F&B", 2400.0),
    ("Hospitality", 2600.0),
    ("Admin / Secretarial", 2900.0),
    ("Education and Training", 4200.0),
];

const ROLES: [&str; 10] = [
    "Software Engineer",
    "Accountant",
    "Project Engineer",
    "Staff Nurse",
    "Sales Executive",
    "Warehouse Assistant",
    "Cook",
    "Front Office Associate",
    "Admin Assistant",
    "Tutor",
];

const TITLE_NOISE: [&str; 6] = [
    "",
    " (URGENT)",
    " $3,500",
    " + Allowances",
    " (5 days, Jurong)",
    " urgent hiring!!",
];

const EMPLOYMENT_TYPES: [&str; 5] = ["Full Time", "Permanent", "Contract", "Part Time", "Temporary"];
const POSITION_LEVELS: [&str; 5] = ["Fresh/entry level", "Junior Executive", "Executive", "Manager", "Senior Management"];
const STATUSES: [&str; 3] = ["Open", "Re-open", "Closed"];
const DISTRICTS: [&str; 6] = ["Central", "Jurong", "Tampines", "Woodlands", "Changi", ""];

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let header = [
        "metadata_jobPostId",
        "metadata_totalNumberOfView",
        "status_id",
        col::TITLE,
        col::CATEGORIES,
        col::POSITION_LEVELS,
        col::SALARY_TYPE,
        col::COMPANY,
        col::EMPLOYMENT_TYPES,
        col::MIN_YEARS_EXPERIENCE,
        col::SALARY_MINIMUM,
        col::SALARY_MAXIMUM,
        col::AVERAGE_SALARY,
        col::JOB_STATUS_RAW,
        col::VACANCIES,
        col::APPLICATIONS,
        "district",
    ];

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(header)?;

    for id in 0..args.rows {
        let role = rng.gen_range(0..ROLES.len());
        let (primary, base_salary) = CATEGORIES[role];

        let mut cats = vec![json!({ "id": role, "category": primary })];
        if rng.gen_bool(0.3) {
            let (extra, _) = CATEGORIES.choose(&mut rng).copied().unwrap_or(CATEGORIES[0]);
            if extra != primary {
                cats.push(json!({ "category": extra }));
            }
        }
        let categories = match rng.gen_range(0..100) {
            0 => "[{category: broken".to_string(),
            1 => String::new(),
            _ => serde_json::Value::Array(cats).to_string(),
        };

        let experience: u32 = rng.gen_range(0..15);
        let experience_text = match rng.gen_range(0..20) {
            0 => "N/A".to_string(),
            1 => format!("{experience} years"),
            2 => "45".to_string(),
            _ => experience.to_string(),
        };

        let spread = base_salary * 0.25;
        let mut salary_min = (base_salary + experience as f64 * 250.0 - spread).max(600.0).round();
        let mut salary_max = (salary_min + rng.gen_range(0.0..spread * 2.0)).round();
        match rng.gen_range(0..50) {
            0 => {
                salary_min = 1.0;
                salary_max = 99.0;
            }
            1 => {
                salary_min = 90_000.0;
                salary_max = 150_000.0;
            }
            _ => {}
        }
        let average = (salary_min + salary_max) / 2.0;

        let noise = TITLE_NOISE.choose(&mut rng).copied().unwrap_or("");
        let title = if rng.gen_range(0..100) == 0 {
            String::new()
        } else {
            format!("{}{noise}", ROLES[role])
        };

        let record = [
            format!("MCF-2023-{id:07}"),
            rng.gen_range(0..500).to_string(),
            "0".to_string(),
            title,
            categories,
            POSITION_LEVELS.choose(&mut rng).copied().unwrap_or("Executive").to_string(),
            "Monthly".to_string(),
            format!("COMPANY {:03} PTE. LTD.", rng.gen_range(0..400)),
            EMPLOYMENT_TYPES.choose(&mut rng).copied().unwrap_or("Full Time").to_string(),
            experience_text,
            salary_min.to_string(),
            salary_max.to_string(),
            average.to_string(),
            STATUSES.choose(&mut rng).copied().unwrap_or("Open").to_string(),
            rng.gen_range(0..5).to_string(),
            rng.gen_range(0..80).to_string(),
            DISTRICTS.choose(&mut rng).copied().unwrap_or("").to_string(),
        ];
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Wrote {} postings to {}", args.rows, args.output.display());
    Ok(())
}
