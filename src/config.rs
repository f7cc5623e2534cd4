use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line flags. Anything given here overrides the config file.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "jobscope", version, about = "Job market cleaning pipeline and dashboard")]
pub struct Cli {
    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raw job postings export (.csv or .parquet)
    #[arg(long, value_name = "FILE")]
    pub raw: Option<PathBuf>,

    /// Cleaned table cache (.csv or .parquet)
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Ignore an existing cache and clean the raw file again
    #[arg(long)]
    pub rebuild: bool,

    /// Print the market overview to stdout instead of opening the dashboard
    #[arg(long)]
    pub summary: bool,

    /// Seed for the scatter plot sample
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub raw_path: PathBuf,
    pub cache_path: PathBuf,
    /// Rows drawn for the salary/experience scatter.
    pub scatter_sample_size: usize,
    pub sample_seed: u64,
    /// Rows shown in the jobs table.
    pub table_row_limit: usize,
    /// Bars in the demand chart.
    pub top_categories: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("SGJobData.csv"),
            cache_path: PathBuf::from("cleaned_SGJobData_exploded.csv"),
            scatter_sample_size: 3000,
            sample_seed: 42,
            table_row_limit: 1000,
            top_categories: 10,
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        Ok(settings)
    }

    /// Defaults, then the optional config file, then CLI overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        if let Some(raw) = &cli.raw {
            settings.raw_path = raw.clone();
        }
        if let Some(cache) = &cli.cache {
            settings.cache_path = cache.clone();
        }
        if let Some(seed) = cli.seed {
            settings.sample_seed = seed;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobscope.toml");
        std::fs::write(&path, "raw_path = \"data/jobs.parquet\"\nsample_seed = 7\n").unwrap();

        let settings = Settings::load_from_file(&path).unwrap();
        assert_eq!(settings.raw_path, PathBuf::from("data/jobs.parquet"));
        assert_eq!(settings.sample_seed, 7);
        assert_eq!(settings.scatter_sample_size, 3000);
        assert_eq!(settings.cache_path, Settings::default().cache_path);
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobscope.toml");
        std::fs::write(&path, "raw_path = \"a.csv\"\ncache_path = \"b.csv\"\n").unwrap();

        let cli = Cli::parse_from([
            "jobscope",
            "--config",
            path.to_str().unwrap(),
            "--cache",
            "c.parquet",
            "--seed",
            "9",
        ]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.raw_path, PathBuf::from("a.csv"));
        assert_eq!(settings.cache_path, PathBuf::from("c.parquet"));
        assert_eq!(settings.sample_seed, 9);
        assert!(!cli.rebuild);
    }
}
