use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::model::JobTable;

// ---------------------------------------------------------------------------
// Per-category market stats
// ---------------------------------------------------------------------------

/// Summary of one category over the whole cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub job_count: usize,
    pub median_salary: f64,
    /// `None` when the source had no application count column.
    pub total_applications: Option<f64>,
    /// `None` when the source had no vacancy count column.
    pub total_vacancies: Option<f64>,
    /// Applications per vacancy. Non-finite when the vacancies sum to zero.
    pub competition_index: Option<f64>,
}

/// Group the table by category, sorted by category name.
pub fn category_stats(table: &JobTable) -> Vec<CategoryStats> {
    #[derive(Default)]
    struct Acc {
        salaries: Vec<f64>,
        applications: f64,
        vacancies: f64,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for p in &table.postings {
        let acc = groups.entry(p.category.as_str()).or_default();
        acc.salaries.push(p.average_salary);
        acc.applications += p.applications.unwrap_or(0.0);
        acc.vacancies += p.vacancies.unwrap_or(0.0);
    }

    groups
        .into_iter()
        .map(|(category, mut acc)| {
            let total_applications = table.has_applications.then_some(acc.applications);
            let total_vacancies = table.has_vacancies.then_some(acc.vacancies);
            let competition_index = match (total_applications, total_vacancies) {
                (Some(a), Some(v)) => Some(a / v),
                _ => None,
            };
            CategoryStats {
                category: category.to_string(),
                job_count: acc.salaries.len(),
                median_salary: median(&mut acc.salaries).unwrap_or(f64::NAN),
                total_applications,
                total_vacancies,
                competition_index,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Overview metrics for a filtered view
// ---------------------------------------------------------------------------

/// Headline numbers of the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSummary {
    pub active_jobs: usize,
    pub industries: usize,
    pub mean_salary: Option<f64>,
    pub median_salary: Option<f64>,
    pub mean_experience: Option<f64>,
}

pub fn market_summary(table: &JobTable, indices: &[usize]) -> MarketSummary {
    let rows = indices.iter().map(|&i| &table.postings[i]);
    let mut salaries: Vec<f64> = rows.clone().map(|p| p.avg_salary).collect();
    let experience: Vec<f64> = rows
        .clone()
        .filter_map(|p| p.experience_years.map(|y| y as f64))
        .collect();
    let industries = rows
        .map(|p| p.category.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    MarketSummary {
        active_jobs: indices.len(),
        industries,
        mean_salary: mean(&salaries),
        median_salary: median(&mut salaries),
        mean_experience: mean(&experience),
    }
}

/// Job count of one category in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDemand {
    pub category: String,
    pub job_count: usize,
}

/// The `n` busiest categories of a view: count descending, then name.
pub fn top_categories(table: &JobTable, indices: &[usize], n: usize) -> Vec<CategoryDemand> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in indices {
        *counts.entry(table.postings[i].category.as_str()).or_default() += 1;
    }
    let mut demand: Vec<CategoryDemand> = counts
        .into_iter()
        .map(|(category, job_count)| CategoryDemand {
            category: category.to_string(),
            job_count,
        })
        .collect();
    // Stable sort keeps the alphabetical order among equal counts.
    demand.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    demand.truncate(n);
    demand
}

// ---------------------------------------------------------------------------
// Scatter support: sampling and regression
// ---------------------------------------------------------------------------

/// Pick `min(n, indices.len())` distinct entries of `indices` with a seeded
/// RNG, returned in their original order. Same seed and input, same output.
pub fn sample_indices(indices: &[usize], n: usize, seed: u64) -> Vec<usize> {
    if n >= indices.len() {
        return indices.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, indices.len(), n).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| indices[i]).collect()
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares over `[x, y]` points. `None` with fewer than two
/// points or when every x is the same.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for [x, y] in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x).powi(2);
    }
    if sxx.abs() < f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// `[experience_years, avg_salary]` for rows that state an experience.
pub fn experience_salary_points(table: &JobTable, indices: &[usize]) -> Vec<[f64; 2]> {
    indices
        .iter()
        .map(|&i| &table.postings[i])
        .filter_map(|p| p.experience_years.map(|y| [y as f64, p.avg_salary]))
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with the midpoint convention for even lengths. Sorts in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}
