use std::collections::BTreeSet;

use super::model::{JobPosting, JobTable};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per field
// ---------------------------------------------------------------------------

/// The user's current view definition.
///
/// An empty set means "no restriction" for that field. The salary range is
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub categories: BTreeSet<String>,
    pub employment_types: BTreeSet<String>,
    pub job_statuses: BTreeSet<String>,
    pub salary_range: (f64, f64),
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            employment_types: BTreeSet::new(),
            job_statuses: BTreeSet::new(),
            salary_range: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

impl FilterSpec {
    /// No set restrictions and the full salary span of the table.
    pub fn unrestricted(options: &FilterOptions) -> Self {
        Self {
            salary_range: options.salary_bounds,
            ..Self::default()
        }
    }

    /// Whether a single posting satisfies every predicate.
    ///
    /// A posting without an employment type or job status never matches a
    /// non-empty selection for that field.
    pub fn matches(&self, p: &JobPosting) -> bool {
        let (lo, hi) = self.salary_range;
        allows(&self.categories, Some(p.category.as_str()))
            && allows(&self.employment_types, p.employment_type.as_deref())
            && allows(&self.job_statuses, p.job_status.as_deref())
            && lo <= p.avg_salary
            && p.avg_salary <= hi
    }
}

fn allows(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

/// Return indices of postings that pass the filter, in table order.
pub fn filtered_indices(table: &JobTable, spec: &FilterSpec) -> Vec<usize> {
    table
        .postings
        .iter()
        .enumerate()
        .filter(|(_, p)| spec.matches(p))
        .map(|(i, _)| i)
        .collect()
}

/// Same as [`filtered_indices`], restricted to an existing view.
pub fn refine_indices(table: &JobTable, view: &[usize], spec: &FilterSpec) -> Vec<usize> {
    view.iter()
        .copied()
        .filter(|&i| spec.matches(&table.postings[i]))
        .collect()
}

// ---------------------------------------------------------------------------
// Choices offered to the user
// ---------------------------------------------------------------------------

/// Distinct values per filterable field, sorted, plus the salary span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub employment_types: Vec<String>,
    pub job_statuses: Vec<String>,
    /// `(floor(min), ceil(max))` of `avg_salary`; `(0, 0)` for an empty table.
    pub salary_bounds: (f64, f64),
}

impl FilterOptions {
    pub fn from_table(table: &JobTable) -> Self {
        let mut categories = BTreeSet::new();
        let mut employment_types = BTreeSet::new();
        let mut job_statuses = BTreeSet::new();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        for p in &table.postings {
            categories.insert(p.category.clone());
            if let Some(e) = &p.employment_type {
                employment_types.insert(e.clone());
            }
            if let Some(s) = &p.job_status {
                job_statuses.insert(s.clone());
            }
            lo = lo.min(p.avg_salary);
            hi = hi.max(p.avg_salary);
        }

        let salary_bounds = if table.is_empty() {
            (0.0, 0.0)
        } else {
            (lo.floor(), hi.ceil())
        };

        FilterOptions {
            categories: categories.into_iter().collect(),
            employment_types: employment_types.into_iter().collect(),
            job_statuses: job_statuses.into_iter().collect(),
            salary_bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(category: &str, employment: Option<&str>, status: &str, salary: f64) -> JobPosting {
        JobPosting {
            job_title: "Technician".into(),
            title: "Technician".into(),
            category: category.into(),
            categories: String::new(),
            position_levels: "Executive".into(),
            salary_type: "Monthly".into(),
            company: "ACME".into(),
            employment_type: employment.map(str::to_string),
            job_status: Some(status.into()),
            experience_years: None,
            salary_min: None,
            salary_max: None,
            average_salary: salary,
            avg_salary: salary,
            vacancies: None,
            applications: None,
            extra: Default::default(),
        }
    }

    fn sample_table() -> JobTable {
        JobTable {
            postings: vec![
                posting("IT", Some("Full Time"), "Open", 4000.0),
                posting("Finance", Some("Contract"), "Open", 6500.5),
                posting("IT", None, "Closed", 2500.0),
                posting("Sales", Some("Full Time"), "Re-open", 1800.0),
                posting("Finance", Some("Full Time"), "Closed", 9000.0),
            ],
            ..JobTable::default()
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn empty_selection_means_everything() {
        let table = sample_table();
        let all: Vec<usize> = (0..table.len()).collect();
        assert_eq!(filtered_indices(&table, &FilterSpec::default()), all);

        let options = FilterOptions::from_table(&table);
        assert_eq!(filtered_indices(&table, &FilterSpec::unrestricted(&options)), all);
    }

    #[test]
    fn conjunction_of_predicates() {
        let table = sample_table();
        let spec = FilterSpec {
            categories: set(&["IT", "Finance"]),
            employment_types: set(&["Full Time"]),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&table, &spec), vec![0, 4]);

        let spec = FilterSpec {
            job_statuses: set(&["Closed"]),
            salary_range: (2000.0, 5000.0),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&table, &spec), vec![2]);
    }

    #[test]
    fn null_employment_type_never_matches_a_selection() {
        let table = sample_table();
        let spec = FilterSpec {
            categories: set(&["IT"]),
            employment_types: set(&["Full Time", "Contract"]),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&table, &spec), vec![0]);
    }

    #[test]
    fn salary_bounds_are_inclusive() {
        let table = sample_table();
        let spec = FilterSpec {
            salary_range: (4000.0, 6500.5),
            ..FilterSpec::default()
        };
        assert_eq!(filtered_indices(&table, &spec), vec![0, 1]);
    }

    #[test]
    fn filtering_is_idempotent_and_subranges_compose() {
        let table = sample_table();
        let wide = FilterSpec {
            salary_range: (1000.0, 9000.0),
            ..FilterSpec::default()
        };
        let narrow = FilterSpec {
            salary_range: (2500.0, 6500.5),
            ..FilterSpec::default()
        };

        let wide_view = filtered_indices(&table, &wide);
        assert_eq!(refine_indices(&table, &wide_view, &wide), wide_view);
        assert_eq!(
            refine_indices(&table, &wide_view, &narrow),
            filtered_indices(&table, &narrow)
        );
    }

    #[test]
    fn options_are_sorted_and_bounds_cover_all_rows() {
        let table = sample_table();
        let options = FilterOptions::from_table(&table);
        assert_eq!(options.categories, vec!["Finance", "IT", "Sales"]);
        assert_eq!(options.employment_types, vec!["Contract", "Full Time"]);
        assert_eq!(options.job_statuses, vec!["Closed", "Open", "Re-open"]);
        assert_eq!(options.salary_bounds, (1800.0, 9000.0));

        assert_eq!(
            FilterOptions::from_table(&JobTable::default()).salary_bounds,
            (0.0, 0.0)
        );
    }
}
