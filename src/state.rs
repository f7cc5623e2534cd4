use jobscope::config::Settings;
use jobscope::data::filter::{filtered_indices, FilterOptions, FilterSpec};
use jobscope::data::model::JobTable;
use jobscope::data::stats::{
    category_stats, experience_salary_points, linear_fit, market_summary, sample_indices,
    top_categories, CategoryDemand, CategoryStats, LinearFit, MarketSummary,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which set-valued filter a widget edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    EmploymentType,
    JobStatus,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Cleaned table; never mutated after load.
    pub table: JobTable,

    /// Per-category stats over the whole table.
    pub category_stats: Vec<CategoryStats>,

    /// Values offered by the filter widgets.
    pub options: FilterOptions,

    /// Current filter selections.
    pub filter: FilterSpec,

    /// Indices of postings passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    pub summary: MarketSummary,
    pub demand: Vec<CategoryDemand>,

    /// Subset of `visible_indices` drawn in the scatter plot.
    pub sample_indices: Vec<usize>,
    pub trend: Option<LinearFit>,

    pub color_map: ColorMap,

    /// Status line shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: JobTable, settings: Settings, status_message: Option<String>) -> Self {
        let options = FilterOptions::from_table(&table);
        let mut state = Self {
            category_stats: category_stats(&table),
            filter: FilterSpec::unrestricted(&options),
            color_map: ColorMap::new(&options.categories),
            options,
            table,
            settings,
            visible_indices: Vec::new(),
            summary: MarketSummary::default(),
            demand: Vec::new(),
            sample_indices: Vec::new(),
            trend: None,
            status_message,
        };
        state.refilter();
        state
    }

    /// Recompute the view and everything derived from it.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.table, &self.filter);
        self.summary = market_summary(&self.table, &self.visible_indices);
        self.demand = top_categories(
            &self.table,
            &self.visible_indices,
            self.settings.top_categories,
        );
        self.sample_indices = sample_indices(
            &self.visible_indices,
            self.settings.scatter_sample_size,
            self.settings.sample_seed,
        );
        self.trend = linear_fit(&experience_salary_points(&self.table, &self.sample_indices));
    }

    pub fn selected(&self, field: FilterField) -> &std::collections::BTreeSet<String> {
        match field {
            FilterField::Category => &self.filter.categories,
            FilterField::EmploymentType => &self.filter.employment_types,
            FilterField::JobStatus => &self.filter.job_statuses,
        }
    }

    pub fn choices(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Category => &self.options.categories,
            FilterField::EmploymentType => &self.options.employment_types,
            FilterField::JobStatus => &self.options.job_statuses,
        }
    }

    fn selected_mut(&mut self, field: FilterField) -> &mut std::collections::BTreeSet<String> {
        match field {
            FilterField::Category => &mut self.filter.categories,
            FilterField::EmploymentType => &mut self.filter.employment_types,
            FilterField::JobStatus => &mut self.filter.job_statuses,
        }
    }

    /// Toggle a single value in a field's selection.
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &str) {
        let selected = self.selected_mut(field);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Drop a field's selection, i.e. show every value again.
    pub fn clear_field(&mut self, field: FilterField) {
        self.selected_mut(field).clear();
        self.refilter();
    }

    /// Set the salary window; bounds are swapped if given reversed and
    /// clamped to the table's salary span.
    pub fn set_salary_range(&mut self, lo: f64, hi: f64) {
        let (min, max) = self.options.salary_bounds;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.filter.salary_range = (lo.clamp(min, max), hi.clamp(min, max));
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.filter = FilterSpec::unrestricted(&self.options);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscope::data::model::JobPosting;

    fn posting(category: &str, salary: f64, experience: i64) -> JobPosting {
        JobPosting {
            job_title: "Nurse".into(),
            title: "Nurse".into(),
            category: category.into(),
            categories: String::new(),
            position_levels: "Executive".into(),
            salary_type: "Monthly".into(),
            company: "Clinic".into(),
            employment_type: Some("Full Time".into()),
            job_status: Some("Open".into()),
            experience_years: Some(experience),
            salary_min: None,
            salary_max: None,
            average_salary: salary,
            avg_salary: salary,
            vacancies: None,
            applications: None,
            extra: Default::default(),
        }
    }

    fn state() -> AppState {
        let table = JobTable {
            postings: vec![
                posting("Healthcare", 3000.0, 1),
                posting("Healthcare", 4000.0, 3),
                posting("IT", 6000.0, 5),
            ],
            ..JobTable::default()
        };
        AppState::new(table, Settings::default(), None)
    }

    #[test]
    fn starts_with_everything_visible() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.summary.active_jobs, 3);
        assert_eq!(s.demand[0].category, "Healthcare");
        assert!(s.trend.is_some());
    }

    #[test]
    fn toggling_and_clearing_a_field() {
        let mut s = state();
        s.toggle_filter_value(FilterField::Category, "IT");
        assert_eq!(s.visible_indices, vec![2]);
        s.toggle_filter_value(FilterField::Category, "IT");
        assert_eq!(s.visible_indices, vec![0, 1, 2]);

        s.toggle_filter_value(FilterField::Category, "Healthcare");
        s.clear_field(FilterField::Category);
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn salary_window_and_reset() {
        let mut s = state();
        s.set_salary_range(5000.0, 3500.0);
        assert_eq!(s.filter.salary_range, (3500.0, 5000.0));
        assert_eq!(s.visible_indices, vec![1]);
        assert!(s.trend.is_none());

        s.reset_filters();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn salary_window_at_the_bounds_keeps_every_row() {
        let table = JobTable {
            postings: vec![
                posting("Healthcare", 3012.4, 1),
                posting("IT", 6987.6, 5),
            ],
            ..JobTable::default()
        };
        let mut s = AppState::new(table, Settings::default(), None);
        assert_eq!(s.options.salary_bounds, (3012.0, 6988.0));

        s.set_salary_range(3012.0, 6988.0);
        assert_eq!(s.visible_indices, vec![0, 1]);

        s.set_salary_range(-1.0e9, 1.0e9);
        assert_eq!(s.filter.salary_range, (3012.0, 6988.0));
        assert_eq!(s.visible_indices, vec![0, 1]);
    }
}
