use std::collections::BTreeMap;
use std::fmt;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Column names of the raw export and of the cleaned schema.
pub mod col {
    // Raw names consumed by the cleaner.
    pub const TITLE: &str = "title";
    pub const CATEGORIES: &str = "categories";
    pub const POSITION_LEVELS: &str = "positionLevels";
    pub const SALARY_TYPE: &str = "salary_type";
    pub const COMPANY: &str = "postedCompany_name";
    pub const EMPLOYMENT_TYPES: &str = "employmentTypes";
    pub const MIN_YEARS_EXPERIENCE: &str = "minimumYearsExperience";
    pub const SALARY_MINIMUM: &str = "salary_minimum";
    pub const SALARY_MAXIMUM: &str = "salary_maximum";
    pub const JOB_STATUS_RAW: &str = "status_jobStatus";
    pub const AVERAGE_SALARY: &str = "average_salary";
    pub const VACANCIES: &str = "numberOfVacancies";
    pub const APPLICATIONS: &str = "metadata_totalNumberJobApplication";

    // Cleaned schema.
    pub const JOB_TITLE: &str = "job_title";
    pub const CATEGORY: &str = "category_list";
    pub const EMPLOYMENT_TYPE: &str = "employment_type";
    pub const EXPERIENCE_YEARS: &str = "experience_years";
    pub const SALARY_MIN: &str = "salary_min";
    pub const SALARY_MAX: &str = "salary_max";
    pub const JOB_STATUS: &str = "job_status";
    pub const AVG_SALARY: &str = "avg_salary";
}

/// Cleaned columns that are always present, in cache order.
pub const CLEANED_COLUMNS: [&str; 14] = [
    col::JOB_TITLE,
    col::TITLE,
    col::CATEGORY,
    col::CATEGORIES,
    col::POSITION_LEVELS,
    col::SALARY_TYPE,
    col::COMPANY,
    col::EMPLOYMENT_TYPE,
    col::JOB_STATUS,
    col::EXPERIENCE_YEARS,
    col::SALARY_MIN,
    col::SALARY_MAX,
    col::AVERAGE_SALARY,
    col::AVG_SALARY,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of an untyped table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV or Parquet reader
/// would infer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell. Text is parsed after trimming; anything
    /// that is not a finite number yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Textual view of the cell, `None` for null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(CellValue::Null, CellValue::String)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(CellValue::Null, CellValue::Float)
    }
}

impl From<Option<i64>> for CellValue {
    fn from(v: Option<i64>) -> Self {
        v.map_or(CellValue::Null, CellValue::Integer)
    }
}

// ---------------------------------------------------------------------------
// RawTable – what the loader hands over
// ---------------------------------------------------------------------------

pub type Row = BTreeMap<String, CellValue>;

/// An untyped table as read from disk: column order plus one map per row.
/// Columns absent from a row map read as null.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell lookup that treats a missing column like a null cell.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a CellValue {
    const NULL: &CellValue = &CellValue::Null;
    row.get(column).unwrap_or(NULL)
}

// ---------------------------------------------------------------------------
// JobPosting – one row of the cleaned table
// ---------------------------------------------------------------------------

/// One (posting, category) pair after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    /// Normalized title.
    pub job_title: String,
    /// Title as it appeared in the source.
    pub title: String,
    /// The single category this copy of the posting was exploded into.
    pub category: String,
    /// Serialized category list of the source posting.
    pub categories: String,
    pub position_levels: String,
    pub salary_type: String,
    pub company: String,
    pub employment_type: Option<String>,
    pub job_status: Option<String>,
    pub experience_years: Option<i64>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub average_salary: f64,
    pub avg_salary: f64,
    pub vacancies: Option<f64>,
    pub applications: Option<f64>,
    /// Pass-through columns, keyed by their cleaned-table name. Values are
    /// carried as text so every cache format reads them back unchanged.
    pub extra: BTreeMap<String, CellValue>,
}

impl JobPosting {
    /// Rebuild a posting from a row of a cached table.
    fn from_row(row_no: usize, row: &Row, extra_columns: &[String]) -> Result<Self, DataError> {
        let malformed = |message: String| DataError::MalformedCacheRow {
            row: row_no,
            message,
        };
        let text = |name: &str| {
            cell(row, name)
                .as_text()
                .ok_or_else(|| malformed(format!("'{name}' is null")))
        };
        let number = |name: &str| {
            cell(row, name)
                .as_f64()
                .ok_or_else(|| malformed(format!("'{name}' is not numeric")))
        };

        Ok(JobPosting {
            job_title: cell(row, col::JOB_TITLE).as_text().unwrap_or_default(),
            title: text(col::TITLE)?,
            category: text(col::CATEGORY)?,
            categories: text(col::CATEGORIES)?,
            position_levels: text(col::POSITION_LEVELS)?,
            salary_type: text(col::SALARY_TYPE)?,
            company: text(col::COMPANY)?,
            employment_type: cell(row, col::EMPLOYMENT_TYPE).as_text(),
            job_status: cell(row, col::JOB_STATUS).as_text(),
            experience_years: cell(row, col::EXPERIENCE_YEARS)
                .as_f64()
                .map(|v| v as i64),
            salary_min: cell(row, col::SALARY_MIN).as_f64(),
            salary_max: cell(row, col::SALARY_MAX).as_f64(),
            average_salary: number(col::AVERAGE_SALARY)?,
            avg_salary: number(col::AVG_SALARY)?,
            vacancies: cell(row, col::VACANCIES).as_f64(),
            applications: cell(row, col::APPLICATIONS).as_f64(),
            extra: extra_columns
                .iter()
                .map(|c| (c.clone(), cell(row, c).clone()))
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// JobTable – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned, category-exploded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTable {
    pub postings: Vec<JobPosting>,
    /// Pass-through column names in source order.
    pub extra_columns: Vec<String>,
    /// Whether the source carried a vacancy count column.
    pub has_vacancies: bool,
    /// Whether the source carried an application count column.
    pub has_applications: bool,
}

impl JobTable {
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Column names in the order the cache stores them.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = CLEANED_COLUMNS.iter().map(|c| c.to_string()).collect();
        if self.has_vacancies {
            names.push(col::VACANCIES.to_string());
        }
        if self.has_applications {
            names.push(col::APPLICATIONS.to_string());
        }
        names.extend(self.extra_columns.iter().cloned());
        names
    }

    /// Cells of one posting, aligned with [`JobTable::column_names`].
    pub fn cells(&self, p: &JobPosting) -> Vec<CellValue> {
        let mut cells = vec![
            CellValue::String(p.job_title.clone()),
            CellValue::String(p.title.clone()),
            CellValue::String(p.category.clone()),
            CellValue::String(p.categories.clone()),
            CellValue::String(p.position_levels.clone()),
            CellValue::String(p.salary_type.clone()),
            CellValue::String(p.company.clone()),
            p.employment_type.clone().into(),
            p.job_status.clone().into(),
            p.experience_years.into(),
            p.salary_min.into(),
            p.salary_max.into(),
            CellValue::Float(p.average_salary),
            CellValue::Float(p.avg_salary),
        ];
        if self.has_vacancies {
            cells.push(p.vacancies.into());
        }
        if self.has_applications {
            cells.push(p.applications.into());
        }
        for c in &self.extra_columns {
            cells.push(p.extra.get(c).cloned().unwrap_or(CellValue::Null));
        }
        cells
    }

    /// Rebuild a cleaned table from an untyped table previously produced by
    /// the cache writer.
    pub fn from_raw(raw: &RawTable) -> Result<Self, DataError> {
        for required in CLEANED_COLUMNS {
            if !raw.has_column(required) {
                return Err(DataError::MissingColumn(required.to_string()));
            }
        }
        let extra_columns: Vec<String> = raw
            .columns
            .iter()
            .filter(|c| {
                !CLEANED_COLUMNS.contains(&c.as_str())
                    && c.as_str() != col::VACANCIES
                    && c.as_str() != col::APPLICATIONS
            })
            .cloned()
            .collect();

        let postings = raw
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| JobPosting::from_row(i, row, &extra_columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JobTable {
            postings,
            extra_columns,
            has_vacancies: raw.has_column(col::VACANCIES),
            has_applications: raw.has_column(col::APPLICATIONS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_view_parses_text_and_rejects_garbage() {
        assert_eq!(CellValue::String(" 4500 ".into()).as_f64(), Some(4500.0));
        assert_eq!(CellValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::String("abc".into()).as_f64(), None);
        assert_eq!(CellValue::String("inf".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn text_view_formats_numbers() {
        assert_eq!(CellValue::Integer(12).as_text().as_deref(), Some("12"));
        assert_eq!(CellValue::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Null.as_text(), None);
    }

    #[test]
    fn from_raw_requires_cleaned_columns() {
        let raw = RawTable {
            columns: vec![col::TITLE.to_string()],
            rows: Vec::new(),
        };
        let err = JobTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == col::JOB_TITLE));
    }
}
