use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::model::{cell, col, CellValue, JobPosting, JobTable, RawTable, Row, CLEANED_COLUMNS};

// ---------------------------------------------------------------------------
// Cleaning constants
// ---------------------------------------------------------------------------

/// Export bookkeeping columns that carry no analytical value.
pub const DROP_COLUMNS: [&str; 9] = [
    "metadata_expiryDate",
    "metadata_isPostedOnBehalf",
    "metadata_jobPostId",
    "metadata_newPostingDate",
    "metadata_originalPostingDate",
    "metadata_repostCount",
    "metadata_totalNumberOfView",
    "status_id",
    "occupationId",
];

/// A posting without any of these is not a usable business record.
pub const MANDATORY_COLUMNS: [&str; 5] = [
    col::CATEGORIES,
    col::POSITION_LEVELS,
    col::SALARY_TYPE,
    col::TITLE,
    col::COMPANY,
];

/// Raw columns the cleaner maps onto typed fields; everything else that
/// survives pruning passes through.
const CONSUMED_COLUMNS: [&str; 13] = [
    col::TITLE,
    col::CATEGORIES,
    col::POSITION_LEVELS,
    col::SALARY_TYPE,
    col::COMPANY,
    col::EMPLOYMENT_TYPES,
    col::MIN_YEARS_EXPERIENCE,
    col::SALARY_MINIMUM,
    col::SALARY_MAXIMUM,
    col::JOB_STATUS_RAW,
    col::AVERAGE_SALARY,
    col::VACANCIES,
    col::APPLICATIONS,
];

/// Appended to a pass-through column whose name is taken by the cleaned
/// schema.
pub const RENAMED_SUFFIX: &str = "_raw";

pub const MIN_AVERAGE_SALARY: f64 = 500.0;
pub const MAX_AVERAGE_SALARY: f64 = 50_000.0;
/// Postings asking for more experience than this are treated as typos.
/// Postings without a parseable experience figure are kept.
pub const MAX_EXPERIENCE_YEARS: i64 = 40;

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());
static URGENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\burgent\b").unwrap());
static ALLOWANCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\ballowances?\b").unwrap());
static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$\s?\d+(?:,\d+)*(?:\.\d+)?k?").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Row counts per cleaning outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub raw_rows: usize,
    pub missing_mandatory: usize,
    pub salary_out_of_range: usize,
    pub experience_out_of_range: usize,
    /// Category field present but not a list of `{"category": ..}` objects.
    pub unparseable_categories: usize,
    /// Category field parsed to an empty list.
    pub empty_categories: usize,
    pub output_rows: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Turn the raw export into the cleaned, category-exploded table.
///
/// Output rows keep the relative order of their source rows; the copies of
/// one posting follow the order of its category list.
pub fn clean(mut raw: RawTable) -> (JobTable, CleanReport) {
    let mut report = CleanReport {
        raw_rows: raw.len(),
        ..CleanReport::default()
    };

    prune_columns(&mut raw);
    let has_vacancies = raw.has_column(col::VACANCIES);
    let has_applications = raw.has_column(col::APPLICATIONS);
    let pass_through = pass_through_columns(&raw.columns);

    let mut postings = Vec::with_capacity(raw.len());
    for row in &raw.rows {
        if !has_mandatory_fields(row) {
            report.missing_mandatory += 1;
            continue;
        }
        let Some(average_salary) = sane_average_salary(row) else {
            report.salary_out_of_range += 1;
            continue;
        };
        let experience_years = extract_first_integer(cell(row, col::MIN_YEARS_EXPERIENCE));
        if experience_years.is_some_and(|years| years > MAX_EXPERIENCE_YEARS) {
            report.experience_out_of_range += 1;
            continue;
        }

        let raw_categories = cell(row, col::CATEGORIES).as_text().unwrap_or_default();
        let categories = match try_parse_categories(&raw_categories) {
            Ok(categories) => categories,
            Err(e) => {
                log::debug!("Unparseable categories {raw_categories:?}: {e}");
                report.unparseable_categories += 1;
                continue;
            }
        };
        if categories.is_empty() {
            report.empty_categories += 1;
            continue;
        }

        let title = cell(row, col::TITLE).as_text().unwrap_or_default();
        let template = JobPosting {
            job_title: clean_title(&title),
            title,
            category: String::new(),
            categories: raw_categories,
            position_levels: cell(row, col::POSITION_LEVELS).as_text().unwrap_or_default(),
            salary_type: cell(row, col::SALARY_TYPE).as_text().unwrap_or_default(),
            company: cell(row, col::COMPANY).as_text().unwrap_or_default(),
            employment_type: cell(row, col::EMPLOYMENT_TYPES).as_text(),
            job_status: cell(row, col::JOB_STATUS_RAW).as_text(),
            experience_years,
            salary_min: cell(row, col::SALARY_MINIMUM).as_f64(),
            salary_max: cell(row, col::SALARY_MAXIMUM).as_f64(),
            average_salary,
            avg_salary: average_salary,
            vacancies: cell(row, col::VACANCIES).as_f64(),
            applications: cell(row, col::APPLICATIONS).as_f64(),
            extra: pass_through
                .iter()
                .map(|(name, source)| {
                    (name.clone(), CellValue::from(cell(row, source).as_text()))
                })
                .collect(),
        };

        for category in categories {
            postings.push(JobPosting {
                category,
                ..template.clone()
            });
        }
    }

    report.output_rows = postings.len();
    log::info!(
        "Cleaned {} raw rows into {} rows (missing fields: {}, salary out of range: {}, \
         experience out of range: {}, bad categories: {}, no categories: {})",
        report.raw_rows,
        report.output_rows,
        report.missing_mandatory,
        report.salary_out_of_range,
        report.experience_out_of_range,
        report.unparseable_categories,
        report.empty_categories,
    );

    let table = JobTable {
        postings,
        extra_columns: pass_through.into_iter().map(|(name, _)| name).collect(),
        has_vacancies,
        has_applications,
    };
    (table, report)
}

/// Remove the bookkeeping columns; absent ones are ignored.
pub fn prune_columns(raw: &mut RawTable) {
    raw.columns.retain(|c| !DROP_COLUMNS.contains(&c.as_str()));
    for row in &mut raw.rows {
        row.retain(|k, _| !DROP_COLUMNS.contains(&k.as_str()));
    }
}

/// `(output name, source name)` for every column the cleaner does not
/// consume, in source order. A name already used by the cleaned schema, or
/// by an earlier pass-through column, gets [`RENAMED_SUFFIX`] appended until
/// it is unique.
fn pass_through_columns(columns: &[String]) -> Vec<(String, String)> {
    let sources: Vec<&String> = columns
        .iter()
        .filter(|c| !CONSUMED_COLUMNS.contains(&c.as_str()))
        .collect();

    let mut taken: Vec<String> = CLEANED_COLUMNS
        .iter()
        .chain(&[col::VACANCIES, col::APPLICATIONS])
        .map(|c| c.to_string())
        .collect();
    let mut out = Vec::with_capacity(sources.len());
    for &source in &sources {
        let mut name = source.clone();
        while taken.contains(&name) || (&name != source && sources.contains(&&name)) {
            name.push_str(RENAMED_SUFFIX);
        }
        if &name != source {
            log::warn!("Pass-through column '{source}' renamed to '{name}'");
        }
        taken.push(name.clone());
        out.push((name, source.clone()));
    }
    out
}

fn has_mandatory_fields(row: &Row) -> bool {
    MANDATORY_COLUMNS.iter().all(|c| !cell(row, c).is_null())
}

/// Numeric average salary when it lies in the accepted band.
fn sane_average_salary(row: &Row) -> Option<f64> {
    cell(row, col::AVERAGE_SALARY)
        .as_f64()
        .filter(|v| (MIN_AVERAGE_SALARY..=MAX_AVERAGE_SALARY).contains(v))
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CategoryTag {
    category: String,
}

fn try_parse_categories(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let tags: Vec<CategoryTag> = serde_json::from_str(&raw.replace("''", "'"))?;
    Ok(tags
        .into_iter()
        .map(|t| t.category)
        .filter(|c| !c.trim().is_empty())
        .collect())
}

/// Parse a serialized list like `[{"id":1,"category":"IT"}]` into its
/// category names. Blank names are skipped; anything malformed yields an
/// empty list.
pub fn parse_categories(raw: &str) -> Vec<String> {
    try_parse_categories(raw).unwrap_or_default()
}

/// Strip bracketed asides, urgency markers, allowance mentions and salary
/// figures from a job title, then tidy the whitespace.
///
/// The passes run until nothing changes, so the result is a fixed point:
/// `clean_title(&clean_title(t)) == clean_title(t)`.
pub fn clean_title(title: &str) -> String {
    let mut current = title.to_string();
    loop {
        let next = clean_title_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_title_once(title: &str) -> String {
    let t = BRACKETED.replace_all(title, "");
    let t = URGENT.replace_all(&t, "");
    let t = ALLOWANCE.replace_all(&t, "");
    let t = CURRENCY.replace_all(&t, "");
    let t = MULTI_SPACE.replace_all(&t, " ");
    t.trim().to_string()
}

/// First run of digits in the cell's text, e.g. `"3 years"` → 3.
/// Null cells and texts without digits yield `None`.
pub fn extract_first_integer(value: &CellValue) -> Option<i64> {
    let text = value.as_text()?;
    FIRST_INTEGER.find(&text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::String(v.to_string())))
            .collect()
    }

    fn posting_row(title: &str, categories: &str, salary: &str) -> Row {
        raw_row(&[
            (col::TITLE, title),
            (col::CATEGORIES, categories),
            (col::POSITION_LEVELS, "Executive"),
            (col::SALARY_TYPE, "Monthly"),
            (col::COMPANY, "ACME PTE LTD"),
            (col::EMPLOYMENT_TYPES, "Full Time"),
            (col::JOB_STATUS_RAW, "Open"),
            (col::AVERAGE_SALARY, salary),
        ])
    }

    fn table_of(rows: Vec<Row>) -> RawTable {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for k in row.keys() {
                if !columns.contains(k) {
                    columns.push(k.clone());
                }
            }
        }
        RawTable { columns, rows }
    }

    #[test]
    fn clean_title_strips_noise() {
        assert_eq!(clean_title("Chef (URGENT) $3000 allowance"), "Chef");
        assert_eq!(clean_title("Urgent!! Sales Executive $4,500.50k"), "!! Sales Executive");
        assert_eq!(clean_title("  Admin   Assistant (West)  "), "Admin Assistant");
        assert_eq!(clean_title("Driver with Allowances"), "Driver with");
        assert_eq!(clean_title(""), "");
    }

    #[test]
    fn clean_title_leaves_words_containing_markers() {
        assert_eq!(clean_title("Urgently Hiring Urgentist"), "Urgently Hiring Urgentist");
    }

    #[test]
    fn clean_title_is_idempotent() {
        let samples = [
            "Chef (URGENT) $3000 allowance",
            "$ urgent 300 Cook",
            "ur(x)gent Nurse ((Night)) shift)",
            "Barista  $5k + allowances (Orchard)",
            "\tData   Engineer\n",
        ];
        for s in samples {
            let once = clean_title(s);
            assert_eq!(clean_title(&once), once, "input {s:?}");
        }
        assert_eq!(clean_title("$ urgent 300 Cook"), "Cook");
    }

    #[test]
    fn experience_takes_first_integer() {
        assert_eq!(extract_first_integer(&CellValue::String("5 years exp".into())), Some(5));
        assert_eq!(extract_first_integer(&CellValue::String("N/A".into())), None);
        assert_eq!(extract_first_integer(&CellValue::String("3-5".into())), Some(3));
        assert_eq!(extract_first_integer(&CellValue::Integer(12)), Some(12));
        assert_eq!(extract_first_integer(&CellValue::Null), None);
    }

    #[test]
    fn categories_parse_or_fall_back_to_empty() {
        assert_eq!(
            parse_categories(r#"[{"id":21,"category":"IT"},{"category":"Finance"}]"#),
            vec!["IT", "Finance"]
        );
        assert_eq!(
            parse_categories(r#"[{"category":"Dentist''s Office"}]"#),
            vec!["Dentist's Office"]
        );
        assert!(parse_categories("not json").is_empty());
        assert!(parse_categories(r#"[{"name":"IT"}]"#).is_empty());
        assert!(parse_categories("[]").is_empty());
        assert_eq!(
            parse_categories(r#"[{"category":""},{"category":"F&B"},{"category":"  "}]"#),
            vec!["F&B"]
        );
    }

    #[test]
    fn blank_category_names_never_become_rows() {
        let raw = table_of(vec![
            posting_row("Cook", r#"[{"category":""},{"category":"F&B"}]"#, "2100"),
            posting_row("Cook", r#"[{"category":""}]"#, "2100"),
        ]);
        let (table, report) = clean(raw);
        let categories: Vec<&str> = table.postings.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(categories, vec!["F&B"]);
        assert_eq!(report.empty_categories, 1);
    }

    #[test]
    fn end_to_end_three_rows() {
        let it_finance = r#"[{"category":"IT"},{"category":"Finance"}]"#;
        let mut no_title = posting_row("x", it_finance, "4000");
        no_title.insert(col::TITLE.to_string(), CellValue::Null);
        let raw = table_of(vec![
            posting_row("Analyst", it_finance, "4000"),
            posting_row("Analyst", it_finance, "100"),
            no_title,
        ]);

        let (table, report) = clean(raw);
        assert_eq!(table.len(), 2);
        let categories: Vec<&str> = table.postings.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(categories, vec!["IT", "Finance"]);
        assert!(table.postings.iter().all(|p| p.avg_salary == 4000.0));
        assert_eq!(report.missing_mandatory, 1);
        assert_eq!(report.salary_out_of_range, 1);
        assert_eq!(report.output_rows, 2);
    }

    #[test]
    fn explosion_count_matches_parsed_categories() {
        let lists = [
            r#"[{"category":"IT"}]"#,
            r#"[{"category":"IT"},{"category":"Finance"},{"category":"Sales"}]"#,
            r#"[{"category":"IT"},{"category":"IT"}]"#,
            "garbage",
            "[]",
        ];
        let raw = table_of(lists.iter().map(|l| posting_row("Clerk", l, "2500")).collect());
        let (table, report) = clean(raw);

        let expected: usize = lists.iter().map(|l| parse_categories(l).len()).sum();
        assert_eq!(table.len(), expected);
        assert_eq!(report.unparseable_categories, 1);
        assert_eq!(report.empty_categories, 1);
        for p in &table.postings {
            assert!(parse_categories(&p.categories).contains(&p.category));
        }
    }

    #[test]
    fn sanity_filters_and_invariants() {
        let cats = r#"[{"category":"Logistics"}]"#;
        let mut rows = vec![
            posting_row("A", cats, "499.99"),
            posting_row("B", cats, "500"),
            posting_row("C", cats, "50000"),
            posting_row("D", cats, "50000.01"),
            posting_row("E", cats, "about 3k"),
        ];
        let mut veteran = posting_row("F", cats, "9000");
        veteran.insert(col::MIN_YEARS_EXPERIENCE.to_string(), CellValue::String("41".into()));
        rows.push(veteran);
        let mut unknown_exp = posting_row("G", cats, "9000");
        unknown_exp.insert(col::MIN_YEARS_EXPERIENCE.to_string(), CellValue::String("N/A".into()));
        rows.push(unknown_exp);

        let (table, report) = clean(table_of(rows));
        let titles: Vec<&str> = table.postings.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "G"]);
        assert_eq!(report.salary_out_of_range, 3);
        assert_eq!(report.experience_out_of_range, 1);
        for p in &table.postings {
            assert!((MIN_AVERAGE_SALARY..=MAX_AVERAGE_SALARY).contains(&p.average_salary));
            assert_eq!(p.avg_salary, p.average_salary);
            assert!(p.experience_years.map_or(true, |y| y >= 0));
        }
    }

    #[test]
    fn prunes_metadata_and_keeps_extras() {
        let mut row = posting_row("Cook", r#"[{"category":"F&B"}]"#, "2100");
        row.insert("metadata_jobPostId".into(), CellValue::String("MCF-1".into()));
        row.insert("district".into(), CellValue::String("Jurong".into()));
        row.insert(col::SALARY_MINIMUM.into(), CellValue::String("1800".into()));
        row.insert(col::SALARY_MAXIMUM.into(), CellValue::String("n/a".into()));
        let (table, _) = clean(table_of(vec![row]));

        assert_eq!(table.extra_columns, vec!["district"]);
        let p = &table.postings[0];
        assert_eq!(p.extra["district"], CellValue::String("Jurong".into()));
        assert_eq!(p.salary_min, Some(1800.0));
        assert_eq!(p.salary_max, None);
        assert_eq!(p.employment_type.as_deref(), Some("Full Time"));
        assert_eq!(p.job_status.as_deref(), Some("Open"));
        assert!(!table.has_vacancies);
        assert!(!table.has_applications);
    }

    #[test]
    fn pass_through_names_never_shadow_the_cleaned_schema() {
        let mut row = posting_row("Chef", r#"[{"category":"F&B"}]"#, "3000");
        row.insert(col::JOB_TITLE.into(), CellValue::String("RAWTITLE".into()));
        row.insert("job_title_raw".into(), CellValue::String("other".into()));
        row.insert("floor".into(), CellValue::Integer(3));
        let raw = RawTable {
            columns: [col::TITLE, col::CATEGORIES, col::POSITION_LEVELS, col::SALARY_TYPE]
                .into_iter()
                .chain([col::COMPANY, col::AVERAGE_SALARY, col::JOB_TITLE])
                .chain(["job_title_raw", "floor"])
                .map(str::to_string)
                .collect(),
            rows: vec![row],
        };
        let (table, _) = clean(raw);

        assert_eq!(
            table.extra_columns,
            vec!["job_title_raw_raw", "job_title_raw", "floor"]
        );
        let p = &table.postings[0];
        assert_eq!(p.job_title, "Chef");
        assert_eq!(p.extra["job_title_raw_raw"], CellValue::String("RAWTITLE".into()));
        assert_eq!(p.extra["job_title_raw"], CellValue::String("other".into()));
        assert_eq!(p.extra["floor"], CellValue::String("3".into()));

        let names = table.column_names();
        for name in &names {
            assert_eq!(names.iter().filter(|n| *n == name).count(), 1, "{name}");
        }
    }
}
