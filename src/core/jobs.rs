// JobBoard - core/jobs.rs
//
// Job listing model and the search engine over it.
// All active filters are AND-combined; sorting is stable so listings that
// compare equal keep catalogue order.
// Core layer: pure logic, no I/O.

use crate::util::constants::{DEFAULT_AVATAR_GRADIENT, JUST_POSTED_LABEL, SALARY_UNIT};
use crate::util::error::JobError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

// =============================================================================
// Listing
// =============================================================================

/// A single job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub location: String,

    /// Work arrangement: "Remote", "On-site" or "Hybrid".
    #[serde(rename = "type")]
    pub work_type: String,

    pub category: String,

    #[serde(default)]
    pub employment_type: String,

    /// Display range such as "$120k - $150k".
    #[serde(default)]
    pub salary: String,

    /// Relative age label such as "2 days ago" or "Just now".
    #[serde(default)]
    pub posted: String,

    pub description: String,

    #[serde(default)]
    pub full_description: String,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[serde(default)]
    pub benefits: Vec<String>,

    #[serde(default)]
    pub avatar: String,

    #[serde(default)]
    pub avatar_gradient: String,
}

impl Job {
    /// Lower bound of the salary range in currency units, if parseable.
    pub fn salary_floor(&self) -> Option<u64> {
        parse_salary_floor(&self.salary)
    }

    /// Age of the listing in minutes, if the `posted` label is understood.
    pub fn posted_age_minutes(&self) -> Option<u64> {
        parse_posted_age_minutes(&self.posted)
    }
}

/// Leading figure of a salary range times `SALARY_UNIT`.
///
/// Only the part before the first `-` is considered and every non-digit is
/// dropped, so "$120k - $150k" gives 120_000.
pub fn parse_salary_floor(salary: &str) -> Option<u64> {
    let low = salary.split('-').next().unwrap_or("");
    let digits: String = low.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .ok()
        .map(|n| n.saturating_mul(SALARY_UNIT))
}

/// Minutes represented by a relative `posted` label.
pub fn parse_posted_age_minutes(posted: &str) -> Option<u64> {
    static AGE_RE: OnceLock<Option<Regex>> = OnceLock::new();

    let label = posted.trim().to_lowercase();
    if label == JUST_POSTED_LABEL.to_lowercase() || label == "today" {
        return Some(0);
    }
    if label == "yesterday" {
        return Some(24 * 60);
    }

    let re = AGE_RE
        .get_or_init(|| Regex::new(r"^(\d+)\s*(minute|min|hour|hr|day|week|month)s?\b").ok())
        .as_ref()?;
    let caps = re.captures(&label)?;
    let n: u64 = caps[1].parse().ok()?;
    let unit = match &caps[2] {
        "minute" | "min" => 1,
        "hour" | "hr" => 60,
        "day" => 60 * 24,
        "week" => 60 * 24 * 7,
        "month" => 60 * 24 * 30,
        _ => return None,
    };
    Some(n.saturating_mul(unit))
}

// =============================================================================
// Query
// =============================================================================

/// Result ordering for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalogue order.
    #[default]
    Relevant,
    /// Newest first.
    Recent,
    /// Highest salary floor first.
    SalaryHigh,
    /// Lowest salary floor first.
    SalaryLow,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevant" => Ok(SortOrder::Relevant),
            "recent" => Ok(SortOrder::Recent),
            "salary-high" => Ok(SortOrder::SalaryHigh),
            "salary-low" => Ok(SortOrder::SalaryLow),
            other => Err(format!(
                "unknown sort '{other}' (expected relevant, recent, salary-high or salary-low)"
            )),
        }
    }
}

/// Complete search state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    /// Categories to include (empty = all).
    pub categories: Vec<String>,

    /// Employment types to include (empty = all).
    pub employment_types: Vec<String>,

    /// Exact work arrangement. None = any.
    pub work_type: Option<String>,

    /// Case-insensitive substring of title or company. Empty = no filter.
    pub search_job: String,

    /// Case-insensitive substring of location. Empty = no filter.
    pub search_location: String,

    pub sort: SortOrder,
}

/// Apply `query` to `jobs`, returning the matching listings in result order.
///
/// Selected categories or employment types that no listing carries are
/// dropped before filtering; a selection made only of such values
/// therefore filters nothing.
pub fn search<'a>(jobs: &'a [Job], query: &JobQuery) -> Vec<&'a Job> {
    let categories: Vec<&str> = query
        .categories
        .iter()
        .map(String::as_str)
        .filter(|c| jobs.iter().any(|j| j.category == *c))
        .collect();
    let employment: Vec<&str> = query
        .employment_types
        .iter()
        .map(String::as_str)
        .filter(|e| jobs.iter().any(|j| j.employment_type == *e))
        .collect();
    let search_job = query.search_job.trim().to_lowercase();
    let search_location = query.search_location.trim().to_lowercase();

    let mut matched: Vec<&Job> = jobs
        .iter()
        .filter(|job| {
            (categories.is_empty() || categories.contains(&job.category.as_str()))
                && (employment.is_empty() || employment.contains(&job.employment_type.as_str()))
                && query
                    .work_type
                    .as_deref()
                    .map_or(true, |t| job.work_type == t)
                && (search_job.is_empty()
                    || job.title.to_lowercase().contains(&search_job)
                    || job.company.to_lowercase().contains(&search_job))
                && (search_location.is_empty()
                    || job.location.to_lowercase().contains(&search_location))
        })
        .collect();

    match query.sort {
        SortOrder::Relevant => {}
        SortOrder::Recent => {
            matched.sort_by(|a, b| none_last(a.posted_age_minutes(), b.posted_age_minutes()))
        }
        SortOrder::SalaryLow => {
            matched.sort_by(|a, b| none_last(a.salary_floor(), b.salary_floor()))
        }
        SortOrder::SalaryHigh => {
            matched.sort_by(|a, b| none_last_desc(a.salary_floor(), b.salary_floor()))
        }
    }

    matched
}

/// Ascending order with unknown values after every known one.
fn none_last(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending order with unknown values after every known one.
fn none_last_desc(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        _ => none_last(a, b),
    }
}

// =============================================================================
// Posting
// =============================================================================

/// Employer-supplied fields of a new listing.
///
/// `requirements` and `benefits` are free text, one item per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_type: String,
    pub category: String,
    pub employment_type: String,
    pub salary: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
}

impl NewJob {
    /// Check required fields, reporting the first empty one.
    pub fn validate(&self) -> Result<(), JobError> {
        let required: [(&'static str, &str); 6] = [
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("type", &self.work_type),
            ("category", &self.category),
            ("description", &self.description),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(JobError::MissingField { field: *field }),
            None => Ok(()),
        }
    }

    /// Build the listing under `id`. Validates first.
    pub fn into_job(self, id: u64) -> Result<Job, JobError> {
        self.validate()?;
        let avatar = self
            .company
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default();
        Ok(Job {
            id,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            work_type: self.work_type.trim().to_string(),
            category: self.category.trim().to_string(),
            employment_type: self.employment_type.trim().to_string(),
            salary: self.salary.trim().to_string(),
            posted: JUST_POSTED_LABEL.to_string(),
            full_description: self.description.clone(),
            description: self.description,
            requirements: split_lines(&self.requirements),
            benefits: split_lines(&self.benefits),
            avatar,
            avatar_gradient: DEFAULT_AVATAR_GRADIENT.to_string(),
        })
    }
}

/// Non-blank lines of `text`, trimmed.
fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
