// src/types/job.rs
//! Job postings as served by `/jobs/jobs/`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{FacetValue, Record};
use crate::utils::{
    de_opt_string_or_number, de_string_or_number, display_code, format_usd, parse_amount,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    /// Decimal as sent by the server; may be missing or malformed
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub salary: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub total_applications: Option<u32>,
}

fn default_active() -> bool {
    true
}

impl Job {
    /// Minimal job, mostly for fixtures and static listings
    pub fn new(id: impl Into<String>, title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            description: String::new(),
            requirements: None,
            location: None,
            job_type: None,
            salary: None,
            is_active: true,
            created_by: None,
            created_at: None,
            updated_at: None,
            application_deadline: None,
            total_applications: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    /// Salary as a number, `None` when missing or not a plain number
    pub fn salary_amount(&self) -> Option<f64> {
        self.salary.as_deref().and_then(parse_amount)
    }

    pub fn salary_display(&self) -> String {
        format_salary(self.salary.as_deref())
    }

    pub fn job_type_label(&self) -> String {
        match self.job_type.as_deref() {
            Some(code) if !code.is_empty() => JobType::from_code(code)
                .map(|t| t.label().to_uppercase())
                .unwrap_or_else(|| display_code(code)),
            _ => "N/A".to_string(),
        }
    }
}

impl Record for Job {
    fn id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.company, &self.description]
    }

    fn facet(&self, facet: &str) -> Option<FacetValue<'_>> {
        match facet {
            "job_type" => self.job_type.as_deref().map(FacetValue::Text),
            "location" => self.location.as_deref().map(FacetValue::Text),
            "salary" | "min_salary" => self.salary_amount().map(FacetValue::Number),
            _ => None,
        }
    }
}

/// Known job types offered by the job-type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
    Remote,
}

impl JobType {
    pub const ALL: [JobType; 6] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Temporary,
        JobType::Internship,
        JobType::Remote,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Temporary => "temporary",
            Self::Internship => "internship",
            Self::Remote => "remote",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Temporary => "Temporary",
            Self::Internship => "Internship",
            Self::Remote => "Remote",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// `"Not specified"` unless the raw salary is a plain number
pub fn format_salary(raw: Option<&str>) -> String {
    match raw.and_then(parse_amount) {
        Some(amount) => format_usd(amount),
        None => "Not specified".to_string(),
    }
}
