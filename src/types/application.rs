// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::FieldErrors;
use crate::types::profile::JobSeekerProfile;
use crate::upload_validator::{Upload, UploadValidator};
use crate::utils::{de_opt_string_or_number, de_string_or_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Shortlisted => "Shortlisted",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "de_string_or_number")]
    pub job: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub applicant: Option<String>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub notes: Option<String>,
}

/// A pending application for one job.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub job_id: String,
    pub cover_letter: String,
    /// New résumé; without one the server falls back to the profile's
    pub resume: Option<Upload>,
}

impl ApplicationDraft {
    pub fn new(job_id: impl Into<String>, cover_letter: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            cover_letter: cover_letter.into(),
            resume: None,
        }
    }

    pub fn with_resume(mut self, resume: Upload) -> Self {
        self.resume = Some(resume);
        self
    }

    /// Checks run before anything is sent. Errors are keyed by form field,
    /// profile problems under `form`.
    pub fn validate(&self, profile: Option<&JobSeekerProfile>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        match profile {
            None => errors.insert("form", "Please complete your profile before applying"),
            Some(p) => {
                if !p.is_complete_for_application() {
                    errors.insert(
                        "form",
                        "Your profile is incomplete. Please complete all required fields and upload a resume.",
                    );
                }
            }
        }

        if self.cover_letter.trim().is_empty() {
            errors.insert("cover_letter", "Please write a cover letter");
        }

        if let Some(resume) = &self.resume {
            if let Err(e) = UploadValidator::validate(resume) {
                errors.insert("resume", e.message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
