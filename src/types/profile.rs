// src/types/profile.rs
//! Job seeker profile as stored remotely, and the editable form that produces it

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::FieldErrors;
use crate::upload_validator::{Upload, UploadField, UploadValidator};
use crate::utils::{de_opt_string_or_number, non_blank};

/// Professions offered by the profile form
pub const PROFESSIONS: [&str; 18] = [
    "Doctor",
    "Nurse",
    "Dentist",
    "Pharmacist",
    "Physiotherapist",
    "Medical Technician",
    "Healthcare Administrator",
    "Medical Researcher",
    "Dental Assistant",
    "Medical Assistant",
    "Surgeon",
    "Pediatrician",
    "Cardiologist",
    "Neurologist",
    "Radiologist",
    "Psychiatrist",
    "Anesthesiologist",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobSeekerProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_required_details(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && non_blank(self.profession.as_deref()).is_some()
    }

    pub fn has_resume(&self) -> bool {
        non_blank(self.resume.as_deref()).is_some()
    }

    /// Name, profession and a stored résumé are required before applying
    pub fn is_complete_for_application(&self) -> bool {
        self.has_required_details() && self.has_resume()
    }

    /// Skills are stored comma-separated
    pub fn skill_list(&self) -> Vec<&str> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Editable profile form. Text fields hold raw input exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: String,
    pub profession: String,
    pub experience_years: String,
    pub education: String,
    pub skills: String,
    pub uploads: Vec<Upload>,
}

impl ProfileForm {
    /// Pre-fill from an existing profile; stored files are not re-sent
    pub fn from_profile(profile: &JobSeekerProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone: profile.phone.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            profession: profile.profession.clone().unwrap_or_default(),
            experience_years: profile
                .experience_years
                .map(|y| y.to_string())
                .unwrap_or_default(),
            education: profile.education.clone().unwrap_or_default(),
            skills: profile.skills.clone().unwrap_or_default(),
            uploads: Vec::new(),
        }
    }

    /// Attach a file, replacing any earlier file for the same field
    pub fn attach(&mut self, upload: Upload) {
        self.uploads.retain(|u| u.field != upload.field);
        self.uploads.push(upload);
    }

    pub fn upload(&self, field: UploadField) -> Option<&Upload> {
        self.uploads.iter().find(|u| u.field == field)
    }

    /// Validate every field, returning all problems at once
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, value, label) in [
            ("first_name", &self.first_name, "First name"),
            ("last_name", &self.last_name, "Last name"),
            ("phone", &self.phone, "Phone number"),
        ] {
            if value.trim().is_empty() {
                errors.insert(field, format!("{} is required", label));
            }
        }

        let profession = self.profession.trim();
        if !profession.is_empty() && !PROFESSIONS.contains(&profession) {
            errors.insert("profession", "Select a profession from the list");
        }

        if !self.date_of_birth.trim().is_empty()
            && NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d").is_err()
        {
            errors.insert("date_of_birth", "Enter a valid date (YYYY-MM-DD)");
        }

        if !self.experience_years.trim().is_empty()
            && self.experience_years.trim().parse::<u32>().is_err()
        {
            errors.insert("experience_years", "Enter a whole number of years");
        }

        for upload in &self.uploads {
            if let Err(e) = UploadValidator::validate(upload) {
                errors.insert(upload.field.form_name(), e.message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Non-empty text fields in submission order
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("date_of_birth", &self.date_of_birth),
            ("profession", &self.profession),
            ("experience_years", &self.experience_years),
            ("education", &self.education),
            ("skills", &self.skills),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name, value.clone()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ProfileForm {
        ProfileForm {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            phone: "+234 800 000".into(),
            profession: "Nurse".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let errors = ProfileForm::default().validate().unwrap_err();
        assert_eq!(errors.get("first_name"), Some("First name is required"));
        assert!(errors.get("last_name").is_some());
        assert!(errors.get("phone").is_some());
        assert!(errors.get("address").is_none());
        assert!(filled_form().validate().is_ok());
    }

    #[test]
    fn test_numeric_and_date_fields() {
        let mut form = filled_form();
        form.experience_years = "five".into();
        form.date_of_birth = "01/02/1990".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.get("experience_years").is_some());
        assert!(errors.get("date_of_birth").is_some());

        form.experience_years = "5".into();
        form.date_of_birth = "1990-02-01".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_profession_must_be_listed() {
        let mut form = filled_form();
        form.profession = "Astronaut".into();
        assert!(form.validate().unwrap_err().get("profession").is_some());

        form.profession = "Physiotherapist".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_text_fields_skip_empty() {
        let fields = filled_form().text_fields();
        let names: Vec<_> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["first_name", "last_name", "phone", "profession"]);
    }

    #[test]
    fn test_attach_replaces_same_field() {
        let mut form = filled_form();
        form.attach(Upload::new(UploadField::Resume, "a.pdf", b"%PDF-1".to_vec()));
        form.attach(Upload::new(UploadField::Resume, "b.pdf", b"%PDF-1".to_vec()));
        assert_eq!(form.uploads.len(), 1);
        assert_eq!(
            form.upload(UploadField::Resume).map(|u| u.file_name.as_str()),
            Some("b.pdf")
        );
    }

    #[test]
    fn test_profile_completeness() {
        let mut profile: JobSeekerProfile = serde_json::from_str(
            r#"{"id": 3, "first_name": "Ada", "last_name": "Obi", "profession": "Nurse", "skills": "triage, ICU ,"}"#,
        )
        .unwrap();
        assert!(!profile.is_complete_for_application());
        assert_eq!(profile.skill_list(), vec!["triage", "ICU"]);

        profile.resume = Some("/media/job_seekers/resumes/ada.pdf".into());
        assert!(profile.is_complete_for_application());
        assert_eq!(profile.full_name(), "Ada Obi");
    }

    #[test]
    fn test_form_from_profile() {
        let profile: JobSeekerProfile = serde_json::from_str(
            r#"{"first_name": "Ada", "last_name": "Obi", "experience_years": 4, "date_of_birth": "1990-02-01"}"#,
        )
        .unwrap();
        let form = ProfileForm::from_profile(&profile);
        assert_eq!(form.experience_years, "4");
        assert_eq!(form.date_of_birth, "1990-02-01");
        assert!(form.uploads.is_empty());
    }
}
