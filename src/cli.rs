// src/cli.rs
use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::{ApiClient, ConfigManager, FetchError, SaveOutcome};
use crate::filter::facet_counts;
use crate::listing::RemoteJobListing;
use crate::page::{BrowsePage, LoadState};
use crate::types::application::ApplicationDraft;
use crate::types::category::all_tags;
use crate::types::job::{Job, JobType};
use crate::types::profile::{JobSeekerProfile, ProfileForm};
use crate::upload_validator::{Upload, UploadField};

#[derive(Parser)]
#[command(name = "amica")]
#[command(about = "Browse healthcare jobs, manage your profile and apply")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List job postings, filtered locally
    Jobs {
        /// Free text matched against title, company and description
        #[arg(long)]
        search: Option<String>,
        /// Job type code
        #[arg(long, value_parser = PossibleValuesParser::new(JobType::ALL.map(|t| t.code())))]
        job_type: Option<String>,
        /// Substring of the job location
        #[arg(long)]
        location: Option<String>,
        /// Minimum salary
        #[arg(long)]
        min_salary: Option<String>,
        /// Export the visible jobs to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show one job posting
    Job { id: String },
    /// Browse medical specialty categories
    Categories {
        #[arg(long)]
        search: Option<String>,
        /// Keep categories carrying any of these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show or save your job seeker profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Apply for a job
    Apply {
        job_id: String,
        #[arg(long)]
        cover_letter: String,
        /// Résumé to send instead of the one stored on your profile
        #[arg(long)]
        resume: Option<PathBuf>,
    },
    /// List your applications
    Applications,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Create the profile, or update it when one exists
    Save(ProfileArgs),
}

/// Fields left out keep their current value
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date_of_birth: Option<String>,
    #[arg(long)]
    pub profession: Option<String>,
    #[arg(long)]
    pub experience_years: Option<String>,
    #[arg(long)]
    pub education: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long)]
    pub picture: Option<PathBuf>,
    #[arg(long)]
    pub resume: Option<PathBuf>,
    #[arg(long)]
    pub certifications: Option<PathBuf>,
}

impl ProfileArgs {
    /// Overlay the given values onto `form`
    pub fn apply_to(&self, form: &mut ProfileForm) {
        let fields = [
            (&self.first_name, &mut form.first_name),
            (&self.last_name, &mut form.last_name),
            (&self.phone, &mut form.phone),
            (&self.address, &mut form.address),
            (&self.date_of_birth, &mut form.date_of_birth),
            (&self.profession, &mut form.profession),
            (&self.experience_years, &mut form.experience_years),
            (&self.education, &mut form.education),
            (&self.skills, &mut form.skills),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }

    fn files(&self) -> Vec<(UploadField, &Path)> {
        [
            (UploadField::ProfilePicture, &self.picture),
            (UploadField::Resume, &self.resume),
            (UploadField::Certifications, &self.certifications),
        ]
        .into_iter()
        .filter_map(|(field, path)| path.as_deref().map(|p| (field, p)))
        .collect()
    }
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let client = Arc::new(config.api_client()?);

    match cli.command {
        Command::Jobs {
            search,
            job_type,
            location,
            min_salary,
            csv,
        } => {
            let mut page = BrowsePage::jobs();
            page.load_with(&RemoteJobListing::new(client)).await;

            let controller = page.controller_mut();
            if let Some(term) = search {
                controller.set_search_term(term);
            }
            if let Some(code) = job_type {
                controller.toggle_facet_value("job_type", &code);
            }
            controller.set_facet_input("location", location.as_deref().unwrap_or_default());
            controller.set_facet_input("salary", min_salary.as_deref().unwrap_or_default());

            if let LoadState::Failed(_) = page.load_state() {
                let banner = page.banner().unwrap_or_default();
                error!("{}", banner);
                anyhow::bail!(banner);
            }
            if let Some(banner) = page.banner() {
                println!("{}", banner);
                return Ok(());
            }

            let visible = page.visible();
            if !visible.is_empty() {
                println!(
                    "{:<6} {:<32} {:<24} {:<20} {:<12} {:>10}",
                    "ID", "Title", "Company", "Location", "Type", "Salary"
                );
                println!("{}", "-".repeat(109));
            }
            for job in &visible {
                println!(
                    "{:<6} {:<32} {:<24} {:<20} {:<12} {:>10}",
                    job.id,
                    truncate(&job.title, 32),
                    truncate(&job.company, 24),
                    truncate(job.location.as_deref().unwrap_or("N/A"), 20),
                    job.job_type_label(),
                    job.salary_display()
                );
            }
            println!("{}", page.summary());

            if let Some(path) = csv {
                let written = export_jobs_csv(&path, &visible)?;
                println!("✓ Exported {} jobs to {}", written, path.display());
            }
        }

        Command::Job { id } => {
            let job = client.get_job(&id).await?;
            print_job(&job);
        }

        Command::Categories { search, tags } => {
            let mut page = BrowsePage::categories();
            page.load_with(&config.category_listing()?).await;

            let known = all_tags(page.records());
            for tag in tags.iter().filter(|t| !known.contains(t)) {
                println!("⚠️  No category is tagged '{}'", tag);
            }

            let controller = page.controller_mut();
            if let Some(term) = search {
                controller.set_search_term(term);
            }
            for tag in &tags {
                controller.toggle_facet_value("tags", tag);
            }

            for category in page.visible() {
                println!("{:<20} {}", category.name, category.desc);
                println!("{:<20} [{}]", "", category.tags.join(", "));
            }
            println!("{}", page.summary());

            let counts = facet_counts(page.records(), page.controller().state(), "tags");
            if !counts.is_empty() {
                println!("\nTags:");
                for count in counts {
                    println!("  {} ({})", count.value, count.count);
                }
            }
        }

        Command::Profile { action } => match action {
            ProfileCommand::Show => match client.get_profile().await? {
                Some(profile) => print_profile(&profile),
                None => println!("No profile yet. Create one with `amica profile save`."),
            },
            ProfileCommand::Save(args) => save_profile(&client, &args).await?,
        },

        Command::Apply {
            job_id,
            cover_letter,
            resume,
        } => {
            let profile = client.get_profile().await?;
            let mut draft = ApplicationDraft::new(job_id, cover_letter);
            if let Some(path) = resume {
                draft = draft.with_resume(Upload::from_path(UploadField::Resume, &path).await?);
            }

            match client.apply_for_job(&draft, profile.as_ref()).await {
                Ok(application) => {
                    println!("✅ Application submitted successfully!");
                    println!("   Application ID: {}", application.id);
                    println!("   Status: {}", application.status.label());
                }
                Err(e) => return Err(report(e)),
            }
        }

        Command::Applications => {
            let applications = client.get_my_applications().await?;
            if applications.is_empty() {
                println!("You have not applied to any jobs yet.");
            }
            for application in applications {
                println!(
                    "{:<6} {:<32} {:<12} {}",
                    application.id,
                    truncate(application.job_title.as_deref().unwrap_or(&application.job), 32),
                    application.status.label(),
                    application
                        .applied_at
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

async fn save_profile(client: &ApiClient, args: &ProfileArgs) -> Result<()> {
    let existing = client.get_profile().await?;
    let mut form = existing
        .as_ref()
        .map(ProfileForm::from_profile)
        .unwrap_or_default();
    args.apply_to(&mut form);

    for (field, path) in args.files() {
        form.attach(Upload::from_path(field, path).await?);
    }
    if let Some(preview) = form
        .upload(UploadField::ProfilePicture)
        .and_then(Upload::preview_data_url)
    {
        info!("Profile picture preview: {} bytes", preview.len());
    }

    match client.save_profile(&form).await {
        Ok((SaveOutcome::Created, profile)) => {
            println!("✅ Profile created for {}", profile.full_name());
        }
        Ok((SaveOutcome::Updated, profile)) => {
            println!("✅ Profile updated for {}", profile.full_name());
        }
        Err(e) => return Err(report(e)),
    }
    Ok(())
}

/// Print per-field problems, then hand the error back for the exit status
fn report(e: FetchError) -> anyhow::Error {
    if let Some(errors) = e.field_errors() {
        println!("❌ Please fix the following:");
        for (field, message) in errors.iter() {
            println!("   {}: {}", field, message);
        }
    } else {
        error!("Request failed: {}", e);
    }
    e.into()
}

fn print_job(job: &Job) {
    println!("{}", job.title);
    println!("  Company:  {}", job.company);
    println!("  Location: {}", job.location.as_deref().unwrap_or("N/A"));
    println!("  Type:     {}", job.job_type_label());
    println!("  Salary:   {}", job.salary_display());
    if let Some(deadline) = job.application_deadline {
        println!("  Apply by: {}", deadline.format("%Y-%m-%d"));
    }
    if !job.description.is_empty() {
        println!("\n{}", job.description);
    }
    if let Some(requirements) = job.requirements.as_deref().filter(|r| !r.is_empty()) {
        println!("\nRequirements:\n{}", requirements);
    }
}

fn print_profile(profile: &JobSeekerProfile) {
    println!("{}", profile.full_name());
    println!("  Profession: {}", profile.profession.as_deref().unwrap_or("N/A"));
    println!("  Phone:      {}", profile.phone.as_deref().unwrap_or("N/A"));
    if let Some(years) = profile.experience_years {
        println!("  Experience: {} years", years);
    }
    let skills = profile.skill_list();
    if !skills.is_empty() {
        println!("  Skills:     {}", skills.join(", "));
    }
    println!("  Resume:     {}", if profile.has_resume() { "uploaded" } else { "missing" });
    if !profile.is_complete_for_application() {
        println!("⚠️  Profile incomplete: name, profession and a resume are needed to apply");
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[derive(Debug, Serialize)]
struct JobRow<'a> {
    id: &'a str,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    job_type: &'a str,
    salary: &'a str,
}

/// Write `jobs` as CSV with a header row; returns the number of rows written
pub fn export_jobs_csv(path: &Path, jobs: &[&Job]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for job in jobs {
        writer.serialize(JobRow {
            id: &job.id,
            title: &job.title,
            company: &job.company,
            location: job.location.as_deref().unwrap_or_default(),
            job_type: job.job_type.as_deref().unwrap_or_default(),
            salary: job.salary.as_deref().unwrap_or_default(),
        })?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    info!("Exported {} jobs to {}", jobs.len(), path.display());
    Ok(jobs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_manager::ServiceConfig;
    use crate::environment::EnvironmentConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status: u16, body: &'static str) -> ConfigManager {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let reply = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        ConfigManager {
            environment: EnvironmentConfig::default(),
            service: ServiceConfig {
                api_base_url: format!("http://{}/api", addr),
                timeout_seconds: 5,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_jobs_load_failure_is_an_error() {
        let config = serve_once(500, r#"{"detail": "database down"}"#).await;
        let cli = Cli::try_parse_from(["amica", "jobs"]).unwrap();

        let err = handle_command(cli, config).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load jobs: Server returned 500: database down"
        );
    }

    #[tokio::test]
    async fn test_jobs_empty_listing_is_ok() {
        let config = serve_once(200, r#"{"count": 0, "results": []}"#).await;
        let cli = Cli::try_parse_from(["amica", "jobs"]).unwrap();
        assert!(handle_command(cli, config).await.is_ok());
    }

    #[test]
    fn test_job_type_values_follow_known_codes() {
        for job_type in JobType::ALL {
            assert!(Cli::try_parse_from(["amica", "jobs", "--job-type", job_type.code()]).is_ok());
        }
        assert!(Cli::try_parse_from(["amica", "jobs", "--job-type", "per_diem"]).is_err());
    }

    #[test]
    fn test_parse_jobs_command() {
        let cli = Cli::try_parse_from([
            "amica",
            "jobs",
            "--search",
            "nurse",
            "--job-type",
            "full_time",
            "--min-salary",
            "50000",
        ])
        .unwrap();
        match cli.command {
            Command::Jobs {
                search,
                job_type,
                min_salary,
                location,
                csv,
            } => {
                assert_eq!(search.as_deref(), Some("nurse"));
                assert_eq!(job_type.as_deref(), Some("full_time"));
                assert_eq!(min_salary.as_deref(), Some("50000"));
                assert!(location.is_none() && csv.is_none());
            }
            _ => panic!("expected jobs command"),
        }
    }

    #[test]
    fn test_parse_repeated_tags() {
        let cli = Cli::try_parse_from(["amica", "categories", "--tag", "Surgery", "--tag", "Clinic"])
            .unwrap();
        match cli.command {
            Command::Categories { tags, .. } => assert_eq!(tags, vec!["Surgery", "Clinic"]),
            _ => panic!("expected categories command"),
        }
    }

    #[test]
    fn test_profile_args_overlay() {
        let mut form = ProfileForm {
            first_name: "Ada".into(),
            phone: "555".into(),
            ..Default::default()
        };
        let args = ProfileArgs {
            phone: Some("556".into()),
            skills: Some("triage, ICU".into()),
            ..Default::default()
        };
        args.apply_to(&mut form);
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.phone, "556");
        assert_eq!(form.skills, "triage, ICU");
    }

    #[test]
    fn test_export_jobs_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let jobs = [
            Job::new("1", "Nurse, ICU", "St. Mary").with_salary("60000.00"),
            Job::new("2", "Doctor", "City Clinic").with_location("Boston"),
        ];
        let refs: Vec<&Job> = jobs.iter().collect();

        assert_eq!(export_jobs_csv(&path, &refs).unwrap(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("id,title,company,location,job_type,salary"));
        assert_eq!(lines.next(), Some("1,\"Nurse, ICU\",St. Mary,,,60000.00"));
        assert_eq!(lines.next(), Some("2,Doctor,City Clinic,Boston,,"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Nurse", 10), "Nurse");
        assert_eq!(truncate("Registered Nurse", 6), "Regis…");
    }
}
