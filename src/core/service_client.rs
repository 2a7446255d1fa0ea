// src/core/service_client.rs
//! HTTP client for the job board REST API - jobs, applications and job seeker profiles

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::core::error::{FetchError, FieldErrors};
use crate::types::application::{ApplicationDraft, JobApplication};
use crate::types::job::Job;
use crate::types::profile::{JobSeekerProfile, ProfileForm};
use crate::types::response::{decode_list, error_message, TokenRefreshRequest, TokenRefreshResponse};
use crate::upload_validator::Upload;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

const JOBS_ENDPOINT: &str = "/jobs/jobs/";
const APPLICATIONS_ENDPOINT: &str = "/jobs/applications/";
const MY_APPLICATIONS_ENDPOINT: &str = "/jobs/applications/my_applications/";
const PROFILE_ENDPOINT: &str = "/profile/me/";
const PROFILE_CREATE_ENDPOINT: &str = "/profile/create/";
const TOKEN_REFRESH_ENDPOINT: &str = "/auth/token/refresh/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bearer credentials held by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Optional server-side narrowing for the job list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Whether `save_profile` created a new profile or updated the existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: RwLock<AuthTokens>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, FetchError> {
        let timeout = if timeout_seconds == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_seconds
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens: RwLock::new(AuthTokens::default()),
        })
    }

    pub fn with_tokens(self, tokens: AuthTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn tokens(&self) -> AuthTokens {
        self.tokens.read().await.clone()
    }

    pub async fn set_tokens(&self, tokens: AuthTokens) {
        *self.tokens.write().await = tokens;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // ===== Jobs =====

    pub async fn get_all_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, FetchError> {
        let url = self.url(JOBS_ENDPOINT);
        info!("Fetching jobs: {}", url);

        let response = self
            .send(|client| Ok(client.get(&url).query(query)))
            .await?;
        let body: Value = read_json(response).await?;
        let jobs: Vec<Job> = decode_list(body)?;

        info!("Fetched {} jobs", jobs.len());
        Ok(jobs)
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, FetchError> {
        self.get(&format!("{}{}/", JOBS_ENDPOINT, id)).await
    }

    // ===== Applications =====

    pub async fn get_my_applications(&self) -> Result<Vec<JobApplication>, FetchError> {
        let body: Value = self.get(MY_APPLICATIONS_ENDPOINT).await?;
        decode_list(body)
    }

    /// Submit an application. `profile` is the applicant's current profile, if any;
    /// nothing is sent when local validation fails.
    pub async fn apply_for_job(
        &self,
        draft: &ApplicationDraft,
        profile: Option<&JobSeekerProfile>,
    ) -> Result<JobApplication, FetchError> {
        if let Err(errors) = draft.validate(profile) {
            warn!("Application for job {} rejected locally: {}", draft.job_id, errors);
            return Err(FetchError::Validation(errors));
        }

        let url = self.url(APPLICATIONS_ENDPOINT);
        info!("Submitting application for job {}", draft.job_id);

        let response = self
            .send(|client| {
                let mut form = Form::new()
                    .text("job", draft.job_id.clone())
                    .text("cover_letter", draft.cover_letter.clone());
                if let Some(resume) = &draft.resume {
                    form = form.part("resume", file_part(resume)?);
                }
                Ok(client.post(&url).multipart(form))
            })
            .await?;

        read_json(response).await
    }

    // ===== Profile =====

    /// Current user's profile; `None` when none has been created yet
    pub async fn get_profile(&self) -> Result<Option<JobSeekerProfile>, FetchError> {
        let url = self.url(PROFILE_ENDPOINT);
        let response = self.send(|client| Ok(client.get(&url))).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No profile yet");
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    pub async fn create_profile(&self, form: &ProfileForm) -> Result<JobSeekerProfile, FetchError> {
        self.submit_profile(form, SaveOutcome::Created).await
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<JobSeekerProfile, FetchError> {
        self.submit_profile(form, SaveOutcome::Updated).await
    }

    /// Update the profile when one exists, create it otherwise
    pub async fn save_profile(
        &self,
        form: &ProfileForm,
    ) -> Result<(SaveOutcome, JobSeekerProfile), FetchError> {
        let outcome = match self.get_profile().await? {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Created,
        };
        let profile = self.submit_profile(form, outcome).await?;
        Ok((outcome, profile))
    }

    async fn submit_profile(
        &self,
        form: &ProfileForm,
        outcome: SaveOutcome,
    ) -> Result<JobSeekerProfile, FetchError> {
        if let Err(errors) = form.validate() {
            warn!("Profile submission rejected locally: {}", errors);
            return Err(FetchError::Validation(errors));
        }

        let (url, is_update) = match outcome {
            SaveOutcome::Created => (self.url(PROFILE_CREATE_ENDPOINT), false),
            SaveOutcome::Updated => (self.url(PROFILE_ENDPOINT), true),
        };
        info!(
            "Submitting profile ({} fields, {} files) to {}",
            form.text_fields().len(),
            form.uploads.len(),
            url
        );

        let response = self
            .send(|client| {
                let multipart = profile_form(form)?;
                let builder = if is_update {
                    client.put(&url)
                } else {
                    client.post(&url)
                };
                Ok(builder.multipart(multipart))
            })
            .await?;

        read_json(response).await
    }

    // ===== Auth =====

    /// Exchange the refresh token for a new access token
    pub async fn refresh_access_token(&self) -> Result<String, FetchError> {
        let refresh = self
            .tokens
            .read()
            .await
            .refresh
            .clone()
            .ok_or(FetchError::Unauthorized)?;

        let url = self.url(TOKEN_REFRESH_ENDPOINT);
        debug!("Refreshing access token");

        let response = self
            .client
            .post(&url)
            .json(&TokenRefreshRequest { refresh })
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Token refresh rejected with status {}", response.status());
            *self.tokens.write().await = AuthTokens::default();
            return Err(FetchError::Unauthorized);
        }

        let refreshed: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("token refresh: {}", e)))?;

        self.tokens.write().await.access = Some(refreshed.access.clone());
        info!("Access token refreshed");
        Ok(refreshed.access)
    }

    // ===== Generic helpers =====

    /// Generic GET request
    pub async fn get<R>(&self, endpoint: &str) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let response = self.send(|client| Ok(client.get(&url))).await?;
        read_json(response).await
    }

    /// Generic POST request with JSON
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, FetchError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);
        let response = self
            .send(|client| Ok(client.post(&url).json(payload)))
            .await?;
        read_json(response).await
    }

    /// Send a request with the bearer token, refreshing once on a 401.
    ///
    /// `build` is called again for the replay, so multipart bodies are rebuilt.
    async fn send<F>(&self, build: F) -> Result<Response, FetchError>
    where
        F: Fn(&reqwest::Client) -> Result<RequestBuilder, FetchError>,
    {
        let access = self.tokens.read().await.access.clone();
        let response = with_bearer(build(&self.client)?, access.as_deref())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        if self.tokens.read().await.refresh.is_none() {
            return Err(FetchError::Unauthorized);
        }

        let access = self.refresh_access_token().await?;
        let retried = with_bearer(build(&self.client)?, Some(&access))
            .send()
            .await?;

        if retried.status() == StatusCode::UNAUTHORIZED {
            error!("Request still unauthorized after token refresh");
            return Err(FetchError::Unauthorized);
        }
        Ok(retried)
    }
}

fn with_bearer(builder: RequestBuilder, access: Option<&str>) -> RequestBuilder {
    match access {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

fn file_part(upload: &Upload) -> Result<Part, FetchError> {
    Ok(Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)?)
}

fn profile_form(form: &ProfileForm) -> Result<Form, FetchError> {
    let mut multipart = Form::new();
    for (name, value) in form.text_fields() {
        multipart = multipart.text(name, value);
    }
    for upload in &form.uploads {
        multipart = multipart.part(upload.field.form_name(), file_part(upload)?);
    }
    Ok(multipart)
}

/// Decode a success body, or map the failure status to a [`FetchError`]
async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, FetchError> {
    let status = response.status();
    debug!("Response status: {}", status);

    if status.is_success() {
        let text = response.text().await?;
        return serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()));
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        StatusCode::BAD_REQUEST => {
            let errors = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| FieldErrors::from_response_body(&value));
            match errors {
                Some(errors) => {
                    warn!("Server rejected submission: {}", errors);
                    Err(FetchError::Validation(errors))
                }
                None => Err(FetchError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                }),
            }
        }
        _ => {
            error!("Service error response {}: {}", status, body);
            Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}
