// src/core/portal_client.rs
//! HTTP adapter for the portal backend. Injects the bearer credential
//! into every request and surfaces the backend's own error message
//! verbatim when a request is rejected.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::forms::{JobPayload, ProfileUpdate};
use crate::types::application::{Application, ApplicationStatus};
use crate::types::job::Job;
use crate::types::response::{ApiErrorBody, AuthResponse, MessageResponse};
use crate::types::user::{Experience, RegisterRequest, User};

const LOGIN_ENDPOINT: &str = "/login";
const REGISTER_ENDPOINT: &str = "/register";
const ME_ENDPOINT: &str = "/me";
const JOBS_ENDPOINT: &str = "/jobs";
const COORD_JOBS_ENDPOINT: &str = "/coord/jobs";
const APPLICATIONS_ENDPOINT: &str = "/applications";

/// Filters accepted by the jobs listing.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub search: Option<String>,
    pub tech: Option<String>,
    pub location: Option<String>,
    /// Also return postings whose deadline has passed.
    pub include_closed: bool,
}

impl JobQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("q", search.clone()));
        }
        if let Some(tech) = &self.tech {
            params.push(("tech", tech.clone()));
        }
        if let Some(location) = &self.location {
            params.push(("location", location.clone()));
        }
        if self.include_closed {
            params.push(("before_deadline", "false".to_string()));
        }
        params
    }
}

pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, endpoint: &str) -> (reqwest::RequestBuilder, String) {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut builder = self.client.request(method, &url);
        if let Some(token) = &self.token {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            );
        }
        (builder, url)
    }

    async fn execute<R>(builder: reqwest::RequestBuilder, url: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to reach portal at {}", url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status.is_success() {
            serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse portal response from {}", url))
        } else {
            let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            match parsed.message() {
                Some(message) => anyhow::bail!("{}", message),
                None => anyhow::bail!("Portal returned error {} for {}", status, url),
            }
        }
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        debug!("GET {}", endpoint);
        let (builder, url) = self.request(Method::GET, endpoint);
        Self::execute(builder, &url).await
    }

    async fn get_with_params<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<R> {
        debug!("GET {} {:?}", endpoint, params);
        let (builder, url) = self.request(Method::GET, endpoint);
        Self::execute(builder.query(params), &url).await
    }

    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("POST {}", endpoint);
        let (builder, url) = self.request(Method::POST, endpoint);
        Self::execute(builder.json(payload), &url).await
    }

    pub async fn put_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!("PUT {}", endpoint);
        let (builder, url) = self.request(Method::PUT, endpoint);
        Self::execute(builder.json(payload), &url).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        debug!("DELETE {}", endpoint);
        let (builder, url) = self.request(Method::DELETE, endpoint);
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to reach portal at {}", url))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::delete_outcome(status, &body, &url)
    }

    /// A successful delete needs no body; some backends answer 204.
    fn delete_outcome(status: reqwest::StatusCode, body: &str, url: &str) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
        match parsed.message() {
            Some(message) => anyhow::bail!("{}", message),
            None => anyhow::bail!("Portal returned error {} for {}", status, url),
        }
    }

    // ===== Session =====

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let payload = serde_json::json!({ "email": email, "password": password });
        self.post_json(LOGIN_ENDPOINT, &payload).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.post_json(REGISTER_ENDPOINT, request).await
    }

    pub async fn me(&self) -> Result<User> {
        self.get(ME_ENDPOINT).await
    }

    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User> {
        self.put_json(ME_ENDPOINT, update).await
    }

    // ===== Experience sub-resource =====

    pub async fn add_experience(&self, experience: &Experience) -> Result<MessageResponse> {
        self.post_json("/me/experience", experience).await
    }

    pub async fn update_experience(
        &self,
        index: usize,
        experience: &Experience,
    ) -> Result<MessageResponse> {
        self.put_json(&format!("/me/experience/{}", index), experience)
            .await
    }

    pub async fn delete_experience(&self, index: usize) -> Result<()> {
        self.delete(&format!("/me/experience/{}", index)).await
    }

    // ===== Jobs =====

    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>> {
        self.get_with_params(JOBS_ENDPOINT, &query.to_params()).await
    }

    /// Postings created by the signed-in coordinator.
    pub async fn coordinator_jobs(&self) -> Result<Vec<Job>> {
        self.get(COORD_JOBS_ENDPOINT).await
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.get(&format!("{}/{}", JOBS_ENDPOINT, job_id)).await
    }

    pub async fn create_job(&self, payload: &JobPayload) -> Result<Job> {
        self.post_json(JOBS_ENDPOINT, payload).await
    }

    pub async fn update_job(&self, job_id: &str, payload: &JobPayload) -> Result<Job> {
        self.put_json(&format!("{}/{}", JOBS_ENDPOINT, job_id), payload)
            .await
    }

    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.delete(&format!("{}/{}", JOBS_ENDPOINT, job_id)).await
    }

    // ===== Applications =====

    pub async fn apply(&self, job_id: &str) -> Result<Application> {
        let payload = serde_json::json!({ "job_id": job_id });
        self.post_json(APPLICATIONS_ENDPOINT, &payload).await
    }

    pub async fn my_applications(&self) -> Result<Vec<Application>> {
        self.get_with_params(APPLICATIONS_ENDPOINT, &[("user_id", "me".to_string())])
            .await
    }

    pub async fn job_applications(&self, job_id: &str) -> Result<Vec<Application>> {
        self.get(&format!("{}/{}/applications", JOBS_ENDPOINT, job_id))
            .await
    }

    pub async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<MessageResponse> {
        let mut payload = serde_json::json!({ "status": status });
        if let Some(notes) = notes {
            payload["notes"] = serde_json::Value::String(notes.to_string());
        }
        self.put_json(
            &format!("{}/{}/status", APPLICATIONS_ENDPOINT, application_id),
            &payload,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_query_params() {
        let query = JobQuery {
            search: Some("backend".to_string()),
            tech: None,
            location: Some("Pune".to_string()),
            include_closed: false,
        };
        assert_eq!(
            query.to_params(),
            vec![("q", "backend".to_string()), ("location", "Pune".to_string())]
        );

        // Only deviations from the backend defaults go on the wire
        assert!(JobQuery::default().to_params().is_empty());

        let all = JobQuery {
            include_closed: true,
            ..Default::default()
        };
        assert_eq!(all.to_params(), vec![("before_deadline", "false".to_string())]);
    }

    #[test]
    fn test_token_injection_state() {
        let mut client = PortalClient::new("http://localhost:5000".to_string(), 5).unwrap();
        assert!(!client.has_token());
        client.set_token(Some("tok".to_string()));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }

    #[test]
    fn test_delete_succeeds_without_a_body() {
        use reqwest::StatusCode;
        assert!(PortalClient::delete_outcome(StatusCode::NO_CONTENT, "", "u").is_ok());
        assert!(
            PortalClient::delete_outcome(StatusCode::OK, r#"{"message": "deleted"}"#, "u").is_ok()
        );
    }

    #[test]
    fn test_delete_surfaces_backend_error() {
        use reqwest::StatusCode;
        let err = PortalClient::delete_outcome(
            StatusCode::FORBIDDEN,
            r#"{"error": "Not your job posting"}"#,
            "u",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Not your job posting");

        let generic =
            PortalClient::delete_outcome(StatusCode::BAD_GATEWAY, "", "http://x/jobs/1")
                .unwrap_err();
        assert!(generic.to_string().contains("502"));
    }

    #[test]
    fn test_status_payload_shape() {
        let payload = serde_json::json!({ "status": ApplicationStatus::Shortlisted });
        assert_eq!(payload["status"], "Shortlisted");
    }
}
