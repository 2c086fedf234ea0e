// src/coach/mod.rs
//! Client for the resume-coach service: PDF analysis plus follow-up
//! chat carrying the prior analysis as context.

pub mod gaps;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::types::response::ApiErrorBody;
use gaps::{normalize_gaps, SkillGaps};

const ANALYZE_ENDPOINT: &str = "/api/resume/analyze";
const CHAT_ENDPOINT: &str = "/api/resume/chat";

const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub headline: Option<String>,
    #[serde(default)]
    pub core_strengths: Vec<String>,
    #[serde(default)]
    pub skill_gaps: SkillGaps,
    #[serde(default)]
    pub priority_learning_path: Vec<LearningStep>,
    #[serde(default)]
    pub project_ideas: Vec<ProjectIdea>,
    #[serde(default)]
    pub role_fit: Vec<RoleFit>,
    #[serde(default)]
    pub next_30_days: Vec<PlanItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStep {
    pub topic: String,
    pub why_it_matters: Option<String>,
    #[serde(default)]
    pub starter_resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectIdea {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleFit {
    pub role: String,
    pub fit_reason: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub task: String,
    pub measure_of_success: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    analysis: ResumeAnalysis,
    #[serde(default)]
    resume_snippet: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Everything the chat endpoint needs to continue a conversation.
/// Persisted between invocations so `coach chat` can follow an earlier
/// `coach analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachContext {
    pub analysis: ResumeAnalysis,
    pub resume_snippet: String,
}

pub fn save_context(path: &Path, context: &CoachContext) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let content =
        serde_json::to_string_pretty(context).context("Failed to serialize analysis")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write analysis file: {}", path.display()))
}

pub fn load_context(path: &Path) -> Result<CoachContext> {
    if !path.exists() {
        anyhow::bail!("No analysis on file. Run `placementctl coach analyze <resume.pdf>` first");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse analysis file: {}", path.display()))
}

pub struct CoachClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoachClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Upload a PDF resume with an optional target role and job
    /// description. The returned gap buckets are already normalized.
    pub async fn analyze(
        &self,
        file_path: &Path,
        target_role: &str,
        job_description: &str,
    ) -> Result<CoachContext> {
        validate_resume_file(file_path)?;

        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        let file_content = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
        if file_content.len() as u64 > MAX_PDF_BYTES {
            anyhow::bail!("PDF is too large (max 10MB)");
        }

        let form = Form::new()
            .part(
                "file",
                Part::bytes(file_content)
                    .file_name(file_name)
                    .mime_str("application/pdf")
                    .context("Failed to create multipart")?,
            )
            .text("target_role", target_role.to_string())
            .text("job_description", job_description.to_string());

        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);
        info!("Calling resume analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to call resume analysis service")?;
        let mut parsed: AnalyzeResponse = Self::read_response(response, "analysis").await?;

        parsed.analysis.skill_gaps = normalize_gaps(parsed.analysis.skill_gaps);
        Ok(CoachContext {
            analysis: parsed.analysis,
            resume_snippet: parsed.resume_snippet,
        })
    }

    /// Follow-up question against an earlier analysis.
    pub async fn chat(&self, message: &str, context: &CoachContext) -> Result<String> {
        let payload = serde_json::json!({
            "message": message,
            "analysis": context.analysis,
            "resume_snippet": context.resume_snippet,
        });

        let url = format!("{}{}", self.base_url, CHAT_ENDPOINT);
        info!("Calling resume chat service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to call resume chat service")?;
        let parsed: ChatResponse = Self::read_response(response, "chat").await?;
        Ok(parsed.reply)
    }

    async fn read_response<R>(response: reqwest::Response, action: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status.is_success() {
            serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse {} response", action))
        } else {
            let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            match parsed.message() {
                Some(message) => anyhow::bail!("{}", message),
                None => anyhow::bail!("Coach service returned error {} for {}", status, action),
            }
        }
    }
}

fn validate_resume_file(path: &Path) -> Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        anyhow::bail!("Only PDF files are supported: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rejects_non_pdf_before_any_io() {
        assert!(validate_resume_file(&PathBuf::from("resume.docx")).is_err());
        assert!(validate_resume_file(&PathBuf::from("resume")).is_err());
        assert!(validate_resume_file(&PathBuf::from("resume.pdf")).is_ok());
        assert!(validate_resume_file(&PathBuf::from("resume.PDF")).is_ok());
    }

    #[test]
    fn test_context_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("last_analysis.json");

        let context = CoachContext {
            analysis: ResumeAnalysis {
                headline: Some("Solid backend fundamentals".to_string()),
                core_strengths: vec!["Rust".to_string()],
                ..Default::default()
            },
            resume_snippet: "…".to_string(),
        };
        save_context(&path, &context).unwrap();

        let loaded = load_context(&path).unwrap();
        assert_eq!(loaded.analysis.headline, context.analysis.headline);
        assert_eq!(loaded.resume_snippet, context.resume_snippet);
    }

    #[test]
    fn test_missing_context_points_at_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_context(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("coach analyze"));
    }

    #[test]
    fn test_analysis_tolerates_sparse_service_output() {
        let analysis: ResumeAnalysis = serde_json::from_str(
            r#"{"headline": "x", "skill_gaps": {"soft_skills": ["git basics"]}}"#,
        )
        .unwrap();
        assert!(analysis.core_strengths.is_empty());
        assert!(analysis.role_fit.is_empty());
        assert_eq!(analysis.skill_gaps.soft_skills, vec!["git basics"]);
    }
}
