// src/core/config_manager.rs
//! Unified configuration: defaults, then the optional config file in
//! the user config directory, then environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_PORTAL_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Base URL of the portal REST backend.
    pub portal_url: String,
    /// Base URL of the resume-coach service.
    pub coach_url: String,
    pub timeout_seconds: u64,
    /// Where the auth credential and role preference live.
    pub session_path: PathBuf,
    /// Where the last resume analysis is kept for follow-up chat.
    pub analysis_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    portal_url: Option<String>,
    coach_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let config_dir = Self::config_dir()?;
        let file = Self::load_file(&config_dir.join("config.toml"))?;

        let portal_url = std::env::var("PLACEMENT_API_URL")
            .ok()
            .or(file.portal_url)
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
        // The coach rides on the portal host unless pointed elsewhere
        let coach_url = std::env::var("RESUME_COACH_URL")
            .ok()
            .or(file.coach_url)
            .unwrap_or_else(|| portal_url.clone());
        let session_path = std::env::var("PLACEMENT_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir.join("session.json"));

        debug!("Portal API: {}", portal_url);
        debug!("Coach service: {}", coach_url);

        let analysis_path = Self::analysis_path_for(&session_path, &config_dir);

        Ok(Self {
            portal_url,
            coach_url,
            timeout_seconds: file.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
            session_path,
            analysis_path,
        })
    }

    /// The last analysis lives next to the session file, so relocating
    /// the session via the environment moves both.
    fn analysis_path_for(session_path: &Path, config_dir: &Path) -> PathBuf {
        session_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(config_dir)
            .join("last_analysis.json")
    }

    fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("placementctl"))
            .context("Could not determine the user config directory")
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
