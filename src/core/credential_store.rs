// src/core/credential_store.rs
//! Persisted client state: the auth credential and the role preference,
//! read at startup and written on login/logout. The trait keeps the
//! persistence seam narrow so it can be faked in tests.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::types::user::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Opaque bearer token issued by the backend. None after logout.
    pub token: Option<String>,
    #[serde(default)]
    pub role_preference: Option<Role>,
}

impl StoredCredential {
    pub fn signed_in(token: String, role_preference: Option<Role>) -> Self {
        Self {
            token: Some(token),
            role_preference,
        }
    }

    pub fn signed_out(role_preference: Option<Role>) -> Self {
        Self {
            token: None,
            role_preference,
        }
    }
}

pub trait CredentialStore {
    fn get(&self) -> Result<Option<StoredCredential>>;
    fn set(&self, credential: &StoredCredential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON file in the user config directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<StoredCredential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        // A corrupt session file reads as no credential at all
        Ok(serde_json::from_str(&content).ok())
    }

    fn set(&self, credential: &StoredCredential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(credential)
            .context("Failed to serialize credential")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: StoredCredential) -> Self {
        Self {
            inner: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<StoredCredential>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Credential store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set(&self, credential: &StoredCredential) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Credential store lock poisoned"))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Credential store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
