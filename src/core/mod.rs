// src/core/mod.rs
//! Core services: configuration, credential persistence and the portal
//! HTTP adapter

pub mod config_manager;
pub mod credential_store;
pub mod portal_client;

pub use config_manager::ConfigManager;
pub use credential_store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredential,
};
pub use portal_client::{JobQuery, PortalClient};
