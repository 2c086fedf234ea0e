// src/session.rs
//! The session context: current identity, role and the authenticated
//! portal client, backed by the persisted credential.

use anyhow::Result;
use tracing::{info, warn};

use crate::core::credential_store::{CredentialStore, StoredCredential};
use crate::core::portal_client::PortalClient;
use crate::types::response::AuthResponse;
use crate::types::user::{RegisterRequest, Role, User};

pub struct Session<S: CredentialStore> {
    store: S,
    client: PortalClient,
    user: Option<User>,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S, client: PortalClient) -> Self {
        Self {
            store,
            client,
            user: None,
        }
    }

    /// Resolve identity from the persisted credential. A credential the
    /// backend rejects is cleared and the session stays anonymous; with
    /// no stored token, no request is made at all.
    pub async fn resolve(&mut self) -> Result<()> {
        let Some(credential) = self.store.get()? else {
            return Ok(());
        };
        let Some(token) = credential.token else {
            return Ok(());
        };

        self.client.set_token(Some(token));
        match self.client.me().await {
            Ok(user) => {
                self.user = Some(user);
            }
            Err(err) => {
                warn!("Stored credential rejected, clearing it: {}", err);
                self.store
                    .set(&StoredCredential::signed_out(credential.role_preference))?;
                self.client.set_token(None);
            }
        }
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let response = self.client.login(email, password).await?;
        self.adopt(response)
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> Result<()> {
        let response = self.client.register(request).await?;
        self.adopt(response)
    }

    fn adopt(&mut self, response: AuthResponse) -> Result<()> {
        let AuthResponse { access_token, user } = response;
        self.store.set(&StoredCredential::signed_in(
            access_token.clone(),
            Some(user.role),
        ))?;
        self.client.set_token(Some(access_token));
        info!("Signed in as {} ({})", user.email, user.role);
        self.user = Some(user);
        Ok(())
    }

    /// Drop the credential but keep the role preference for next time.
    pub fn logout(&mut self) -> Result<()> {
        let role_preference = self.store.get()?.and_then(|c| c.role_preference);
        match role_preference {
            Some(_) => self
                .store
                .set(&StoredCredential::signed_out(role_preference))?,
            None => self.store.clear()?,
        }
        self.client.set_token(None);
        self.user = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credential_store::MemoryCredentialStore;

    fn offline_client() -> PortalClient {
        // Never dialed in these tests
        PortalClient::new("http://127.0.0.1:1".to_string(), 1).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_without_credential_stays_anonymous() {
        let store = MemoryCredentialStore::default();
        let mut session = Session::new(store, offline_client());

        // No stored token means no backend request, so an unreachable
        // portal must not matter here
        session.resolve().await.unwrap();
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
        assert!(!session.client().has_token());
    }

    #[tokio::test]
    async fn test_resolve_with_signed_out_credential_stays_anonymous() {
        let store = MemoryCredentialStore::with_credential(StoredCredential::signed_out(Some(
            Role::Coordinator,
        )));
        let mut session = Session::new(store, offline_client());

        session.resolve().await.unwrap();
        assert!(!session.is_authenticated());
        assert!(!session.client().has_token());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_untouched() {
        let store = MemoryCredentialStore::default();
        let mut session = Session::new(store, offline_client());

        assert!(session.login("a@b.edu", "pw").await.is_err());
        assert!(!session.is_authenticated());
        assert!(!session.client().has_token());
        // Nothing was persisted on the failure path
        assert!(session.store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_prior_credential() {
        let credential = StoredCredential::signed_out(Some(Role::Coordinator));
        let store = MemoryCredentialStore::with_credential(credential.clone());
        let mut session = Session::new(store, offline_client());

        assert!(session.login("a@b.edu", "pw").await.is_err());
        assert_eq!(session.store.get().unwrap(), Some(credential));
    }

    #[tokio::test]
    async fn test_logout_keeps_role_preference() {
        let store = MemoryCredentialStore::with_credential(StoredCredential::signed_in(
            "tok".to_string(),
            Some(Role::Student),
        ));
        let mut session = Session::new(store, offline_client());

        session.logout().unwrap();
        assert!(!session.is_authenticated());

        let remaining = session.store.get().unwrap().unwrap();
        assert!(remaining.token.is_none());
        assert_eq!(remaining.role_preference, Some(Role::Student));
    }

    #[tokio::test]
    async fn test_logout_without_preference_clears_store() {
        let store = MemoryCredentialStore::with_credential(StoredCredential::signed_in(
            "tok".to_string(),
            None,
        ));
        let mut session = Session::new(store, offline_client());

        session.logout().unwrap();
        assert!(session.store.get().unwrap().is_none());
    }
}
