// src/types/response.rs
//! Response envelopes returned by the portal backend

use serde::{Deserialize, Serialize};

use crate::types::user::User;

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body shape used across the backend: `{"error": .., "code": ..}`
/// for the portal, `{"detail": ..}` for the coach service.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// The backend's own message, surfaced verbatim when present.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().or(self.detail.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_error_field() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error": "Application deadline has passed", "code": "ERR_DEADLINE"}"#,
        )
        .unwrap();
        assert_eq!(body.message(), Some("Application deadline has passed"));
        assert_eq!(body.code.as_deref(), Some("ERR_DEADLINE"));
    }

    #[test]
    fn test_error_body_falls_back_to_detail() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"detail": "Chat failed"}"#).unwrap();
        assert_eq!(body.message(), Some("Chat failed"));
    }

    #[test]
    fn test_unrecognized_body_has_no_message() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"status": 500}"#).unwrap();
        assert!(body.message().is_none());
    }
}
