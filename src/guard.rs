// src/guard.rs
//! Role-gated access decisions. Pure function of the session state and
//! the view's required role; holds no state of its own.

use crate::types::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected content.
    Render,
    /// Not signed in: send the visitor to the login flow.
    RedirectLogin,
    /// Signed in with the wrong role: send them home.
    RedirectHome,
}

pub fn check_access(
    is_authenticated: bool,
    current_role: Option<Role>,
    required_role: Option<Role>,
) -> GuardDecision {
    if !is_authenticated {
        return GuardDecision::RedirectLogin;
    }
    match required_role {
        Some(required) if current_role != Some(required) => GuardDecision::RedirectHome,
        _ => GuardDecision::Render,
    }
}
