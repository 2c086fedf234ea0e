// src/types/user.rs
//! User identity and profile structures

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Coordinator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Coordinator => write!(f, "coordinator"),
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "coordinator" => Ok(Role::Coordinator),
            other => Err(anyhow!(
                "Unknown role: {}. Use student or coordinator",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
}

impl Name {
    pub fn full(&self) -> String {
        format!("{} {}", self.first, self.last).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

/// One entry of the profile's experience list. Also the payload shape
/// for the experience sub-resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    pub summary: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Experience {
    /// Short display form, e.g. "Backend Intern @ Acme (2024-01 - present)"
    pub fn headline(&self) -> String {
        let title = self.title.as_deref().unwrap_or("(untitled)");
        let company = self.company.as_deref().unwrap_or("(unknown)");
        let start = self.start_date.as_deref().unwrap_or("?");
        let end = if self.is_current {
            "present"
        } else {
            self.end_date.as_deref().unwrap_or("?")
        };
        format!("{} @ {} ({} - {})", title, company, start, end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Name,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub branch: Option<String>,
    pub ug_percentage: Option<f64>,
    pub ug_cgpa: Option<f64>,
    pub ug_yop: Option<i32>,
    pub tenth_percentage: Option<f64>,
    pub tenth_yop: Option<i32>,
    pub twelfth_percentage: Option<f64>,
    pub twelfth_yop: Option<i32>,
    #[serde(default)]
    pub has_internship: bool,
    #[serde(default)]
    pub standing_backlogs: bool,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

/// Registration payload. New accounts are always students; coordinator
/// accounts are provisioned on the backend side.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: Name,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    pub fn student(first: &str, last: &str, email: &str, password: &str) -> Self {
        Self {
            name: Name {
                first: first.to_string(),
                last: last.to_string(),
            },
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("Coordinator".parse::<Role>().unwrap(), Role::Coordinator);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Student.to_string(), "student");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Coordinator).unwrap(), "\"coordinator\"");
        let role: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn test_name_full_trims_missing_parts() {
        let name = Name {
            first: "Asha".to_string(),
            last: String::new(),
        };
        assert_eq!(name.full(), "Asha");
    }

    #[test]
    fn test_user_deserializes_sparse_document() {
        // Backend documents omit fields that were never set
        let user: User = serde_json::from_str(
            r#"{"_id": "u1", "email": "a@b.edu", "role": "student"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.skills.is_empty());
        assert!(user.experience.is_empty());
        assert!(user.resume_url.is_none());
        assert!(!user.standing_backlogs);
    }

    #[test]
    fn test_experience_headline_current() {
        let exp = Experience {
            title: Some("SDE Intern".to_string()),
            company: Some("Acme".to_string()),
            start_date: Some("2024-01".to_string()),
            is_current: true,
            ..Default::default()
        };
        assert_eq!(exp.headline(), "SDE Intern @ Acme (2024-01 - present)");
    }
}
