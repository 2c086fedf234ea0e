// src/types/application.rs
//! Applications link a student to a job and carry a one-directional
//! status lifecycle plus a profile snapshot taken at submission time.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::user::{Experience, Links, Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
    Offer,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Offer,
    ];

    /// Lifecycle: Applied -> Shortlisted | Rejected, Shortlisted ->
    /// Offer | Rejected. No reverse transitions are defined.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Applied, Shortlisted) | (Applied, Rejected) | (Shortlisted, Offer) | (Shortlisted, Rejected)
        )
    }

    pub fn next_statuses(self) -> Vec<ApplicationStatus> {
        Self::ALL
            .iter()
            .copied()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Offer)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Offer => "Offer",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "offer" => Ok(ApplicationStatus::Offer),
            other => Err(anyhow!(
                "Unknown status: {}. Use Applied, Shortlisted, Rejected or Offer",
                other
            )),
        }
    }
}

/// Point-in-time copy of the applicant's profile, captured by the
/// backend when the application is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(default)]
    pub name: Name,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub ug_percentage: Option<f64>,
    pub ug_cgpa: Option<f64>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub links: Links,
    pub top_experience: Option<Experience>,
}

/// Job fields the backend embeds when listing a student's applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub profile_snapshot: Option<ProfileSnapshot>,
    pub job: Option<JobSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_lifecycle_is_one_directional() {
        assert!(Applied.can_transition_to(Shortlisted));
        assert!(Applied.can_transition_to(Rejected));
        assert!(Shortlisted.can_transition_to(Offer));
        assert!(Shortlisted.can_transition_to(Rejected));

        // No reverse or terminal transitions
        assert!(!Shortlisted.can_transition_to(Applied));
        assert!(!Rejected.can_transition_to(Shortlisted));
        assert!(!Offer.can_transition_to(Rejected));
        for status in ApplicationStatus::ALL {
            assert!(!status.can_transition_to(Applied));
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_next_statuses() {
        assert_eq!(Applied.next_statuses(), vec![Shortlisted, Rejected]);
        assert_eq!(Shortlisted.next_statuses(), vec![Rejected, Offer]);
        assert!(Rejected.next_statuses().is_empty());
        assert!(Offer.is_terminal());
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("shortlisted".parse::<ApplicationStatus>().unwrap(), Shortlisted);
        assert_eq!("Offer".parse::<ApplicationStatus>().unwrap(), Offer);
        assert!("hired".parse::<ApplicationStatus>().is_err());
        assert_eq!(Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_application_deserializes_with_embedded_job() {
        let application: Application = serde_json::from_str(
            r#"{
                "_id": "a1",
                "user_id": "u1",
                "job_id": "j1",
                "status": "Applied",
                "created_at": "2026-08-01T12:00:00+00:00",
                "notes": null,
                "job": {"title": "SDE", "company": "Acme", "deadline": "2026-09-01T00:00:00+00:00"}
            }"#,
        )
        .unwrap();
        assert_eq!(application.status, Applied);
        assert_eq!(application.job.unwrap().company, "Acme");
        assert!(application.profile_snapshot.is_none());
    }
}
