// src/types/job.rs
//! Job posting structures. Deadlines gate applications on the backend;
//! everything derived here is display-only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eligibility {
    pub min_cgpa: Option<f64>,
    pub min_percentage: Option<f64>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default = "default_backlogs_allowed")]
    pub backlogs_allowed: bool,
}

fn default_backlogs_allowed() -> bool {
    true
}

impl Default for Eligibility {
    fn default() -> Self {
        Self {
            min_cgpa: None,
            min_percentage: None,
            branches: Vec::new(),
            backlogs_allowed: true,
        }
    }
}

impl Eligibility {
    pub fn is_unrestricted(&self) -> bool {
        self.min_cgpa.is_none()
            && self.min_percentage.is_none()
            && self.branches.is_empty()
            && self.backlogs_allowed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub ctc: Option<f64>,
    pub stipend: Option<f64>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub description: Option<String>,
    #[serde(default)]
    pub eligibility: Eligibility,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub application_count: Option<u64>,
}

impl Job {
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.deadline > now
    }

    /// Less than 24 hours left to apply.
    pub fn is_closing_soon(&self, now: DateTime<Utc>) -> bool {
        self.is_open(now) && self.deadline - now < Duration::hours(24)
    }

    pub fn compensation(&self) -> String {
        match (self.stipend, self.ctc) {
            (Some(stipend), _) => format!("₹{}/month", stipend),
            (None, Some(ctc)) => format!("₹{} LPA", ctc),
            (None, None) => "not disclosed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with_deadline(deadline: DateTime<Utc>) -> Job {
        serde_json::from_value(serde_json::json!({
            "_id": "j1",
            "title": "Software Engineer",
            "company": "Acme",
            "type": "Full-time",
            "location": "Bangalore",
            "deadline": deadline.to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn test_closing_soon_window() {
        let now = Utc::now();
        assert!(job_with_deadline(now + Duration::hours(23)).is_closing_soon(now));
        assert!(!job_with_deadline(now + Duration::hours(25)).is_closing_soon(now));
        // A passed deadline is closed, not closing soon
        assert!(!job_with_deadline(now - Duration::hours(1)).is_closing_soon(now));
        assert!(!job_with_deadline(now - Duration::hours(1)).is_open(now));
    }

    #[test]
    fn test_deserializes_backend_isoformat() {
        // Python's datetime.isoformat() emits a +00:00 offset
        let job: Job = serde_json::from_str(
            r#"{
                "_id": "j2",
                "title": "Intern",
                "company": "Beta",
                "type": "Internship",
                "location": "Remote",
                "stipend": 25000,
                "deadline": "2026-09-15T10:30:00+00:00",
                "tech_stack": ["Rust", "Postgres"]
            }"#,
        )
        .unwrap();
        assert_eq!(job.deadline.to_rfc3339(), "2026-09-15T10:30:00+00:00");
        assert_eq!(job.compensation(), "₹25000/month");
        assert!(job.eligibility.is_unrestricted());
    }

    #[test]
    fn test_eligibility_backlogs_default_allowed() {
        let eligibility: Eligibility =
            serde_json::from_str(r#"{"min_cgpa": 7.5}"#).unwrap();
        assert!(eligibility.backlogs_allowed);
        assert!(!eligibility.is_unrestricted());
    }

    #[test]
    fn test_compensation_fallbacks() {
        let mut job = job_with_deadline(Utc::now());
        assert_eq!(job.compensation(), "not disclosed");
        job.ctc = Some(12.0);
        assert_eq!(job.compensation(), "₹12 LPA");
    }
}
