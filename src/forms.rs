// src/forms.rs
//! Draft objects for mutating forms and the normalization applied on
//! submit: comma-delimited text becomes trimmed string arrays, numeric
//! text becomes numbers (empty means absent). Drafts never touch the
//! wire until a payload is built, so a rejected submit leaves state as
//! it was.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::types::job::{Eligibility, Job};
use crate::types::user::{Experience, Links, Name};

/// Comma-delimited text to an array of trimmed, non-empty strings.
pub fn split_delimited(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Numeric-looking text to a number, empty text to None.
pub fn parse_optional_number(input: &str) -> Result<Option<f64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("Not a number: {}", trimmed))
}

/// Accepts RFC 3339 or the datetime-local shape `YYYY-MM-DDTHH:MM`
/// (taken as UTC).
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
        .with_context(|| {
            format!(
                "Invalid deadline: {} (use RFC 3339 or YYYY-MM-DDTHH:MM)",
                trimmed
            )
        })?;
    Ok(naive.and_utc())
}

/// Job posting form state, mirroring the entity shape with the text
/// fields still as typed.
#[derive(Debug, Clone, Default)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub location: String,
    pub ctc: String,
    pub stipend: String,
    pub tech_stack: String,
    pub deadline: String,
    pub description: String,
    pub min_cgpa: String,
    pub min_percentage: String,
    pub branches: String,
    pub backlogs_allowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPayload {
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub ctc: Option<f64>,
    pub stipend: Option<f64>,
    pub tech_stack: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub description: Option<String>,
    pub eligibility: Eligibility,
}

impl JobDraft {
    /// Pre-fill the draft from an existing posting, for edit flows.
    pub fn from_job(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            job_type: job.job_type.clone(),
            location: job.location.clone(),
            ctc: job.ctc.map(|v| v.to_string()).unwrap_or_default(),
            stipend: job.stipend.map(|v| v.to_string()).unwrap_or_default(),
            tech_stack: job.tech_stack.join(", "),
            deadline: job.deadline.to_rfc3339(),
            description: job.description.clone().unwrap_or_default(),
            min_cgpa: job
                .eligibility
                .min_cgpa
                .map(|v| v.to_string())
                .unwrap_or_default(),
            min_percentage: job
                .eligibility
                .min_percentage
                .map(|v| v.to_string())
                .unwrap_or_default(),
            branches: job.eligibility.branches.join(", "),
            backlogs_allowed: job.eligibility.backlogs_allowed,
        }
    }

    pub fn into_payload(self) -> Result<JobPayload> {
        let description = self.description.trim();
        Ok(JobPayload {
            title: self.title,
            company: self.company,
            job_type: self.job_type,
            location: self.location,
            ctc: parse_optional_number(&self.ctc)?,
            stipend: parse_optional_number(&self.stipend)?,
            tech_stack: split_delimited(&self.tech_stack),
            deadline: parse_deadline(&self.deadline)?,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            eligibility: Eligibility {
                min_cgpa: parse_optional_number(&self.min_cgpa)?,
                min_percentage: parse_optional_number(&self.min_percentage)?,
                branches: split_delimited(&self.branches),
                backlogs_allowed: self.backlogs_allowed,
            },
        })
    }
}

/// Partial profile update. Only fields that were actually touched are
/// serialized, so an untouched field keeps its server-side value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ug_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ug_cgpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenth_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twelfth_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_internship: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing_backlogs: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_object().map(|fields| fields.is_empty()))
            .unwrap_or(true)
    }
}

/// Experience form state; technologies as comma-delimited text.
#[derive(Debug, Clone, Default)]
pub struct ExperienceDraft {
    pub kind: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub summary: String,
    pub technologies: String,
}

impl ExperienceDraft {
    pub fn into_payload(self) -> Experience {
        fn non_empty(value: String) -> Option<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }

        Experience {
            kind: non_empty(self.kind),
            company: non_empty(self.company),
            title: non_empty(self.title),
            location: non_empty(self.location),
            start_date: non_empty(self.start_date),
            end_date: non_empty(self.end_date),
            is_current: self.is_current,
            summary: non_empty(self.summary),
            technologies: split_delimited(&self.technologies),
            achievements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_delimited_drops_empty_entries() {
        assert_eq!(split_delimited("React, Node, "), vec!["React", "Node"]);
        assert_eq!(split_delimited("  "), Vec::<String>::new());
        assert_eq!(split_delimited("one"), vec!["one"]);
        assert_eq!(split_delimited(",,a , b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("").unwrap(), None);
        assert_eq!(parse_optional_number("  ").unwrap(), None);
        assert_eq!(parse_optional_number("7.5").unwrap(), Some(7.5));
        assert!(parse_optional_number("seven").is_err());
    }

    #[test]
    fn test_parse_deadline_formats() {
        let rfc = parse_deadline("2026-09-15T10:30:00+00:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2026-09-15T10:30:00+00:00");

        let local = parse_deadline("2026-09-15T10:30").unwrap();
        assert_eq!(local, rfc);

        assert!(parse_deadline("next friday").is_err());
    }

    #[test]
    fn test_job_draft_normalizes_on_submit() {
        let draft = JobDraft {
            title: "SDE".to_string(),
            company: "Acme".to_string(),
            job_type: "Full-time".to_string(),
            location: "Pune".to_string(),
            ctc: "12".to_string(),
            stipend: String::new(),
            tech_stack: "React, Node, ".to_string(),
            deadline: "2026-09-15T10:30".to_string(),
            description: "  ".to_string(),
            min_cgpa: "7.5".to_string(),
            min_percentage: String::new(),
            branches: "CSE, IT".to_string(),
            backlogs_allowed: true,
        };

        let payload = draft.into_payload().unwrap();
        assert_eq!(payload.tech_stack, vec!["React", "Node"]);
        assert_eq!(payload.ctc, Some(12.0));
        assert_eq!(payload.stipend, None);
        assert_eq!(payload.description, None);
        assert_eq!(payload.eligibility.min_cgpa, Some(7.5));
        assert_eq!(payload.eligibility.branches, vec!["CSE", "IT"]);

        // "type" goes over the wire under the backend's field name
        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["type"], "Full-time");
    }

    #[test]
    fn test_job_draft_rejects_bad_number() {
        let draft = JobDraft {
            deadline: "2026-09-15T10:30".to_string(),
            ctc: "twelve".to_string(),
            ..Default::default()
        };
        assert!(draft.into_payload().is_err());
    }

    #[test]
    fn test_profile_update_serializes_only_touched_fields() {
        let update = ProfileUpdate {
            phone: Some("999".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        let wire = serde_json::to_value(&update).unwrap();
        let fields = wire.as_object().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["phone"], "999");

        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_experience_draft_empty_fields_become_absent() {
        let draft = ExperienceDraft {
            title: "Intern".to_string(),
            company: "Beta".to_string(),
            technologies: "Rust, ".to_string(),
            is_current: true,
            ..Default::default()
        };
        let payload = draft.into_payload();
        assert_eq!(payload.title.as_deref(), Some("Intern"));
        assert!(payload.location.is_none());
        assert_eq!(payload.technologies, vec!["Rust"]);
        assert!(payload.is_current);
    }
}
