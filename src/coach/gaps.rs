// src/coach/gaps.rs
//! Skill-gap reclassification. The coach service sometimes files
//! tool and process items under soft skills; this moves them into the
//! tools bucket before display.

use serde::{Deserialize, Serialize};

/// Version control, process and tooling terms that mark an entry as a
/// hard skill regardless of where the service filed it.
pub const HARD_SKILL_KEYWORDS: &[&str] = &[
    "git", "agile", "scrum", "kanban", "docker", "kubernetes", "pytest", "junit", "linux",
    "shell", "ci", "cd", "jenkins", "github", "gitlab", "jira", "postman",
];

/// Gap categories keyed the way the coach service reports them.
/// Categories the service omits default to empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGaps {
    #[serde(default)]
    pub foundations: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub data_ai: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
}

impl SkillGaps {
    pub fn is_empty(&self) -> bool {
        self.foundations.is_empty()
            && self.frameworks.is_empty()
            && self.tools.is_empty()
            && self.data_ai.is_empty()
            && self.soft_skills.is_empty()
    }

    /// Categories in reporting order, for display.
    pub fn categories(&self) -> [(&'static str, &[String]); 5] {
        [
            ("foundations", self.foundations.as_slice()),
            ("frameworks", self.frameworks.as_slice()),
            ("tools", self.tools.as_slice()),
            ("data & AI", self.data_ai.as_slice()),
            ("soft skills", self.soft_skills.as_slice()),
        ]
    }
}

pub fn is_hard_skill(item: &str) -> bool {
    let lower = item.to_lowercase();
    HARD_SKILL_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// Move soft-skill entries that name a tool or process into `tools`.
/// Order is preserved within both categories and nothing else changes,
/// so applying this twice is the same as applying it once.
pub fn normalize_gaps(mut gaps: SkillGaps) -> SkillGaps {
    let soft_skills = std::mem::take(&mut gaps.soft_skills);
    for item in soft_skills {
        if is_hard_skill(&item) {
            gaps.tools.push(item);
        } else {
            gaps.soft_skills.push(item);
        }
    }
    gaps
}
