// src/render.rs
//! Plain-text rendering for list and detail views. Tables go to stdout;
//! nothing here talks to the network.

use chrono::{DateTime, Utc};

use crate::coach::ResumeAnalysis;
use crate::types::application::Application;
use crate::types::job::Job;
use crate::types::user::User;

/// Truncate long cell values so table rows stay on one line.
fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let prefix: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", prefix)
    }
}

fn deadline_label(job: &Job, now: DateTime<Utc>) -> String {
    let formatted = job.deadline.format("%Y-%m-%d %H:%M");
    if !job.is_open(now) {
        format!("{} (closed)", formatted)
    } else if job.is_closing_soon(now) {
        format!("{} (closing soon)", formatted)
    } else {
        formatted.to_string()
    }
}

pub fn job_table(jobs: &[Job], now: DateTime<Utc>) {
    if jobs.is_empty() {
        println!("No job postings found.");
        return;
    }

    println!(
        "{:<26} {:<22} {:<18} {:<12} {:<16} {:<28}",
        "ID", "Title", "Company", "Type", "Location", "Deadline"
    );
    println!("{}", "-".repeat(124));
    for job in jobs {
        println!(
            "{:<26} {:<22} {:<18} {:<12} {:<16} {:<28}",
            clip(&job.id, 25),
            clip(&job.title, 21),
            clip(&job.company, 17),
            clip(&job.job_type, 11),
            clip(&job.location, 15),
            deadline_label(job, now)
        );
    }
    println!("\n{} posting(s)", jobs.len());
}

pub fn job_detail(job: &Job, already_applied: Option<bool>, now: DateTime<Utc>) {
    println!("{} — {}", job.title, job.company);
    println!("  ID:           {}", job.id);
    println!("  Type:         {}", job.job_type);
    println!("  Location:     {}", job.location);
    println!("  Compensation: {}", job.compensation());
    println!("  Deadline:     {}", deadline_label(job, now));
    if !job.tech_stack.is_empty() {
        println!("  Tech stack:   {}", job.tech_stack.join(", "));
    }
    if let Some(count) = job.application_count {
        println!("  Applications: {}", count);
    }

    let eligibility = &job.eligibility;
    if !eligibility.is_unrestricted() {
        println!("  Eligibility:");
        if let Some(min_cgpa) = eligibility.min_cgpa {
            println!("    Min CGPA:       {}", min_cgpa);
        }
        if let Some(min_percentage) = eligibility.min_percentage {
            println!("    Min percentage: {}", min_percentage);
        }
        if !eligibility.branches.is_empty() {
            println!("    Branches:       {}", eligibility.branches.join(", "));
        }
        if !eligibility.backlogs_allowed {
            println!("    No standing backlogs");
        }
    }

    if let Some(description) = &job.description {
        println!("\n{}", description);
    }

    match already_applied {
        Some(true) => println!("\n✓ You have already applied to this job."),
        Some(false) if job.is_open(now) => {
            println!("\nApply with: placementctl apply {}", job.id)
        }
        _ => {}
    }
}

pub fn application_table(applications: &[Application]) {
    if applications.is_empty() {
        println!("No applications yet.");
        return;
    }

    println!(
        "{:<26} {:<22} {:<18} {:<13} {:<18}",
        "ID", "Job", "Company", "Status", "Applied on"
    );
    println!("{}", "-".repeat(98));
    for application in applications {
        let (title, company) = match &application.job {
            Some(job) => (job.title.as_str(), job.company.as_str()),
            None => (application.job_id.as_str(), "-"),
        };
        println!(
            "{:<26} {:<22} {:<18} {:<13} {:<18}",
            clip(&application.id, 25),
            clip(title, 21),
            clip(company, 17),
            application.status.to_string(),
            application.created_at.format("%Y-%m-%d")
        );
    }
    println!("\n{} application(s)", applications.len());
}

/// Coordinator view: applicant snapshots for one posting, with the
/// lifecycle moves still available per row.
pub fn applicant_table(job: &Job, applications: &[Application]) {
    println!("Applicants for {} — {}\n", job.title, job.company);
    if applications.is_empty() {
        println!("No applications received.");
        return;
    }

    println!(
        "{:<26} {:<20} {:<10} {:<8} {:<13} {:<22}",
        "ID", "Name", "Branch", "CGPA", "Status", "Next"
    );
    println!("{}", "-".repeat(100));
    for application in applications {
        let snapshot = application.profile_snapshot.as_ref();
        let name = snapshot
            .map(|s| s.name.full())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "-".to_string());
        let branch = snapshot
            .and_then(|s| s.branch.clone())
            .unwrap_or_else(|| "-".to_string());
        let cgpa = snapshot
            .and_then(|s| s.ug_cgpa)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let next = application
            .status
            .next_statuses()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("|");
        println!(
            "{:<26} {:<20} {:<10} {:<8} {:<13} {:<22}",
            clip(&application.id, 25),
            clip(&name, 19),
            clip(&branch, 9),
            cgpa,
            application.status.to_string(),
            if next.is_empty() { "-".to_string() } else { next }
        );
        if let Some(resume_url) = snapshot.and_then(|s| s.resume_url.as_deref()) {
            println!("    resume: {}", resume_url);
        }
        if let Some(notes) = application.notes.as_deref() {
            println!("    notes:  {}", notes);
        }
    }
    println!("\n{} applicant(s)", applications.len());
}

pub fn profile(user: &User) {
    println!("{} <{}> [{}]", user.name.full(), user.email, user.role);
    if let Some(phone) = &user.phone {
        println!("  Phone:   {}", phone);
    }
    if let Some(branch) = &user.branch {
        println!("  Branch:  {}", branch);
    }
    if let Some(ug_cgpa) = user.ug_cgpa {
        println!("  UG CGPA: {}", ug_cgpa);
    }
    if let Some(ug_percentage) = user.ug_percentage {
        println!("  UG %:    {}", ug_percentage);
    }
    if let Some(tenth) = user.tenth_percentage {
        println!("  10th %:  {}", tenth);
    }
    if let Some(twelfth) = user.twelfth_percentage {
        println!("  12th %:  {}", twelfth);
    }
    if !user.skills.is_empty() {
        println!("  Skills:  {}", user.skills.join(", "));
    }
    if let Some(resume_url) = &user.resume_url {
        println!("  Resume:  {}", resume_url);
    }
    if let Some(github) = &user.links.github {
        println!("  GitHub:  {}", github);
    }
    if let Some(linkedin) = &user.links.linkedin {
        println!("  LinkedIn: {}", linkedin);
    }
    if !user.experience.is_empty() {
        println!("  Experience:");
        for (index, experience) in user.experience.iter().enumerate() {
            println!("    [{}] {}", index, experience.headline());
        }
    }
}

pub fn analysis(analysis: &ResumeAnalysis) {
    if let Some(headline) = &analysis.headline {
        println!("{}\n", headline);
    }

    if !analysis.core_strengths.is_empty() {
        println!("Core strengths: {}\n", analysis.core_strengths.join(", "));
    }

    if !analysis.skill_gaps.is_empty() {
        println!("Skill gaps:");
        for (category, items) in analysis.skill_gaps.categories() {
            if items.is_empty() {
                println!("  {:<12} looks good", category);
            } else {
                println!("  {:<12} {}", category, items.join(", "));
            }
        }
        println!();
    }

    if !analysis.priority_learning_path.is_empty() {
        println!("Priority learning path:");
        for step in &analysis.priority_learning_path {
            println!("  • {}", step.topic);
            if let Some(why) = &step.why_it_matters {
                println!("    {}", why);
            }
            for resource in &step.starter_resources {
                let title = resource
                    .title
                    .as_deref()
                    .or(resource.url.as_deref())
                    .unwrap_or("(untitled)");
                match &resource.url {
                    Some(url) if resource.title.is_some() => {
                        println!("    - {} <{}>", title, url)
                    }
                    _ => println!("    - {}", title),
                }
            }
        }
        println!();
    }

    if !analysis.role_fit.is_empty() {
        println!("Role fit:");
        for fit in &analysis.role_fit {
            match fit.confidence {
                Some(confidence) => println!("  • {} ({}%)", fit.role, confidence),
                None => println!("  • {}", fit.role),
            }
            if let Some(reason) = &fit.fit_reason {
                println!("    {}", reason);
            }
        }
        println!();
    }

    if !analysis.project_ideas.is_empty() {
        println!("Project ideas:");
        for idea in &analysis.project_ideas {
            println!("  • {}", idea.title);
            if let Some(description) = &idea.description {
                println!("    {}", description);
            }
            if !idea.skills.is_empty() {
                println!("    skills: {}", idea.skills.join(", "));
            }
        }
        println!();
    }

    if !analysis.next_30_days.is_empty() {
        println!("30-day plan:");
        for item in &analysis.next_30_days {
            match &item.measure_of_success {
                Some(measure) => println!("  • {} — {}", item.task, measure),
                None => println!("  • {}", item.task),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly-10", 10), "exactly-10");
        assert_eq!(clip("a-much-longer-value", 10), "a-much-lo…");
    }

    #[test]
    fn test_deadline_label_flags() {
        let now = Utc::now();
        let job: Job = serde_json::from_value(serde_json::json!({
            "_id": "j1",
            "title": "SDE",
            "company": "Acme",
            "type": "Full-time",
            "location": "Pune",
            "deadline": (now + Duration::hours(3)).to_rfc3339(),
        }))
        .unwrap();
        assert!(deadline_label(&job, now).contains("closing soon"));

        let mut closed = job.clone();
        closed.deadline = now - Duration::hours(1);
        assert!(deadline_label(&closed, now).contains("closed"));

        let mut open = job;
        open.deadline = now + Duration::days(10);
        let label = deadline_label(&open, now);
        assert!(!label.contains("closing soon") && !label.contains("closed"));
    }
}
