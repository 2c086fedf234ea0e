// src/cli.rs
//! Command-line surface. Each command is a view: check the guard,
//! issue the reads (independent ones concurrently), render, and leave
//! state untouched when the backend rejects a write.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use crate::coach::{self, CoachClient};
use crate::core::credential_store::{CredentialStore, FileCredentialStore};
use crate::core::{ConfigManager, JobQuery, PortalClient};
use crate::forms::{parse_optional_number, split_delimited, ExperienceDraft, JobDraft, ProfileUpdate};
use crate::guard::{check_access, GuardDecision};
use crate::render;
use crate::session::Session;
use crate::types::application::ApplicationStatus;
use crate::types::user::{Links, Name, RegisterRequest, Role};

#[derive(Parser)]
#[command(name = "placementctl")]
#[command(about = "Command-line client for the campus placement portal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with portal credentials
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a student account and sign in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and drop the stored credential
    Logout,
    /// Show who the stored credential belongs to
    Whoami,
    /// Browse and manage job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Apply to a job
    Apply { job_id: String },
    /// List your applications and their status
    Applications,
    /// Review applicants for one of your postings
    Applicants { job_id: String },
    /// Move an application through its lifecycle
    Status {
        application_id: String,
        /// Applied, Shortlisted, Rejected or Offer
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Resume analysis and follow-up coaching
    Coach {
        #[command(subcommand)]
        command: CoachCommand,
    },
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// List open postings
    List {
        /// Match against title, company or tech stack
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tech: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Include postings whose deadline has passed
        #[arg(long)]
        all: bool,
    },
    /// Show one posting in full
    Show { job_id: String },
    /// List the postings you created
    Mine,
    /// Create a posting
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "Full-time")]
        job_type: String,
        #[arg(long)]
        location: String,
        /// Annual CTC in LPA
        #[arg(long, default_value = "")]
        ctc: String,
        /// Monthly stipend, for internships
        #[arg(long, default_value = "")]
        stipend: String,
        /// Comma-separated, e.g. "React, Python"
        #[arg(long, default_value = "")]
        tech_stack: String,
        /// RFC 3339 or YYYY-MM-DDTHH:MM
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        min_cgpa: String,
        #[arg(long, default_value = "")]
        min_percentage: String,
        /// Comma-separated eligible branches
        #[arg(long, default_value = "")]
        branches: String,
        /// Exclude candidates with standing backlogs
        #[arg(long)]
        no_backlogs: bool,
    },
    /// Edit a posting; unset fields keep their current value
    Update {
        job_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        job_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        ctc: Option<String>,
        #[arg(long)]
        stipend: Option<String>,
        #[arg(long)]
        tech_stack: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        min_cgpa: Option<String>,
        #[arg(long)]
        min_percentage: Option<String>,
        #[arg(long)]
        branches: Option<String>,
        #[arg(long)]
        backlogs_allowed: Option<bool>,
    },
    /// Remove a posting
    Delete { job_id: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show your full profile
    Show,
    /// Update profile fields; unset fields are left alone
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        ug_cgpa: Option<String>,
        #[arg(long)]
        ug_percentage: Option<String>,
        #[arg(long)]
        tenth_percentage: Option<String>,
        #[arg(long)]
        twelfth_percentage: Option<String>,
        /// Comma-separated skills
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        resume_url: Option<String>,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
        #[arg(long)]
        has_internship: Option<bool>,
        #[arg(long)]
        standing_backlogs: Option<bool>,
    },
    /// Manage experience entries
    Experience {
        #[command(subcommand)]
        command: ExperienceCommand,
    },
}

#[derive(Subcommand)]
pub enum ExperienceCommand {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "work")]
        kind: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
        /// Still in this role
        #[arg(long)]
        current: bool,
        #[arg(long, default_value = "")]
        summary: String,
        /// Comma-separated technologies
        #[arg(long, default_value = "")]
        technologies: String,
    },
    /// Edit an entry by its index in `profile show`
    Update {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        current: Option<bool>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        technologies: Option<String>,
    },
    Remove { index: usize },
}

#[derive(Subcommand)]
pub enum CoachCommand {
    /// Upload a PDF resume for analysis
    Analyze {
        file: PathBuf,
        /// e.g. "Frontend Engineer"
        #[arg(long, default_value = "")]
        target_role: String,
        /// Paste a JD to tailor the gaps
        #[arg(long, default_value = "")]
        job_description: String,
    },
    /// Ask a follow-up about the last analysis
    Chat { message: String },
}

/// Guard check, mapped to errors. Runs before any backend request for
/// the protected command.
fn ensure_access<S: CredentialStore>(
    session: &Session<S>,
    required_role: Option<Role>,
) -> Result<()> {
    match check_access(session.is_authenticated(), session.role(), required_role) {
        GuardDecision::Render => Ok(()),
        GuardDecision::RedirectLogin => anyhow::bail!(
            "Not signed in. Run `placementctl login <email> --password <password>` first"
        ),
        GuardDecision::RedirectHome => match required_role {
            Some(required) => anyhow::bail!("This action needs the {} role", required),
            None => anyhow::bail!("This action is not available for your role"),
        },
    }
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    let store = FileCredentialStore::new(config.session_path.clone());
    let client = PortalClient::new(config.portal_url.clone(), config.timeout_seconds)?;
    let mut session = Session::new(store, client);
    session.resolve().await?;

    match cli.command {
        Command::Login { email, password } => {
            session.login(&email, &password).await?;
            if let Some(user) = session.user() {
                println!("✓ Signed in as {} ({})", user.name.full(), user.role);
            }
        }

        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            let request = RegisterRequest::student(&first_name, &last_name, &email, &password);
            session.register(&request).await?;
            if let Some(user) = session.user() {
                println!("✓ Account created. Signed in as {}", user.name.full());
            }
        }

        Command::Logout => {
            session.logout()?;
            println!("✓ Signed out");
        }

        Command::Whoami => {
            ensure_access(&session, None)?;
            if let Some(user) = session.user() {
                println!("{} <{}> ({})", user.name.full(), user.email, user.role);
            }
        }

        Command::Jobs { command } => handle_jobs_command(command, &session).await?,

        Command::Apply { job_id } => {
            ensure_access(&session, Some(Role::Student))?;
            let application = session.client().apply(&job_id).await?;
            println!(
                "✓ Applied. Status: {}. Your profile was snapshotted with this application.",
                application.status
            );
        }

        Command::Applications => {
            ensure_access(&session, Some(Role::Student))?;
            let applications = session.client().my_applications().await?;
            render::application_table(&applications);
        }

        Command::Applicants { job_id } => {
            ensure_access(&session, Some(Role::Coordinator))?;
            // Both reads are independent; issue them together
            let (job, applications) = tokio::try_join!(
                session.client().get_job(&job_id),
                session.client().job_applications(&job_id)
            )?;
            render::applicant_table(&job, &applications);
        }

        Command::Status {
            application_id,
            status,
            notes,
        } => {
            ensure_access(&session, Some(Role::Coordinator))?;
            let status: ApplicationStatus = status.parse()?;
            if status == ApplicationStatus::Applied {
                warn!("Applied is the initial status; the portal may reject moving back to it");
            }
            let response = session
                .client()
                .update_application_status(&application_id, status, notes.as_deref())
                .await?;
            println!("✓ {}", response.message);
        }

        Command::Profile { command } => handle_profile_command(command, &session).await?,

        Command::Coach { command } => handle_coach_command(command, &config).await?,
    }

    Ok(())
}

async fn handle_jobs_command<S: CredentialStore>(
    command: JobsCommand,
    session: &Session<S>,
) -> Result<()> {
    match command {
        JobsCommand::List {
            search,
            tech,
            location,
            all,
        } => {
            ensure_access(session, None)?;
            let query = JobQuery {
                search,
                tech,
                location,
                include_closed: all,
            };
            let jobs = session.client().list_jobs(&query).await?;
            render::job_table(&jobs, Utc::now());
        }

        JobsCommand::Show { job_id } => {
            ensure_access(session, None)?;
            if session.role() == Some(Role::Student) {
                // Fetch the posting and the student's applications
                // together to mark whether they already applied
                let (job, applications) = tokio::try_join!(
                    session.client().get_job(&job_id),
                    session.client().my_applications()
                )?;
                let applied = applications.iter().any(|a| a.job_id == job.id);
                render::job_detail(&job, Some(applied), Utc::now());
            } else {
                let job = session.client().get_job(&job_id).await?;
                render::job_detail(&job, None, Utc::now());
            }
        }

        JobsCommand::Mine => {
            ensure_access(session, Some(Role::Coordinator))?;
            let jobs = session.client().coordinator_jobs().await?;
            render::job_table(&jobs, Utc::now());
        }

        JobsCommand::Create {
            title,
            company,
            job_type,
            location,
            ctc,
            stipend,
            tech_stack,
            deadline,
            description,
            min_cgpa,
            min_percentage,
            branches,
            no_backlogs,
        } => {
            ensure_access(session, Some(Role::Coordinator))?;
            let draft = JobDraft {
                title,
                company,
                job_type,
                location,
                ctc,
                stipend,
                tech_stack,
                deadline,
                description,
                min_cgpa,
                min_percentage,
                branches,
                backlogs_allowed: !no_backlogs,
            };
            let payload = draft.into_payload()?;
            let job = session.client().create_job(&payload).await?;
            println!("✓ Job created: {} ({})", job.title, job.id);
        }

        JobsCommand::Update {
            job_id,
            title,
            company,
            job_type,
            location,
            ctc,
            stipend,
            tech_stack,
            deadline,
            description,
            min_cgpa,
            min_percentage,
            branches,
            backlogs_allowed,
        } => {
            ensure_access(session, Some(Role::Coordinator))?;
            // Read-then-write: start from the current posting so unset
            // fields keep their value
            let existing = session.client().get_job(&job_id).await?;
            let mut draft = JobDraft::from_job(&existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(company) = company {
                draft.company = company;
            }
            if let Some(job_type) = job_type {
                draft.job_type = job_type;
            }
            if let Some(location) = location {
                draft.location = location;
            }
            if let Some(ctc) = ctc {
                draft.ctc = ctc;
            }
            if let Some(stipend) = stipend {
                draft.stipend = stipend;
            }
            if let Some(tech_stack) = tech_stack {
                draft.tech_stack = tech_stack;
            }
            if let Some(deadline) = deadline {
                draft.deadline = deadline;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(min_cgpa) = min_cgpa {
                draft.min_cgpa = min_cgpa;
            }
            if let Some(min_percentage) = min_percentage {
                draft.min_percentage = min_percentage;
            }
            if let Some(branches) = branches {
                draft.branches = branches;
            }
            if let Some(backlogs_allowed) = backlogs_allowed {
                draft.backlogs_allowed = backlogs_allowed;
            }
            let payload = draft.into_payload()?;
            let job = session.client().update_job(&job_id, &payload).await?;
            println!("✓ Job updated: {} ({})", job.title, job.id);
        }

        JobsCommand::Delete { job_id } => {
            ensure_access(session, Some(Role::Coordinator))?;
            session.client().delete_job(&job_id).await?;
            println!("✓ Job deleted: {}", job_id);
        }
    }

    Ok(())
}

async fn handle_profile_command<S: CredentialStore>(
    command: ProfileCommand,
    session: &Session<S>,
) -> Result<()> {
    ensure_access(session, None)?;

    match command {
        ProfileCommand::Show => {
            if let Some(user) = session.user() {
                render::profile(user);
            }
        }

        ProfileCommand::Update {
            first_name,
            last_name,
            phone,
            gender,
            dob,
            branch,
            ug_cgpa,
            ug_percentage,
            tenth_percentage,
            twelfth_percentage,
            skills,
            resume_url,
            github,
            linkedin,
            has_internship,
            standing_backlogs,
        } => {
            let mut update = ProfileUpdate::default();

            if first_name.is_some() || last_name.is_some() {
                // Name travels as one object; merge with the current one
                let current = session
                    .user()
                    .map(|user| user.name.clone())
                    .unwrap_or_default();
                update.name = Some(Name {
                    first: first_name.unwrap_or(current.first),
                    last: last_name.unwrap_or(current.last),
                });
            }
            if github.is_some() || linkedin.is_some() {
                let current = session
                    .user()
                    .map(|user| user.links.clone())
                    .unwrap_or_default();
                update.links = Some(Links {
                    github: github.or(current.github),
                    linkedin: linkedin.or(current.linkedin),
                });
            }
            update.phone = phone;
            update.gender = gender;
            update.dob = dob;
            update.branch = branch;
            if let Some(value) = ug_cgpa {
                update.ug_cgpa = parse_optional_number(&value)?;
            }
            if let Some(value) = ug_percentage {
                update.ug_percentage = parse_optional_number(&value)?;
            }
            if let Some(value) = tenth_percentage {
                update.tenth_percentage = parse_optional_number(&value)?;
            }
            if let Some(value) = twelfth_percentage {
                update.twelfth_percentage = parse_optional_number(&value)?;
            }
            update.skills = skills.as_deref().map(split_delimited);
            update.resume_url = resume_url;
            update.has_internship = has_internship;
            update.standing_backlogs = standing_backlogs;

            if update.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }

            let user = session.client().update_me(&update).await?;
            println!("✓ Profile updated\n");
            render::profile(&user);
        }

        ProfileCommand::Experience { command } => {
            handle_experience_command(command, session).await?;
        }
    }

    Ok(())
}

async fn handle_experience_command<S: CredentialStore>(
    command: ExperienceCommand,
    session: &Session<S>,
) -> Result<()> {
    match command {
        ExperienceCommand::Add {
            title,
            company,
            kind,
            location,
            start_date,
            end_date,
            current,
            summary,
            technologies,
        } => {
            let draft = ExperienceDraft {
                kind,
                company,
                title,
                location,
                start_date,
                end_date,
                is_current: current,
                summary,
                technologies,
            };
            let response = session.client().add_experience(&draft.into_payload()).await?;
            println!("✓ {}", response.message);
        }

        ExperienceCommand::Update {
            index,
            title,
            company,
            kind,
            location,
            start_date,
            end_date,
            current,
            summary,
            technologies,
        } => {
            // Merge onto the entry as the resolved profile has it
            let mut experience = session
                .user()
                .and_then(|user| user.experience.get(index).cloned())
                .ok_or_else(|| anyhow::anyhow!("No experience entry at index {}", index))?;

            if let Some(title) = title {
                experience.title = Some(title);
            }
            if let Some(company) = company {
                experience.company = Some(company);
            }
            if let Some(kind) = kind {
                experience.kind = Some(kind);
            }
            if let Some(location) = location {
                experience.location = Some(location);
            }
            if let Some(start_date) = start_date {
                experience.start_date = Some(start_date);
            }
            if let Some(end_date) = end_date {
                experience.end_date = Some(end_date);
            }
            if let Some(current) = current {
                experience.is_current = current;
            }
            if let Some(summary) = summary {
                experience.summary = Some(summary);
            }
            if let Some(technologies) = technologies {
                experience.technologies = split_delimited(&technologies);
            }

            let response = session
                .client()
                .update_experience(index, &experience)
                .await?;
            println!("✓ {}", response.message);
        }

        ExperienceCommand::Remove { index } => {
            session.client().delete_experience(index).await?;
            println!("✓ Experience entry {} removed", index);
        }
    }

    Ok(())
}

async fn handle_coach_command(command: CoachCommand, config: &ConfigManager) -> Result<()> {
    let coach = CoachClient::new(config.coach_url.clone(), config.timeout_seconds)?;

    match command {
        CoachCommand::Analyze {
            file,
            target_role,
            job_description,
        } => {
            let context = coach.analyze(&file, &target_role, &job_description).await?;
            coach::save_context(&config.analysis_path, &context)?;
            render::analysis(&context.analysis);
            println!("\n✓ Analysis saved. Ask follow-ups with `placementctl coach chat \"...\"`");
        }

        CoachCommand::Chat { message } => {
            let context = coach::load_context(&config.analysis_path)?;
            let reply = coach.chat(&message, &context).await?;
            println!("{}", reply);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_jobs_list_filters() {
        let cli = Cli::try_parse_from([
            "placementctl", "jobs", "list", "--search", "backend", "--location", "Pune", "--all",
        ])
        .unwrap();
        match cli.command {
            Command::Jobs {
                command:
                    JobsCommand::List {
                        search,
                        location,
                        all,
                        tech,
                    },
            } => {
                assert_eq!(search.as_deref(), Some("backend"));
                assert_eq!(location.as_deref(), Some("Pune"));
                assert!(all);
                assert!(tech.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parses_job_create() {
        let cli = Cli::try_parse_from([
            "placementctl",
            "jobs",
            "create",
            "--title",
            "SDE",
            "--company",
            "Acme",
            "--location",
            "Remote",
            "--deadline",
            "2026-09-15T10:30",
            "--tech-stack",
            "React, Node, ",
            "--no-backlogs",
        ])
        .unwrap();
        match cli.command {
            Command::Jobs {
                command:
                    JobsCommand::Create {
                        job_type,
                        tech_stack,
                        no_backlogs,
                        ..
                    },
            } => {
                assert_eq!(job_type, "Full-time");
                assert_eq!(tech_stack, "React, Node, ");
                assert!(no_backlogs);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_create_requires_deadline() {
        let result = Cli::try_parse_from([
            "placementctl", "jobs", "create", "--title", "SDE", "--company", "Acme",
            "--location", "Remote",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parses_status_with_notes() {
        let cli = Cli::try_parse_from([
            "placementctl", "status", "app-1", "Shortlisted", "--notes", "strong resume",
        ])
        .unwrap();
        match cli.command {
            Command::Status {
                application_id,
                status,
                notes,
            } => {
                assert_eq!(application_id, "app-1");
                assert_eq!(status.parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Shortlisted);
                assert_eq!(notes.as_deref(), Some("strong resume"));
            }
            _ => panic!("wrong command"),
        }
    }
}
