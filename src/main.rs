// JobBoard - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Storage directory resolution (CLI > config > platform default)
// 4. Dispatch to the profile store, job catalogue and preferences

use jobboard::app::board::JobBoard;
use jobboard::app::dashboard::DashboardSummary;
use jobboard::app::prefs;
use jobboard::app::store::ProfileStore;
use jobboard::core::jobs::{Job, JobQuery, NewJob, SortOrder};
use jobboard::core::model::{ExperienceEntry, NewJobAlert, ProfileUpdate, Role, Session};
use jobboard::platform::config::{self, PlatformPaths};
use jobboard::platform::storage::FileStorage;
use jobboard::util::{self, error::{JobError, StoreError}};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// JobBoard - browse listings and manage a local job-seeker or employer
/// account.
///
/// All state lives in a local storage directory; nothing is sent anywhere.
#[derive(Parser, Debug)]
#[command(name = "jobboard", version, about)]
struct Cli {
    /// Storage directory (overrides config.toml and the platform default).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account. Does not log in.
    Register {
        email: String,
        #[arg(short, long)]
        password: String,
        /// job-seeker or employer.
        #[arg(short, long, default_value = "job-seeker")]
        role: Role,
        #[arg(short = 'n', long = "name", default_value = "")]
        full_name: String,
    },

    /// Log in, replacing any current session.
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// End the current session.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// Show or edit the signed-in profile. Only the given fields change.
    Profile {
        #[arg(long = "name")]
        full_name: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Comma-separated list, replacing the current skills.
        #[arg(long)]
        skills: Option<String>,
        /// "title|company|period|description"; repeat for several entries.
        #[arg(long = "experience")]
        experience: Vec<String>,
    },

    /// Bookmark a listing.
    Save { job_id: u64 },

    /// Remove a bookmark.
    Unsave { job_id: u64 },

    /// Apply for a listing.
    Apply { job_id: u64 },

    /// Manage job alerts.
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },

    /// Remember search terms for the next `jobs` listing.
    Search {
        job: String,
        #[arg(default_value = "")]
        location: String,
    },

    /// List, filter and sort listings.
    Jobs {
        /// Category filter; repeat for several.
        #[arg(short, long = "category")]
        categories: Vec<String>,
        /// Employment type filter (Full-time, Part-time, Contract, Internship).
        #[arg(short, long = "employment")]
        employment_types: Vec<String>,
        /// Remote, On-site or Hybrid.
        #[arg(short = 't', long = "type")]
        work_type: Option<String>,
        /// Text to find in title or company.
        #[arg(short, long)]
        query: Option<String>,
        /// Text to find in location.
        #[arg(short, long)]
        location: Option<String>,
        /// relevant, recent, salary-high or salary-low.
        #[arg(short, long, default_value = "relevant")]
        sort: SortOrder,
    },

    /// Show one listing in full and remember it as selected.
    Show { job_id: u64 },

    /// Post a listing (employer accounts only).
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: String,
        #[arg(long = "type")]
        work_type: String,
        #[arg(long)]
        category: String,
        #[arg(long = "employment", default_value = "Full-time")]
        employment_type: String,
        #[arg(long, default_value = "")]
        salary: String,
        #[arg(long)]
        description: String,
        /// One requirement per line.
        #[arg(long, default_value = "")]
        requirements: String,
        /// One benefit per line.
        #[arg(long, default_value = "")]
        benefits: String,
    },

    /// Summary of the signed-in account.
    Dashboard,

    /// Show or set the dark-mode preference.
    DarkMode {
        /// on or off; omit to show the current value.
        state: Option<Toggle>,
    },
}

#[derive(Subcommand, Debug)]
enum AlertAction {
    /// Create an alert.
    Add {
        title: String,
        #[arg(default_value = "")]
        location: String,
        /// Daily digest instead of instant notification.
        #[arg(long)]
        daily: bool,
    },
    /// Delete an alert by id.
    Remove { alert_id: u64 },
    /// List alerts.
    List,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&platform_paths.config_dir);

    // Initialise logging subsystem
    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "config.toml");
    }

    let storage_dir = cli
        .data_dir
        .clone()
        .or_else(|| app_config.storage_dir.clone())
        .unwrap_or_else(|| platform_paths.storage_dir());

    tracing::info!(
        version = util::constants::APP_VERSION,
        storage = %storage_dir.display(),
        "JobBoard starting"
    );

    let storage = FileStorage::new(storage_dir);
    if let Err(e) = run(cli.command, storage, app_config.dark_mode_default) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, storage: FileStorage, dark_default: bool) -> util::error::Result<()> {
    match command {
        Command::Register {
            email,
            password,
            role,
            full_name,
        } => {
            let mut store = ProfileStore::open(storage)?;
            let user = store.register(&email, &password, role, &full_name)?;
            println!("Registered {} as {}", user.email, user.role.label());
        }

        Command::Login { email, password } => {
            let mut store = ProfileStore::open(storage)?;
            let session = store.login(&email, &password)?;
            println!("Logged in as {} ({})", session.email(), session.role().label());
        }

        Command::Logout => {
            let mut store = ProfileStore::open(storage)?;
            store.logout()?;
            println!("Logged out");
        }

        Command::Whoami => {
            let store = ProfileStore::open(storage)?;
            match store.current_user() {
                Some(session) => print_session(session),
                None => println!("Not logged in"),
            }
        }

        Command::Profile {
            full_name,
            title,
            bio,
            skills,
            experience,
        } => {
            let mut store = ProfileStore::open(storage)?;
            let update = ProfileUpdate {
                full_name,
                title,
                bio,
                skills: skills.map(|s| split_list(&s)),
                experience: if experience.is_empty() {
                    None
                } else {
                    Some(experience.iter().map(|e| parse_experience(e)).collect())
                },
            };
            let session = if update.is_empty() {
                store
                    .current_user()
                    .cloned()
                    .ok_or(StoreError::NotAuthenticated)?
            } else {
                store.update_profile(&update)?
            };
            print_session(&session);
        }

        Command::Save { job_id } => {
            let mut store = ProfileStore::open(storage)?;
            store.save_job(job_id)?;
            println!("Saved jobs: {}", join_ids(store.saved_jobs()));
        }

        Command::Unsave { job_id } => {
            let mut store = ProfileStore::open(storage)?;
            store.remove_saved_job(job_id)?;
            println!("Saved jobs: {}", join_ids(store.saved_jobs()));
        }

        Command::Apply { job_id } => {
            let board = JobBoard::open(storage.clone())?;
            let job = board
                .find(job_id)
                .ok_or(JobError::NotFound { id: job_id })?;
            let mut store = ProfileStore::open(storage)?;
            store.apply_for_job(job_id)?;
            println!("Application submitted for {} at {}", job.title, job.company);
        }

        Command::Alert { action } => {
            let mut store = ProfileStore::open(storage)?;
            match action {
                AlertAction::Add {
                    title,
                    location,
                    daily,
                } => {
                    let alert = store.add_job_alert(NewJobAlert {
                        title,
                        location,
                        daily,
                    })?;
                    println!("Alert {} created", alert.id);
                }
                AlertAction::Remove { alert_id } => {
                    store.remove_job_alert(alert_id)?;
                    println!("Alert {alert_id} removed");
                }
                AlertAction::List => {
                    if !store.is_authenticated() {
                        return Err(StoreError::NotAuthenticated.into());
                    }
                    for alert in store.job_alerts() {
                        println!(
                            "{}  {} in {}  ({})",
                            alert.id,
                            alert.title,
                            if alert.location.is_empty() { "anywhere" } else { alert.location.as_str() },
                            if alert.daily { "daily" } else { "instant" }
                        );
                    }
                }
            }
        }

        Command::Search { job, location } => {
            let board = JobBoard::open(storage)?;
            board.remember_search(&job, &location)?;
            println!("Search saved; run `jobboard jobs` to see results");
        }

        Command::Jobs {
            categories,
            employment_types,
            work_type,
            query,
            location,
            sort,
        } => {
            let board = JobBoard::open(storage)?;
            let mut job_query = JobQuery {
                categories,
                employment_types,
                work_type,
                search_job: query.unwrap_or_default(),
                search_location: location.unwrap_or_default(),
                sort,
            };
            if job_query.search_job.is_empty() && job_query.search_location.is_empty() {
                if let Some(terms) = board.take_search()? {
                    job_query.search_job = terms.job;
                    job_query.search_location = terms.location;
                }
            }
            let results = board.search(&job_query);
            for job in &results {
                print_job_line(job);
            }
            println!("{} of {} jobs", results.len(), board.jobs().len());
        }

        Command::Show { job_id } => {
            let board = JobBoard::open(storage)?;
            print_job_detail(board.select(job_id)?);
        }

        Command::Post {
            title,
            company,
            location,
            work_type,
            category,
            employment_type,
            salary,
            description,
            requirements,
            benefits,
        } => {
            let store = ProfileStore::open(storage.clone())?;
            let session = store.current_user().ok_or(StoreError::NotAuthenticated)?;
            let mut board = JobBoard::open(storage)?;
            let job = board.post_job(
                NewJob {
                    title,
                    company,
                    location,
                    work_type,
                    category,
                    employment_type,
                    salary,
                    description,
                    requirements,
                    benefits,
                },
                session,
            )?;
            println!("Posted job {}: {}", job.id, job.title);
        }

        Command::Dashboard => {
            let store = ProfileStore::open(storage.clone())?;
            let board = JobBoard::open(storage)?;
            let summary =
                DashboardSummary::build(&store, &board).ok_or(StoreError::NotAuthenticated)?;

            println!("{} <{}>  [{}]", summary.full_name, summary.email, summary.role.label());
            if !summary.profile.title.is_empty() {
                println!("{}", summary.profile.title);
            }
            println!("\nSaved jobs ({}):", summary.saved.len());
            for job in &summary.saved {
                print_job_line(job);
            }
            println!("\nApplications ({}):", summary.applied.len());
            for job in &summary.applied {
                print_job_line(job);
            }
            println!("\nJob alerts: {}", summary.alert_count);
            if summary.can_post_jobs() {
                println!("Post a listing with `jobboard post`");
            }
        }

        Command::DarkMode { state } => match state {
            Some(toggle) => {
                let enabled = matches!(toggle, Toggle::On);
                prefs::set_dark_mode(&storage, enabled)?;
                println!("Dark mode {}", if enabled { "on" } else { "off" });
            }
            None => {
                let enabled = prefs::dark_mode_or(&storage, dark_default);
                println!("Dark mode {}", if enabled { "on" } else { "off" });
            }
        },
    }
    Ok(())
}

fn print_session(session: &Session) {
    let user = &session.user;
    println!("{} <{}>", user.full_name, user.email);
    println!("Role:       {}", user.role.label());
    println!("Last login: {}", session.last_login.format("%Y-%m-%d %H:%M UTC"));
    if !user.profile.title.is_empty() {
        println!("Title:      {}", user.profile.title);
    }
    if !user.profile.bio.is_empty() {
        println!("Bio:        {}", user.profile.bio);
    }
    if !user.profile.skills.is_empty() {
        println!("Skills:     {}", user.profile.skills.join(", "));
    }
    for entry in &user.profile.experience {
        println!(
            "Experience: {} at {} ({})",
            entry.title, entry.company, entry.period
        );
    }
}

fn print_job_line(job: &Job) {
    println!(
        "{:>4}  {} - {}  [{}, {}, {}]  {}  {}",
        job.id,
        job.title,
        job.company,
        job.location,
        job.work_type,
        job.employment_type,
        job.salary,
        job.posted
    );
}

fn print_job_detail(job: &Job) {
    println!("{} ({})", job.title, job.company);
    println!("{} | {} | {} | {}", job.location, job.work_type, job.employment_type, job.category);
    if !job.salary.is_empty() {
        println!("Salary: {}", job.salary);
    }
    println!("Posted: {}\n", job.posted);
    let description = if job.full_description.is_empty() {
        &job.description
    } else {
        &job.full_description
    };
    println!("{description}");
    if !job.requirements.is_empty() {
        println!("\nRequirements:");
        for item in &job.requirements {
            println!("  - {item}");
        }
    }
    if !job.benefits.is_empty() {
        println!("\nBenefits:");
        for item in &job.benefits {
            println!("  - {item}");
        }
    }
}

fn join_ids(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated values, trimmed, blanks dropped.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_experience(text: &str) -> ExperienceEntry {
    let mut parts = text.splitn(4, '|').map(str::trim);
    ExperienceEntry {
        title: parts.next().unwrap_or_default().to_string(),
        company: parts.next().unwrap_or_default().to_string(),
        period: parts.next().unwrap_or_default().to_string(),
        description: parts.next().unwrap_or_default().to_string(),
    }
}
