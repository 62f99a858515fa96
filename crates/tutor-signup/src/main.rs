//! tutor-signup CLI.
//!
//! Drives the scheduling engine against an HTTP row store: signup,
//! removal, roster display, and per-day After-School enablement.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tutor_signup::{
    Confirmer, EnableOutcome, HttpRegistry, RemovalOutcome, Roster, SchedulingEngine,
    SignupOutcome, SignupRequest, Weekday,
};

#[derive(Parser)]
#[command(name = "tutor-signup")]
#[command(about = "Weekday tutoring session signups against a shared registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Registry base URL
    #[arg(long, env = "REGISTRY_URL", default_value = "http://localhost:8080")]
    registry_url: String,

    /// Answer yes to every confirmation prompt
    #[arg(long, short)]
    yes: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up for sessions on a day.
    Signup {
        /// Full name
        name: String,
        /// Day (Monday..Friday)
        day: Weekday,
        /// Request the EP1 slot
        #[arg(long)]
        ep1: bool,
        /// Request the EP2 slot
        #[arg(long)]
        ep2: bool,
        /// Request the After School slot
        #[arg(long)]
        after: bool,
    },

    /// Remove yourself from one or more days.
    Remove {
        /// Full name
        name: String,
        /// Days to clear (Monday..Friday)
        #[arg(required = true)]
        days: Vec<Weekday>,
    },

    /// Show the roster for a day, or the whole week.
    Roster {
        /// Day (omit for the full week)
        day: Option<Weekday>,
        /// Emit JSON instead of the text table
        #[arg(long)]
        json: bool,
    },

    /// Show which sessions can be requested for a day.
    Sessions {
        /// Day (Monday..Friday)
        day: Weekday,
    },

    /// Enable the After School slot for a day.
    EnableAfter {
        /// Day (Monday..Friday)
        day: Weekday,
    },
}

/// Confirmation via stdin, or auto-yes under `--yes`.
struct CliConfirmer {
    assume_yes: bool,
}

impl Confirmer for CliConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn print_roster(day: Weekday, roster: &Roster) {
    println!("{day}");
    for (label, names) in [
        ("EP1", &roster.ep1),
        ("EP2", &roster.ep2),
        ("After School", &roster.after),
    ] {
        if names.is_empty() {
            println!("  {label}: -");
        } else {
            println!("  {label}: {}", names.join(", "));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = HttpRegistry::new(&cli.registry_url)
        .with_context(|| format!("bad registry URL: {}", cli.registry_url))?;
    let engine = SchedulingEngine::new(registry, CliConfirmer { assume_yes: cli.yes });

    match cli.command {
        Commands::Signup {
            name,
            day,
            ep1,
            ep2,
            after,
        } => {
            let request = SignupRequest {
                name,
                day,
                want_ep1: ep1,
                want_ep2: ep2,
                want_after: after,
            };
            match engine.signup(&request).await? {
                SignupOutcome::Enrolled(sessions) => {
                    let listed: Vec<&str> = sessions.iter().map(|s| s.as_str()).collect();
                    println!("Signup complete: {} on {}", listed.join(", "), day);
                }
                SignupOutcome::Cancelled => println!("Signup cancelled."),
            }
        }

        Commands::Remove { name, days } => match engine.remove(&name, &days).await? {
            RemovalOutcome::Removed { deleted } => {
                println!("Removed {deleted} signup(s) across the selected days.");
            }
            RemovalOutcome::Cancelled => println!("Removal cancelled."),
        },

        Commands::Roster { day, json } => {
            let days: Vec<Weekday> = match day {
                Some(day) => vec![day],
                None => Weekday::ALL.to_vec(),
            };
            if json {
                let mut week = Vec::with_capacity(days.len());
                for day in &days {
                    let roster = engine.compute_roster(*day).await?;
                    week.push(serde_json::json!({ "day": day.as_str(), "roster": roster }));
                }
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                for day in days {
                    let roster = engine.compute_roster(day).await?;
                    print_roster(day, &roster);
                }
            }
        }

        Commands::Sessions { day } => {
            let sessions = engine.selectable_sessions(day).await?;
            let listed: Vec<&str> = sessions.iter().map(|s| s.as_str()).collect();
            println!("{day}: {}", listed.join(", "));
        }

        Commands::EnableAfter { day } => match engine.enable_after_school(day).await? {
            EnableOutcome::Enabled => println!("After School enabled for {day}."),
            EnableOutcome::AlreadyEnabled => println!("After School already enabled for {day}."),
        },
    }

    Ok(())
}
