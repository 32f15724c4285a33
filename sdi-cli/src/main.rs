//! SDI: hackathon team registration client.
//!
//! # Usage
//!
//! ```text
//! sdi wizard start [--external] [--levels <file.json>]
//! sdi wizard leader --level <N> --last-name <..> --first-name <..> --email <..> --gender <..> --team-name <..> [--matricule <..>] [--class <N>] [--school <..>]
//! sdi wizard members --member 2|3 [--matricule ..] [--last-name ..] [--first-name ..] [--email ..] [--gender ..] [--class N] [--school N]
//! sdi wizard show [--json]
//! sdi wizard submit
//! sdi wizard reset
//! sdi login --token <token>
//! sdi teams [--filter <json>] [--json]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{login::LoginArgs, teams::TeamsArgs, wizard::WizardCommand};
use sdi_core::{gender_label, GENDER_OPTIONS};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sdi",
    version,
    about = "Register a hackathon team and browse registered teams",
    long_about = None,
)]
struct Cli {
    /// Backend base URL (overrides config file and SDI_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk through the team registration steps.
    Wizard {
        #[command(subcommand)]
        command: WizardCommand,
    },

    /// Store the session token used to list teams.
    Login(LoginArgs),

    /// List registered teams.
    Teams(TeamsArgs),
}

// ---------------------------------------------------------------------------
// Shared gender argument, parsed from its label
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse a gender option from its label.
#[derive(Debug, Clone, Copy)]
pub struct GenderArg(pub u32);

impl FromStr for GenderArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GENDER_OPTIONS
            .iter()
            .find(|(_, label)| label.eq_ignore_ascii_case(s.trim()))
            .map(|(value, _)| Self(*value))
            .ok_or_else(|| {
                let expected: Vec<&str> = GENDER_OPTIONS.iter().map(|(_, l)| *l).collect();
                format!("unknown gender '{s}'; expected: {}", expected.join(", "))
            })
    }
}

impl fmt::Display for GenderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&gender_label(self.0))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let session = commands::Session::open(cli.api_url)?;
    match cli.command {
        Commands::Wizard { command } => commands::wizard::run(&session, command),
        Commands::Login(args) => args.run(&session),
        Commands::Teams(args) => args.run(&session),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
