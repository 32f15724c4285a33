use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use sdi_api::{fetch_teams, NoticeLog};
use sdi_core::Team;
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use super::{ConsoleNotifier, Session};

#[derive(Args, Debug)]
pub struct TeamsArgs {
    /// Filter object sent to the backend, as JSON.
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub filter: String,

    /// Print the raw team records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "Team")]
    name: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Leader")]
    leader: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name(),
            level: team.level(),
            leader: team.leader(),
            email: team.leader_email(),
            origin: if team.from_esatic() { "ESATIC" } else { "external" }.to_string(),
        }
    }
}

impl TeamsArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let filter: Value =
            serde_json::from_str(&self.filter).context("--filter is not valid JSON")?;
        let storage = session.storage();
        let client = session.client();

        if self.json {
            // Keep stdout machine-readable; notices go to stderr.
            let log = NoticeLog::new();
            let teams = fetch_teams(&client, &storage, &log, &filter);
            for notice in log.notices() {
                eprintln!("{}: {}", notice.kind, notice.message);
            }
            println!("{}", serde_json::to_string_pretty(&teams)?);
            return Ok(());
        }

        let teams = fetch_teams(&client, &storage, &ConsoleNotifier, &filter);
        if teams.is_empty() {
            println!("No teams.");
            return Ok(());
        }
        let rows: Vec<TeamRow> = teams.iter().map(TeamRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{}", format!("{} team(s)", teams.len()).dimmed());
        Ok(())
    }
}
