pub mod login;
pub mod teams;
pub mod wizard;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use sdi_api::{HttpClient, NoticeKind, Notifier};
use sdi_core::{settings, SecureFileStore, Settings, StoredValues};

/// Resolved home directory and settings shared by every subcommand.
#[derive(Debug)]
pub struct Session {
    pub home: PathBuf,
    pub settings: Settings,
}

impl Session {
    /// Load settings for the current user; `api_url` wins over config and env.
    pub fn open(api_url: Option<String>) -> Result<Self> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        let mut settings = settings::load_at(&home).context("failed to load settings")?;
        if let Some(url) = api_url {
            settings.api_url = url.trim_end_matches('/').to_string();
        }
        tracing::debug!(api_url = %settings.api_url, namespace = %settings.namespace, "session opened");
        Ok(Self { home, settings })
    }

    pub fn storage(&self) -> StoredValues<SecureFileStore> {
        StoredValues::new(SecureFileStore::open_at(
            &self.home,
            &self.settings.namespace,
            &self.settings.storage_secret,
        ))
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::new(&self.settings.api_url)
    }
}

/// Prints notices as coloured status lines.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => println!("{} {message}", "✓".green()),
            NoticeKind::Error => eprintln!("{} {message}", "✗".red()),
        }
    }
}
