use anyhow::{Context, Result};
use clap::Args;
use sdi_core::keys;

use super::Session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Session token issued by the backend.
    #[arg(long)]
    pub token: String,
}

impl LoginArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let token = self.token.trim();
        if token.is_empty() {
            anyhow::bail!("session token must not be empty");
        }
        let mut storage = session.storage();
        storage
            .set(keys::SESSION_TOKEN, token)
            .context("failed to store session token")?;
        println!("✓ Session token saved");
        Ok(())
    }
}
