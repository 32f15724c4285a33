//! Team-listing screen data source.

use serde_json::Value;

use sdi_core::{keys, KeyValueStore, StoredValues, Team};

use crate::client::TeamsApi;
use crate::notice::{NoticeKind, Notifier};

pub const LIST_UPDATED: &str = "Team list updated";
pub const SERVER_ERROR: &str = "Server error";
pub const UNEXPECTED_ERROR: &str = "Something went wrong";

/// Fetch registered teams matching `filter`.
///
/// The bearer token is read from the persisted session. Never fails: any
/// rejection or error yields an empty list, and a notice is emitted on every
/// path.
pub fn fetch_teams<A, S, N>(
    api: &A,
    storage: &StoredValues<S>,
    notifier: &N,
    filter: &Value,
) -> Vec<Team>
where
    A: TeamsApi + ?Sized,
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    let token = storage.get::<String>(keys::SESSION_TOKEN);
    if token.is_none() {
        tracing::debug!("no session token stored; listing without authorization");
    }

    match api.render_teams(filter, token.as_deref()) {
        Ok(reply) if reply.status => {
            notifier.notify(NoticeKind::Success, LIST_UPDATED);
            reply.data.map(|data| data.equipes).unwrap_or_default()
        }
        Ok(reply) => {
            let message = reply.message.as_deref().unwrap_or(SERVER_ERROR);
            tracing::info!(reason = message, "team listing rejected");
            notifier.notify(NoticeKind::Error, message);
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(error = %err, "team listing failed");
            notifier.notify(NoticeKind::Error, UNEXPECTED_ERROR);
            Vec::new()
        }
    }
}
