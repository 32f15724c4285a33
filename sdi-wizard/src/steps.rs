//! Earlier wizard steps: choosing the team origin and entering the leader.
//!
//! These only write the records the members step reads back.

use sdi_core::{keys, KeyValueStore, LeaderInformation, Level, StoreError, StoredValues};

use crate::error::ValidationError;
use crate::validate::validate_leader;

/// Open a registration: record the team origin and the level reference list.
pub fn start<S: KeyValueStore>(
    storage: &mut StoredValues<S>,
    come_from_esatic: bool,
    levels: &[Level],
) -> Result<(), StoreError> {
    storage.set(keys::COME_FROM_ESATIC, &come_from_esatic)?;
    storage.set(keys::LEVELS_LIST, levels)?;
    tracing::debug!(esatic = come_from_esatic, levels = levels.len(), "wizard started");
    Ok(())
}

/// Team origin recorded by [`start`]; host institution when unset.
pub fn come_from_esatic<S: KeyValueStore>(storage: &StoredValues<S>) -> bool {
    storage.get::<bool>(keys::COME_FROM_ESATIC).unwrap_or(true)
}

#[derive(Debug, thiserror::Error)]
pub enum LeaderStepError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate and store the leader record.
pub fn save_leader<S: KeyValueStore>(
    storage: &mut StoredValues<S>,
    leader: &LeaderInformation,
) -> Result<(), LeaderStepError> {
    validate_leader(leader, come_from_esatic(storage))?;
    storage.set(keys::LEADER_INFORMATION, leader)?;
    Ok(())
}

/// Abandon the registration, dropping every wizard key.
///
/// Every key is attempted; the first failure is returned once all have been
/// tried.
pub fn reset<S: KeyValueStore>(storage: &mut StoredValues<S>) -> Result<usize, StoreError> {
    let mut removed = 0;
    let mut first_error = None;
    for key in keys::WIZARD_KEYS {
        match storage.remove(key) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to remove wizard key");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(removed),
    }
}
