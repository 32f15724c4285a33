//! Submission orchestration.
//!
//! ```text
//! Idle ──▶ Validating ──▶ Submitting ──▶ Success
//!  ▲           │               │
//!  └───────────┘               ▼
//!  ▲                        Failed
//!  └───────────────────────────┘
//! ```
//!
//! Only [`Phase::Idle`] accepts a new attempt, so a second submit while one
//! is running is rejected. Persisted wizard state is purged only after the
//! backend confirms the registration; every failure leaves it in place.

use std::fmt;
use std::time::Duration;

use sdi_api::{RegistrationApi, RegistrationReply};
use sdi_core::{keys, KeyValueStore, MemberInformation, StoredValues, TeamRegistrationData};

use crate::error::SubmitError;
use crate::form::{FormState, MemberSlot};
use crate::loader::stored_leader;
use crate::payload::build_payload;
use crate::validate::validate;

/// Message used when the backend rejects a team without saying why.
pub const REJECTED_WITHOUT_REASON: &str = "registration failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

impl Phase {
    /// Allowed transitions.
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Validating)
                | (Phase::Validating, Phase::Idle)
                | (Phase::Validating, Phase::Submitting)
                | (Phase::Submitting, Phase::Success)
                | (Phase::Submitting, Phase::Failed)
                | (Phase::Failed, Phase::Idle)
        )
    }

    /// Whether the submit control should be disabled.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Validating | Phase::Submitting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Validating => write!(f, "validating"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::Success => write!(f, "success"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

/// A confirmed registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    /// Payload that was accepted.
    pub team: TeamRegistrationData,
    pub reply: RegistrationReply,
    /// Number of wizard keys removed afterwards.
    pub purged: usize,
}

/// Drives one registration from submit intent to a terminal outcome.
#[derive(Debug, Clone)]
pub struct Submission {
    phase: Phase,
    success_delay: Duration,
}

impl Submission {
    /// `success_delay` is how long the success screen is held before
    /// [`Submission::submit`] returns.
    pub fn new(success_delay: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            success_delay,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance(&mut self, next: Phase) -> Result<(), SubmitError> {
        if !self.phase.can_advance_to(next) {
            return Err(SubmitError::IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(from = %self.phase, to = %next, "submission phase");
        self.phase = next;
        Ok(())
    }

    /// Validate `form`, then register the team.
    ///
    /// On success the wizard keys are purged and the phase ends at
    /// [`Phase::Success`]. On any failure the phase returns to
    /// [`Phase::Idle`] and storage keeps the entered data.
    pub fn submit<S, A>(
        &mut self,
        form: &FormState,
        storage: &mut StoredValues<S>,
        api: &A,
    ) -> Result<Registered, SubmitError>
    where
        S: KeyValueStore,
        A: RegistrationApi + ?Sized,
    {
        self.advance(Phase::Validating)?;
        if let Err(err) = validate(form) {
            self.advance(Phase::Idle)?;
            return Err(err.into());
        }

        self.advance(Phase::Submitting)?;
        match send(form, storage, api) {
            Ok((team, reply)) => {
                let purged = storage.purge(&keys::WIZARD_KEYS);
                tracing::info!(team = %team.nom_groupe, purged, "team registered");
                if !self.success_delay.is_zero() {
                    std::thread::sleep(self.success_delay);
                }
                self.advance(Phase::Success)?;
                Ok(Registered {
                    team,
                    reply,
                    purged,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                self.advance(Phase::Failed)?;
                self.advance(Phase::Idle)?;
                Err(err)
            }
        }
    }
}

/// Persist the forms, rebuild the payload from storage and call the backend.
fn send<S, A>(
    form: &FormState,
    storage: &mut StoredValues<S>,
    api: &A,
) -> Result<(TeamRegistrationData, RegistrationReply), SubmitError>
where
    S: KeyValueStore,
    A: RegistrationApi + ?Sized,
{
    form.persist(storage)?;

    let leader = stored_leader(storage).ok_or(SubmitError::MissingRecord {
        key: keys::LEADER_INFORMATION,
    })?;
    let member_2 = stored_member(storage, MemberSlot::First)?;
    let member_3 = stored_member(storage, MemberSlot::Second)?;

    let team = build_payload(&leader, &member_2, &member_3, form.come_from_esatic);
    let reply = api.register_team(&team)?;
    if !reply.is_success() {
        return Err(SubmitError::Rejected {
            message: reply
                .message
                .clone()
                .unwrap_or_else(|| REJECTED_WITHOUT_REASON.to_string()),
        });
    }
    Ok((team, reply))
}

fn stored_member<S: KeyValueStore>(
    storage: &StoredValues<S>,
    slot: MemberSlot,
) -> Result<MemberInformation, SubmitError> {
    storage
        .get(slot.storage_key())
        .ok_or(SubmitError::MissingRecord {
            key: slot.storage_key(),
        })
}
