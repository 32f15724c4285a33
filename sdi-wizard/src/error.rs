//! Error types for sdi-wizard.

use thiserror::Error;

use sdi_api::ApiError;
use sdi_core::StoreError;

use crate::form::Participant;
use crate::submission::Phase;

/// First rule a form violates. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in every required field for {0}")]
    MissingIdentity(Participant),

    #[error("the matricule of {0} is required")]
    MissingMatricule(Participant),

    #[error("please select the gender of {0}")]
    MissingGender(Participant),

    #[error("please select the class of {0}")]
    MissingClass(Participant),

    #[error("please select the school of {0}")]
    MissingSchool(Participant),

    #[error("please select the level of the team")]
    MissingLevel,

    #[error("please choose a team name")]
    MissingTeamName,
}

impl ValidationError {
    /// Who the failing rule is about, when it concerns a person.
    pub fn participant(&self) -> Option<Participant> {
        match self {
            ValidationError::MissingIdentity(p)
            | ValidationError::MissingMatricule(p)
            | ValidationError::MissingGender(p)
            | ValidationError::MissingClass(p)
            | ValidationError::MissingSchool(p) => Some(*p),
            ValidationError::MissingLevel | ValidationError::MissingTeamName => None,
        }
    }
}

/// Why a submission attempt did not register the team.
///
/// Business rejections ([`SubmitError::Rejected`]) and transport or decoding
/// failures ([`SubmitError::Api`]) are kept apart.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An upstream wizard record is absent or unreadable.
    #[error("registration data is missing ({key}); please restart the registration")]
    MissingRecord { key: &'static str },

    /// The backend answered with a falsy status.
    #[error("registration was rejected: {message}")]
    Rejected { message: String },

    #[error("registration request failed: {0}")]
    Api(#[from] ApiError),

    #[error("cannot save registration progress: {0}")]
    Store(#[from] StoreError),

    /// Submit attempted while another attempt is running or after success.
    #[error("cannot move from {from} to {to}")]
    IllegalTransition { from: Phase, to: Phase },
}

impl SubmitError {
    /// Whether the user may correct the form and submit again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SubmitError::IllegalTransition { .. })
    }
}
