//! # sdi-wizard
//!
//! Team registration workflow: restore the member forms from the persisted
//! wizard state, validate them, and submit the assembled team to the backend.
//!
//! Call [`load_form`] when the members step opens, [`FormState::persist`]
//! when navigating back, and [`Submission::submit`] on submit.

pub mod error;
pub mod form;
pub mod loader;
pub mod payload;
pub mod steps;
pub mod submission;
pub mod validate;

pub use error::{SubmitError, ValidationError};
pub use form::{FormState, MemberForm, MemberSlot, Participant};
pub use loader::{load_form, parse_leader, resolve_class_options, stored_leader, PartialMember};
pub use payload::build_payload;
pub use steps::LeaderStepError;
pub use submission::{Phase, Registered, Submission};
pub use validate::{validate, validate_leader};
