//! # sdi-api
//!
//! Remote collaborators of the registration client: the team-registration
//! call, the team-listing call, and the user-facing notices they raise.

pub mod client;
pub mod error;
pub mod notice;
pub mod teams;

pub use client::{HttpClient, RegistrationApi, RegistrationReply, TeamsApi, TeamsData, TeamsReply};
pub use error::ApiError;
pub use notice::{Notice, NoticeKind, NoticeLog, Notifier};
pub use teams::fetch_teams;
