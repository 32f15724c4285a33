//! SDI core library: registration records, persisted wizard keys, the
//! encrypted key-value store and client settings.
//!
//! - [`types`]: records read and written by the registration wizard
//! - [`keys`]: names of the persisted entries
//! - [`store`]: [`KeyValueStore`] trait, [`MemoryStore`] and the [`StoredValues`] accessor
//! - [`secure_store`]: on-disk encrypted store
//! - [`settings`]: client configuration and home-relative paths

pub mod error;
pub mod keys;
pub mod secure_store;
pub mod settings;
pub mod store;
pub mod types;

pub use error::{SettingsError, StoreError};
pub use secure_store::SecureFileStore;
pub use settings::Settings;
pub use store::{KeyValueStore, MemoryStore, StoredValues};
pub use types::{
    gender_label, gender_value, LeaderInformation, Level, MemberInformation, SelectOption, Team,
    TeamRegistrationData, GENDER_NOT_SELECTED, GENDER_OPTIONS,
};
