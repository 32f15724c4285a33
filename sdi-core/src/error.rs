//! Error types for sdi-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from key-value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error for a single value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store document itself is not valid JSON.
    #[error("failed to parse store at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The entry is not valid hex or is shorter than a nonce.
    #[error("malformed ciphertext for '{key}': {reason}")]
    Encoding { key: String, reason: String },

    /// Authentication failed: wrong secret or tampered entry.
    #[error("cannot decrypt value for '{key}'")]
    Decrypt { key: String },

    #[error("cannot encrypt value for '{key}'")]
    Encrypt { key: String },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/.sdi/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Errors raised while loading [`crate::Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error, with the config file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be interpreted.
    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
