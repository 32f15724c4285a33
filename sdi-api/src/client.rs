//! Backend calls and their HTTP implementation.
//!
//! The workflow depends on the [`RegistrationApi`] and [`TeamsApi`] traits so
//! tests can stand in for the backend; [`HttpClient`] is the real thing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use sdi_core::{Team, TeamRegistrationData};

use crate::error::ApiError;

pub const REGISTER_PATH: &str = "/api/groupe/register";
pub const RENDER_PATH: &str = "/api/groupe/render";

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Answer of the registration endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationReply {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RegistrationReply {
    /// The backend accepted the team.
    pub fn is_success(&self) -> bool {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamsData {
    /// Entries that are not JSON objects are dropped.
    #[serde(deserialize_with = "object_entries")]
    pub equipes: Vec<Team>,
}

/// Answer of the team-listing endpoint.
///
/// Decoding never fails on field types: `status` holds only for a literal
/// `true`, and mistyped `data` or `message` read as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamsReply {
    #[serde(deserialize_with = "literal_true")]
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "teams_data")]
    pub data: Option<TeamsData>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "text_only")]
    pub message: Option<String>,
}

fn literal_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(deserializer)? == Value::Bool(true))
}

fn text_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn teams_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<TeamsData>, D::Error> {
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

fn object_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Team>, D::Error> {
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(fields) => Some(Team(fields)),
            _ => None,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait RegistrationApi {
    fn register_team(&self, team: &TeamRegistrationData) -> Result<RegistrationReply, ApiError>;
}

pub trait TeamsApi {
    /// Post `filter` to the listing endpoint, authorized by `bearer` when set.
    fn render_teams(&self, filter: &Value, bearer: Option<&str>) -> Result<TeamsReply, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Blocking JSON-over-HTTP client for the registration backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url><path>`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post_json<B, T>(&self, path: &str, body: &B, bearer: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let body = serde_json::to_value(body)?;

        let mut request = self.agent.post(&url);
        if let Some(token) = bearer {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        tracing::debug!(url = %url, "POST");
        let response = request
            .send_json(body)
            .map_err(|err| ApiError::from_ureq(&url, err))?;
        response
            .into_json::<T>()
            .map_err(|source| ApiError::Decode { url, source })
    }
}

impl RegistrationApi for HttpClient {
    fn register_team(&self, team: &TeamRegistrationData) -> Result<RegistrationReply, ApiError> {
        self.post_json(REGISTER_PATH, team, None)
    }
}

impl TeamsApi for HttpClient {
    fn render_teams(&self, filter: &Value, bearer: Option<&str>) -> Result<TeamsReply, ApiError> {
        self.post_json(RENDER_PATH, filter, bearer)
    }
}
