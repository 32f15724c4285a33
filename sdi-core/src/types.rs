//! Records exchanged between the registration wizard steps and the backend.
//!
//! Records persisted between steps use camelCase keys; the registration
//! payload uses the backend's snake_case field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Select options
// ---------------------------------------------------------------------------

/// One entry of a select list: numeric id plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: u32,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: u32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// An education level and the classes that may be chosen under it.
///
/// Reference data written by an earlier step; never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub value: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub classes: Vec<SelectOption>,
}

// ---------------------------------------------------------------------------
// Gender options
// ---------------------------------------------------------------------------

/// Id meaning "nothing chosen yet".
pub const GENDER_NOT_SELECTED: u32 = 0;

/// Gender options offered by the member forms, `(id, label)`.
pub const GENDER_OPTIONS: [(u32, &str); 2] = [(1, "Homme"), (2, "Femme")];

/// Resolve a persisted gender label back to its option id.
///
/// Unknown labels map to [`GENDER_NOT_SELECTED`].
pub fn gender_value(label: &str) -> u32 {
    GENDER_OPTIONS
        .iter()
        .find(|(_, l)| *l == label)
        .map(|(v, _)| *v)
        .unwrap_or(GENDER_NOT_SELECTED)
}

/// Label persisted for a gender option id; empty for unknown ids.
pub fn gender_label(value: u32) -> String {
    GENDER_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, l)| (*l).to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Persisted wizard records
// ---------------------------------------------------------------------------

/// Team leader details captured by the first wizard step.
///
/// Every field is optional on read so a partially written record still
/// deserializes; defaults are applied when the registration payload is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Gender label (e.g. `"Homme"`), not the option id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

/// A team member as persisted between wizard steps.
///
/// `class` holds either the class id (host-institution teams) or the school
/// id (external teams); the esatic flag decides which one was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberInformation {
    pub matricule: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub gender: String,
    pub class: u32,
}

// ---------------------------------------------------------------------------
// Backend payloads
// ---------------------------------------------------------------------------

/// Placeholder sent while team photos are not collected by the wizard.
pub const DEFAULT_TEAM_PHOTO: &str = "pas_de_photo.png";

/// Fallback team name when the leader record carries none.
pub const DEFAULT_TEAM_NAME: &str = "Equipe";

/// Flattened leader + two members record posted to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRegistrationData {
    /// `1` when the team comes from the host institution, `0` otherwise.
    pub esatic: u8,
    pub niveau: u32,
    pub nom_groupe: String,
    pub photo_groupe: String,

    pub matricule_chef: String,
    pub nom_chef: String,
    pub prenom_chef: String,
    pub classe_chef: u32,
    pub email_chef: String,
    pub genre_chef: String,

    pub matricule_m2: String,
    pub nom_m2: String,
    pub prenom_m2: String,
    pub classe_m2: u32,
    pub email_m2: String,
    pub genre_m2: String,

    pub matricule_m3: String,
    pub nom_m3: String,
    pub prenom_m3: String,
    pub classe_m3: u32,
    pub email_m3: String,
    pub genre_m3: String,
}

/// A registered team as returned by the listing endpoint.
///
/// The backend shape is loose, so every field is kept and read on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Team(pub Map<String, Value>);

impl Team {
    /// Text rendering of `field`: strings as-is, numbers and booleans
    /// formatted, anything else (or absent) empty.
    pub fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn name(&self) -> String {
        self.text("nom_groupe")
    }

    pub fn level(&self) -> String {
        self.text("niveau")
    }

    /// Leader display name, `"<first> <last>"`.
    pub fn leader(&self) -> String {
        let first = self.text("prenom_chef");
        let last = self.text("nom_chef");
        format!("{first} {last}").trim().to_string()
    }

    pub fn leader_email(&self) -> String {
        self.text("email_chef")
    }

    /// Whether the team is flagged as coming from the host institution.
    pub fn from_esatic(&self) -> bool {
        match self.0.get("esatic") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_u64().is_some_and(|v| v != 0),
            Some(Value::String(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gender_label_and_value_are_inverse() {
        for (value, label) in GENDER_OPTIONS {
            assert_eq!(gender_value(label), value);
            assert_eq!(gender_label(value), label);
        }
    }

    #[test]
    fn unknown_gender_maps_to_sentinel() {
        assert_eq!(gender_value("Autre"), GENDER_NOT_SELECTED);
        assert_eq!(gender_label(GENDER_NOT_SELECTED), "");
        assert_eq!(gender_label(42), "");
    }

    #[test]
    fn leader_reads_camel_case_and_tolerates_missing_fields() {
        let leader: LeaderInformation = serde_json::from_value(json!({
            "level": 2,
            "lastName": "Kouame",
            "teamName": "Byte Force"
        }))
        .expect("leader");
        assert_eq!(leader.level, Some(2));
        assert_eq!(leader.last_name.as_deref(), Some("Kouame"));
        assert_eq!(leader.team_name.as_deref(), Some("Byte Force"));
        assert_eq!(leader.class, None);
        assert_eq!(leader.email, None);
    }

    #[test]
    fn member_serializes_with_camel_case_keys() {
        let member = MemberInformation {
            matricule: "21-ESATIC001".into(),
            last_name: "Koffi".into(),
            first_name: "Ange".into(),
            email: "a@b.com".into(),
            gender: "Homme".into(),
            class: 5,
        };
        let value = serde_json::to_value(&member).expect("serialize");
        assert_eq!(value["lastName"], "Koffi");
        assert_eq!(value["firstName"], "Ange");
        assert_eq!(value["class"], 5);
    }

    #[test]
    fn team_accessors_render_loose_fields() {
        let team: Team = serde_json::from_value(json!({
            "id": 7,
            "nom_groupe": "Null Pointers",
            "niveau": 3,
            "prenom_chef": "Awa",
            "nom_chef": "Traore",
            "esatic": 1
        }))
        .expect("team");
        assert_eq!(team.name(), "Null Pointers");
        assert_eq!(team.level(), "3");
        assert_eq!(team.leader(), "Awa Traore");
        assert_eq!(team.leader_email(), "");
        assert!(team.from_esatic());
        assert_eq!(team.text("id"), "7");
    }
}
