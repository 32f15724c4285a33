//! Restores the members step from persisted wizard state.
//!
//! Stored records may be partial or stale (written by an older step, edited
//! by hand, half-saved). Each field is taken only when it has the expected
//! JSON type; anything else is skipped without error.

use serde_json::{Map, Value};

use sdi_core::{
    gender_value, keys, KeyValueStore, LeaderInformation, Level, SelectOption, StoredValues,
};

use crate::form::{FormState, MemberForm, MemberSlot};

/// Member fields recovered from a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMember {
    pub matricule: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    /// Option id decoded from the stored label.
    pub gender: Option<u32>,
    pub class: Option<u32>,
}

impl PartialMember {
    /// Parse a stored member record. `None` when `value` is not an object.
    pub fn parse(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            matricule: string_field(record, "matricule"),
            last_name: string_field(record, "lastName"),
            first_name: string_field(record, "firstName"),
            email: string_field(record, "email"),
            gender: string_field(record, "gender").map(|label| gender_value(&label)),
            class: number_field(record, "class"),
        })
    }

    /// Copy the recovered fields into `form`, leaving the others untouched.
    ///
    /// A stored class fills both the class and the school selection; which one
    /// counts is decided later by the esatic flag.
    pub fn apply_to(&self, form: &mut MemberForm) {
        if let Some(v) = &self.matricule {
            form.matricule = v.clone();
        }
        if let Some(v) = &self.last_name {
            form.last_name = v.clone();
        }
        if let Some(v) = &self.first_name {
            form.first_name = v.clone();
        }
        if let Some(v) = &self.email {
            form.email = v.clone();
        }
        if let Some(v) = self.gender {
            form.gender = v;
        }
        if let Some(v) = self.class {
            form.class = v;
            form.school = v;
        }
    }
}

/// Parse a stored leader record field by field.
///
/// `None` only when `value` is not an object; a field of the wrong JSON type
/// is left unset instead of rejecting the whole record.
pub fn parse_leader(value: &Value) -> Option<LeaderInformation> {
    let record = value.as_object()?;
    Some(LeaderInformation {
        level: number_field(record, "level"),
        matricule: string_field(record, "matricule"),
        last_name: string_field(record, "lastName"),
        first_name: string_field(record, "firstName"),
        email: string_field(record, "email"),
        gender: string_field(record, "gender"),
        school: string_field(record, "school"),
        class: number_field(record, "class"),
        team_name: string_field(record, "teamName"),
    })
}

/// Leader record from storage, read with [`parse_leader`].
pub fn stored_leader<S: KeyValueStore>(storage: &StoredValues<S>) -> Option<LeaderInformation> {
    let value = storage.get_value(keys::LEADER_INFORMATION)?;
    let leader = parse_leader(&value);
    if leader.is_none() {
        tracing::debug!(key = keys::LEADER_INFORMATION, "stored leader is not a record");
    }
    leader
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key)?.as_str().map(str::to_string)
}

fn number_field(record: &Map<String, Value>, key: &str) -> Option<u32> {
    let number = record.get(key)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64)
    })?;
    u32::try_from(whole).ok()
}

/// Class options for the leader's level.
///
/// Scans `levels` for entries whose value equals the leader's level; the last
/// match wins. Empty when either input is missing or nothing matches.
pub fn resolve_class_options(
    leader: Option<&LeaderInformation>,
    levels: &[Level],
) -> Vec<SelectOption> {
    let Some(level) = leader.and_then(|l| l.level) else {
        return Vec::new();
    };
    levels
        .iter()
        .filter(|candidate| candidate.value == level)
        .last()
        .map(|matched| matched.classes.clone())
        .unwrap_or_default()
}

/// Levels from storage. Entries that do not parse are skipped; `None` when
/// the stored value is absent or not an array.
fn stored_levels<S: KeyValueStore>(storage: &StoredValues<S>) -> Option<Vec<Level>> {
    let value = storage.get_value(keys::LEVELS_LIST)?;
    let entries = value.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<Level>(entry.clone()) {
                Ok(level) => Some(level),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping malformed level entry");
                    None
                }
            })
            .collect(),
    )
}

/// Build the members step state from storage.
///
/// Never fails: whatever cannot be read keeps its default.
pub fn load_form<S: KeyValueStore>(storage: &StoredValues<S>) -> FormState {
    let mut form = FormState::default();

    if let Some(esatic) = storage.get::<bool>(keys::COME_FROM_ESATIC) {
        form.come_from_esatic = esatic;
    }

    let leader = stored_leader(storage);
    if let (Some(leader), Some(levels)) = (leader.as_ref(), stored_levels(storage)) {
        form.list_class = resolve_class_options(Some(leader), &levels);
    }

    for slot in MemberSlot::ALL {
        let Some(value) = storage.get_value(slot.storage_key()) else {
            continue;
        };
        match PartialMember::parse(&value) {
            Some(partial) => partial.apply_to(form.member_mut(slot)),
            None => tracing::debug!(key = slot.storage_key(), "stored member is not a record"),
        }
    }

    tracing::debug!(
        esatic = form.come_from_esatic,
        classes = form.list_class.len(),
        "loaded members step"
    );
    form
}
