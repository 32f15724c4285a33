//! In-memory state of the members step.
//!
//! Fields are plain and set directly by whatever edits them; nothing is
//! derived. Gender, class and school are option ids, `0` meaning "not chosen".

use std::fmt;

use sdi_core::{
    gender_label, keys, KeyValueStore, MemberInformation, SelectOption, StoreError, StoredValues,
};

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Which of the two non-leader members a form belongs to.
///
/// The leader is member 1 of the team, so these are shown as members 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberSlot {
    First,
    Second,
}

impl MemberSlot {
    pub const ALL: [MemberSlot; 2] = [MemberSlot::First, MemberSlot::Second];

    /// Persisted key holding this member's record.
    pub fn storage_key(self) -> &'static str {
        match self {
            MemberSlot::First => keys::MEMBER_1,
            MemberSlot::Second => keys::MEMBER_2,
        }
    }

    /// Position in the team, leader included (2 or 3).
    pub fn team_position(self) -> u8 {
        match self {
            MemberSlot::First => 2,
            MemberSlot::Second => 3,
        }
    }

    /// Inverse of [`MemberSlot::team_position`].
    pub fn from_team_position(position: u8) -> Option<Self> {
        match position {
            2 => Some(MemberSlot::First),
            3 => Some(MemberSlot::Second),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            MemberSlot::First => 0,
            MemberSlot::Second => 1,
        }
    }
}

impl fmt::Display for MemberSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member {}", self.team_position())
    }
}

/// A person on the team, for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    Leader,
    Member(MemberSlot),
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Leader => write!(f, "the team leader"),
            Participant::Member(slot) => write!(f, "{slot}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Member form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberForm {
    pub matricule: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub gender: u32,
    pub class: u32,
    pub school: u32,
}

impl MemberForm {
    /// Record persisted for this member. The esatic flag picks whether the
    /// class or the school id is written.
    pub fn to_information(&self, come_from_esatic: bool) -> MemberInformation {
        MemberInformation {
            matricule: self.matricule.clone(),
            last_name: self.last_name.clone(),
            first_name: self.first_name.clone(),
            email: self.email.clone(),
            gender: gender_label(self.gender),
            class: if come_from_esatic {
                self.class
            } else {
                self.school
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Whether the team comes from the host institution.
    pub come_from_esatic: bool,
    /// Class (or school) options for the leader's level.
    pub list_class: Vec<SelectOption>,
    pub(crate) members: [MemberForm; 2],
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            come_from_esatic: true,
            list_class: Vec::new(),
            members: Default::default(),
        }
    }
}

impl FormState {
    pub fn member(&self, slot: MemberSlot) -> &MemberForm {
        &self.members[slot.index()]
    }

    pub fn member_mut(&mut self, slot: MemberSlot) -> &mut MemberForm {
        &mut self.members[slot.index()]
    }

    pub fn member_information(&self, slot: MemberSlot) -> MemberInformation {
        self.member(slot).to_information(self.come_from_esatic)
    }

    /// Label of a class option id, if it belongs to the current list.
    pub fn class_label(&self, id: u32) -> Option<&str> {
        self.list_class
            .iter()
            .find(|option| option.value == id)
            .map(|option| option.label.as_str())
    }

    /// Write both member records back to storage.
    ///
    /// Used when leaving the step and right before submitting, so a retry
    /// resumes from what was entered.
    pub fn persist<S: KeyValueStore>(&self, storage: &mut StoredValues<S>) -> Result<(), StoreError> {
        for slot in MemberSlot::ALL {
            storage.set(slot.storage_key(), &self.member_information(slot))?;
        }
        tracing::debug!(esatic = self.come_from_esatic, "persisted member forms");
        Ok(())
    }
}
