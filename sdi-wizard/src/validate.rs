//! Submit-time rule checks.
//!
//! Rules run in a fixed order and stop at the first violation. Nothing is
//! cached; every submit re-checks the current state.

use sdi_core::{LeaderInformation, GENDER_NOT_SELECTED};

use crate::error::ValidationError;
use crate::form::{FormState, MemberForm, MemberSlot, Participant};

/// Check both member forms, member 2 first.
pub fn validate(form: &FormState) -> Result<(), ValidationError> {
    for slot in MemberSlot::ALL {
        validate_member(form.member(slot), slot, form.come_from_esatic)?;
    }
    Ok(())
}

/// Check one member form.
pub fn validate_member(
    member: &MemberForm,
    slot: MemberSlot,
    come_from_esatic: bool,
) -> Result<(), ValidationError> {
    let who = Participant::Member(slot);

    if is_blank(&member.last_name) || is_blank(&member.first_name) || is_blank(&member.email) {
        return Err(ValidationError::MissingIdentity(who));
    }
    if come_from_esatic && is_blank(&member.matricule) {
        return Err(ValidationError::MissingMatricule(who));
    }
    if member.gender == GENDER_NOT_SELECTED {
        return Err(ValidationError::MissingGender(who));
    }
    if come_from_esatic && member.class == 0 {
        return Err(ValidationError::MissingClass(who));
    }
    if !come_from_esatic && member.school == 0 {
        return Err(ValidationError::MissingSchool(who));
    }
    Ok(())
}

/// Check the leader record entered on the first step.
///
/// Same rules as a member, plus a level and a team name. External teams
/// name their school as free text.
pub fn validate_leader(
    leader: &LeaderInformation,
    come_from_esatic: bool,
) -> Result<(), ValidationError> {
    let who = Participant::Leader;
    let blank = |field: &Option<String>| field.as_deref().map_or(true, is_blank);

    if blank(&leader.last_name) || blank(&leader.first_name) || blank(&leader.email) {
        return Err(ValidationError::MissingIdentity(who));
    }
    if come_from_esatic && blank(&leader.matricule) {
        return Err(ValidationError::MissingMatricule(who));
    }
    if leader
        .gender
        .as_deref()
        .map_or(true, |label| sdi_core::gender_value(label) == GENDER_NOT_SELECTED)
    {
        return Err(ValidationError::MissingGender(who));
    }
    if leader.level.map_or(true, |level| level == 0) {
        return Err(ValidationError::MissingLevel);
    }
    if come_from_esatic && leader.class.map_or(true, |class| class == 0) {
        return Err(ValidationError::MissingClass(who));
    }
    if !come_from_esatic && blank(&leader.school) {
        return Err(ValidationError::MissingSchool(who));
    }
    if blank(&leader.team_name) {
        return Err(ValidationError::MissingTeamName);
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
