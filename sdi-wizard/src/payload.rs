//! Registration payload assembly.

use sdi_core::types::{DEFAULT_TEAM_NAME, DEFAULT_TEAM_PHOTO};
use sdi_core::{LeaderInformation, MemberInformation, TeamRegistrationData};

/// Flatten the leader and both members into the backend payload.
///
/// Missing leader fields fall back to `0`, `""` or the default team name so
/// the request is always well-formed. The leader's class is only sent for
/// host-institution teams.
pub fn build_payload(
    leader: &LeaderInformation,
    member_2: &MemberInformation,
    member_3: &MemberInformation,
    come_from_esatic: bool,
) -> TeamRegistrationData {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();

    TeamRegistrationData {
        esatic: u8::from(come_from_esatic),
        niveau: leader.level.unwrap_or(0),
        nom_groupe: leader
            .team_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string()),
        photo_groupe: DEFAULT_TEAM_PHOTO.to_string(),

        matricule_chef: text(&leader.matricule),
        nom_chef: text(&leader.last_name),
        prenom_chef: text(&leader.first_name),
        classe_chef: if come_from_esatic {
            leader.class.unwrap_or(0)
        } else {
            0
        },
        email_chef: text(&leader.email),
        genre_chef: text(&leader.gender),

        matricule_m2: member_2.matricule.clone(),
        nom_m2: member_2.last_name.clone(),
        prenom_m2: member_2.first_name.clone(),
        classe_m2: member_2.class,
        email_m2: member_2.email.clone(),
        genre_m2: member_2.gender.clone(),

        matricule_m3: member_3.matricule.clone(),
        nom_m3: member_3.last_name.clone(),
        prenom_m3: member_3.first_name.clone(),
        classe_m3: member_3.class,
        email_m3: member_3.email.clone(),
        genre_m3: member_3.gender.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(last_name: &str, class: u32) -> MemberInformation {
        MemberInformation {
            matricule: format!("21-ESATIC-{last_name}"),
            last_name: last_name.into(),
            first_name: "Ange".into(),
            email: format!("{last_name}@b.com"),
            gender: "Homme".into(),
            class,
        }
    }

    #[test]
    fn empty_leader_gets_defaults() {
        let team = build_payload(
            &LeaderInformation::default(),
            &member("Koffi", 5),
            &member("Bamba", 6),
            true,
        );
        assert_eq!(team.nom_groupe, "Equipe");
        assert_eq!(team.niveau, 0);
        assert_eq!(team.classe_chef, 0);
        assert_eq!(team.nom_chef, "");
        assert_eq!(team.photo_groupe, "pas_de_photo.png");
    }

    #[test]
    fn leader_class_only_sent_for_host_institution() {
        let leader = LeaderInformation {
            class: Some(5),
            ..LeaderInformation::default()
        };
        let esatic = build_payload(&leader, &member("Koffi", 5), &member("Bamba", 6), true);
        let external = build_payload(&leader, &member("Koffi", 5), &member("Bamba", 6), false);
        assert_eq!((esatic.esatic, esatic.classe_chef), (1, 5));
        assert_eq!((external.esatic, external.classe_chef), (0, 0));
    }

    #[test]
    fn members_map_to_m2_and_m3() {
        let team = build_payload(
            &LeaderInformation::default(),
            &member("Koffi", 5),
            &member("Bamba", 6),
            false,
        );
        assert_eq!((team.nom_m2.as_str(), team.classe_m2), ("Koffi", 5));
        assert_eq!((team.nom_m3.as_str(), team.classe_m3), ("Bamba", 6));
        assert_eq!(team.email_m3, "Bamba@b.com");
    }
}
