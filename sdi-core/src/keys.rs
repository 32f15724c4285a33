//! Names of the persisted entries shared by the wizard steps.

pub const LEADER_INFORMATION: &str = "leaderInformation";
pub const MEMBER_1: &str = "informationAboutMembre1";
pub const MEMBER_2: &str = "informationAboutMembre2";
pub const COME_FROM_ESATIC: &str = "comeFromEsatic";
pub const LEVELS_LIST: &str = "levelsList";

/// Bearer token used by the team-listing call. Not part of the wizard state.
pub const SESSION_TOKEN: &str = "session_token";

/// Every key owned by the registration wizard; purged together once a team
/// has been registered.
pub const WIZARD_KEYS: [&str; 5] = [
    LEADER_INFORMATION,
    MEMBER_1,
    MEMBER_2,
    COME_FROM_ESATIC,
    LEVELS_LIST,
];
