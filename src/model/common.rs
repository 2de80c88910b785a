use serde::{Deserialize, Serialize};

/// In-game role taxonomy. Raw role text is folded into one of the three
/// Marvel Rivals classes; anything unrecognized becomes [`Role::Flex`].
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Duelist,
    Vanguard,
    Strategist,
    #[default]
    Flex,
}

/// A single tournament placement (e.g. "1st" at "Rivals Invitational").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub place: String,
    pub event: String,
}

/// One entry of a player's team history.
///
/// `end` is the literal string `"Present"` for an ongoing stint; dates are
/// kept as the source's free text and never cross-validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub team: String,
    pub start: String,
    pub end: String,
}
