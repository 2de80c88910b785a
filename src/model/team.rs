use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::Role;

/// A team record normalized from a Liquipedia team page.
///
/// `name` is the canonical wiki page title and the unique key within a run.
/// Every other field defaults to empty/zero when the source page lacks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub short_name: String,
    pub region: String,
    pub country: String,
    pub founded: String,
    pub roster: Vec<RosterSlot>,
    pub social_links: BTreeMap<String, String>,
    pub coach: Option<String>,
    pub captain: Option<String>,
    pub logo: Option<String>,
    pub flag: Option<String>,
    pub earnings: u64,
}

impl Team {
    /// An empty record carrying only the canonical name and its derived
    /// short name. Extraction fills the rest in.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let short_name = crate::normalize::derive_short_name(&name);
        Self {
            name,
            short_name,
            region: String::new(),
            country: String::new(),
            founded: String::new(),
            roster: Vec::new(),
            social_links: BTreeMap::new(),
            coach: None,
            captain: None,
            logo: None,
            flag: None,
            earnings: 0,
        }
    }
}

/// A (player, role) pair on a team's active roster. Exists only inside a
/// [`Team`]; the player itself is persisted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub player: String,
    pub role: Role,
}
