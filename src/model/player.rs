use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{Achievement, Role, Stint};

/// Signature hero lists are capped at this many entries, kept in source
/// order.
pub const SIGNATURE_HEROES_CAP: usize = 3;

/// A player record normalized from a Liquipedia player page.
///
/// `name` is the canonical wiki page title and the unique key within a run;
/// it is the only field that must be non-empty. `team` is a weak reference
/// by team name, resolved to a foreign key only at the relational sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub username: String,
    pub real_name: Option<String>,
    pub country: String,
    pub role: Role,
    pub team: Option<String>,
    pub born: Option<String>,
    pub age: Option<u8>,
    pub signature_heroes: Vec<String>,
    pub earnings: u64,
    pub social_links: BTreeMap<String, String>,
    pub biography: String,
    pub achievements: Vec<Achievement>,
    pub history: Vec<Stint>,
}

impl Player {
    /// An empty record carrying only the canonical name, which doubles as
    /// the display username until extraction finds a better one.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let username = name.clone();
        Self {
            name,
            username,
            real_name: None,
            country: String::new(),
            role: Role::default(),
            team: None,
            born: None,
            age: None,
            signature_heroes: Vec::new(),
            earnings: 0,
            social_links: BTreeMap::new(),
            biography: String::new(),
            achievements: Vec::new(),
            history: Vec::new(),
        }
    }
}
