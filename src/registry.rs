use std::collections::HashSet;

use crate::normalize::canonical_title;

/// Which identity space a name belongs to. Team and player namespaces are
/// disjoint; the same string may legitimately appear in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Team,
    Player,
}

/// Tracks which canonical names have already been processed in the current
/// run, so an entity discovered through multiple paths (team roster scan
/// and the global player category) is fetched and emitted at most once.
///
/// Names are compared on their canonical page-title form (underscores
/// normalized to spaces). Scoped to one run; never persisted.
#[derive(Debug, Default)]
pub struct Registry {
    teams: HashSet<String>,
    players: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, kind: Kind, name: &str) -> bool {
        self.set(kind).contains(&canonical_title(name))
    }

    pub fn mark(&mut self, kind: Kind, name: &str) {
        self.set_mut(kind).insert(canonical_title(name));
    }

    /// Combined test-and-mark: returns `false` if the name was already
    /// registered, `true` (after marking) if this is its first sighting.
    pub fn first_sighting(&mut self, kind: Kind, name: &str) -> bool {
        self.set_mut(kind).insert(canonical_title(name))
    }

    fn set(&self, kind: Kind) -> &HashSet<String> {
        match kind {
            Kind::Team => &self.teams,
            Kind::Player => &self.players,
        }
    }

    fn set_mut(&mut self, kind: Kind) -> &mut HashSet<String> {
        match kind {
            Kind::Team => &mut self.teams,
            Kind::Player => &mut self.players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_per_kind() {
        let mut registry = Registry::new();
        registry.mark(Kind::Player, "Shroud");
        assert!(registry.seen(Kind::Player, "Shroud"));
        assert!(!registry.seen(Kind::Team, "Shroud"));
    }

    #[test]
    fn underscored_and_spaced_titles_collide() {
        let mut registry = Registry::new();
        registry.mark(Kind::Team, "Team_Liquid");
        assert!(registry.seen(Kind::Team, "Team Liquid"));
    }

    #[test]
    fn first_sighting_flips_once() {
        let mut registry = Registry::new();
        assert!(registry.first_sighting(Kind::Player, "Aim"));
        assert!(!registry.first_sighting(Kind::Player, "Aim"));
    }
}
