//! The run loop: seed teams → rosters → players, then a sweep of the
//! global player category. Strictly sequential; the fetcher's politeness
//! delay makes network time the dominant cost and nothing here tries to
//! parallelize around it.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::fetch::{PageSource, CATEGORY_LIMIT_MAX};
use crate::model::{Player, Role, RosterSlot, Team};
use crate::registry::{Kind, Registry};
use crate::scrape::roster::RosterCandidate;
use crate::scrape::{player, team};

/// Well-known organizations always worth trying in addition to whatever
/// the team category lists.
pub const DEFAULT_SEED_TEAMS: &[&str] = &[
    "100 Thieves",
    "G2 Esports",
    "Team Liquid",
    "Cloud9",
    "FaZe Clan",
    "Team SoloMid",
    "Evil Geniuses",
    "Sentinels",
    "NRG Esports",
    "GenG",
    "T1",
    "DRX",
    "Paper Rex",
    "LOUD",
    "Fnatic",
    "NAVI",
    "Vitality",
];

const PLAYERS_CATEGORY: &str = "Category:Players";
const TEAMS_CATEGORY: &str = "Category:Teams";

/// Outcome of a full run: the normalized collections plus the identifiers
/// that failed to yield any record.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub failed: Vec<String>,
}

/// Drives one full extraction run over a [`PageSource`].
pub struct Scraper<S: PageSource> {
    source: S,
    registry: Registry,
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            registry: Registry::new(),
        }
    }

    /// Run the whole pipeline: each seed team, its roster's players, then
    /// any player from the global category not already visited. Fetch
    /// failures are logged and skipped; nothing here aborts the run.
    #[instrument(skip(self, seed_teams))]
    pub async fn run(mut self, seed_teams: &[&str]) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        for title in seed_teams {
            if !self.registry.first_sighting(Kind::Team, title) {
                continue;
            }
            match self.scrape_team(title, &mut report).await {
                Ok(Some(team)) => report.teams.push(team),
                Ok(None) => {
                    // Zero resolved roster entries: the team is excluded
                    // from persistence rather than emitted empty.
                    warn!(%title, "team yielded no roster, skipping");
                    report.failed.push((*title).to_string());
                }
                Err(error) => {
                    warn!(%title, %error, "failed to scrape team");
                    report.failed.push((*title).to_string());
                }
            }
        }

        self.sweep_player_category(&mut report).await;

        info!(
            teams = report.teams.len(),
            players = report.players.len(),
            failed = report.failed.len(),
            "run complete"
        );
        report
    }

    /// Titles from the team category, for callers that want to extend the
    /// seed list before a run.
    pub async fn list_teams(&self) -> Result<Vec<String>> {
        self.source
            .category_members(TEAMS_CATEGORY, CATEGORY_LIMIT_MAX)
            .await
    }

    async fn scrape_team(
        &mut self,
        title: &str,
        report: &mut ScrapeReport,
    ) -> Result<Option<Team>> {
        let page = self.source.page(title).await?;
        let (mut team, candidates) = team::parse_team_page(&page, title);
        drop(page);
        if candidates.is_empty() {
            return Ok(None);
        }

        for candidate in &candidates {
            team.roster.push(RosterSlot {
                player: candidate.name.clone(),
                role: candidate.role,
            });
            if !self.registry.first_sighting(Kind::Player, &candidate.name) {
                continue;
            }
            match self.scrape_player(candidate, &team.name).await {
                Ok(player) => report.players.push(player),
                Err(error) => {
                    warn!(player = %candidate.name, %error, "failed to scrape player");
                    report.failed.push(candidate.name.clone());
                }
            }
        }

        Ok(Some(team))
    }

    async fn scrape_player(&self, candidate: &RosterCandidate, team_name: &str) -> Result<Player> {
        let page = self.source.page(&candidate.name).await?;
        let mut player = player::parse_player_page(&page, &candidate.name);
        // The roster row is authoritative context the player page may
        // lack: team membership always, role only when the page had none.
        player.team = Some(team_name.to_string());
        if player.role == Role::Flex && candidate.role != Role::Flex {
            player.role = candidate.role;
        }
        Ok(player)
    }

    /// Second pass: players listed in the global category that no roster
    /// scan reached.
    async fn sweep_player_category(&mut self, report: &mut ScrapeReport) {
        let titles = match self
            .source
            .category_members(PLAYERS_CATEGORY, CATEGORY_LIMIT_MAX)
            .await
        {
            Ok(titles) => titles,
            Err(error) => {
                warn!(%error, "player category listing failed");
                return;
            }
        };

        for title in titles {
            if !self.registry.first_sighting(Kind::Player, &title) {
                continue;
            }
            match self.source.page(&title).await {
                Ok(page) => report
                    .players
                    .push(player::parse_player_page(&page, &title)),
                Err(error) => {
                    warn!(%title, %error, "failed to scrape listed player");
                    report.failed.push(title);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use scraper::Html;
    use std::collections::HashMap;

    /// In-memory page source: markup pages plus an optional player
    /// category listing. Unknown titles behave like fetch failures.
    #[derive(Default)]
    struct FixtureSource {
        markup: HashMap<String, String>,
        players_category: Vec<String>,
    }

    impl PageSource for FixtureSource {
        async fn page_html(&self, title: &str) -> crate::error::Result<Html> {
            Err(ScrapeError::Api {
                title: title.to_string(),
                context: "no rendered fixture",
            })
        }

        async fn page_markup(&self, title: &str) -> crate::error::Result<String> {
            self.markup
                .get(&title.replace('_', " "))
                .cloned()
                .ok_or(ScrapeError::Api {
                    title: title.to_string(),
                    context: "revision content",
                })
        }

        async fn category_members(
            &self,
            category: &str,
            _limit: u32,
        ) -> crate::error::Result<Vec<String>> {
            if category == PLAYERS_CATEGORY {
                Ok(self.players_category.clone())
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn player_markup(id: &str, role: &str) -> String {
        format!(
            "{{{{Infobox player\n|id={id}\n|role={role}\n|earnings=$1,000\n}}}}\n"
        )
    }

    fn sentinels_fixture() -> FixtureSource {
        let mut markup = HashMap::new();
        markup.insert(
            "Sentinels".to_string(),
            "\
{{Infobox team
|shortname=SEN
|region=NA
|location=United States
}}

==Active Squad==
{{SquadRow|player=Aim|role=Duelist}}
{{SquadRow|player=Wall|role=Vanguard}}
{{SquadRow|player=Medic|role=Strategist}}
{{SquadRow|player=Hydra|role=Duelist}}
{{SquadRow|player=Frost|role=Strategist}}
{{SquadRow|player=Shade|role=Vanguard}}
"
            .to_string(),
        );
        for (name, role) in [
            ("Aim", "Duelist"),
            ("Wall", "Vanguard"),
            ("Medic", "Strategist"),
            ("Hydra", "Duelist"),
            ("Frost", "Strategist"),
            ("Shade", "Vanguard"),
        ] {
            markup.insert(name.to_string(), player_markup(name, role));
        }
        FixtureSource {
            markup,
            players_category: vec!["Aim".to_string(), "Hydra".to_string()],
        }
    }

    #[tokio::test]
    async fn end_to_end_single_team_run() {
        let report = Scraper::new(sentinels_fixture()).run(&["Sentinels"]).await;

        assert_eq!(report.teams.len(), 1);
        let team = &report.teams[0];
        assert_eq!(team.name, "Sentinels");
        assert_eq!(team.region, "NA");
        assert_eq!(team.roster.len(), 6);

        // All six roster players resolved, each pointing back at the team.
        assert_eq!(report.players.len(), 6);
        assert!(report
            .players
            .iter()
            .all(|p| p.team.as_deref() == Some("Sentinels")));

        // Two of the six also appear in the category listing; the registry
        // prevents duplicate records.
        let aims = report.players.iter().filter(|p| p.name == "Aim").count();
        assert_eq!(aims, 1);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn unfetchable_team_is_absent_from_output() {
        let report = Scraper::new(FixtureSource::default())
            .run(&["Ghost Org"])
            .await;
        assert!(report.teams.is_empty());
        assert!(report.players.is_empty());
        assert_eq!(report.failed, vec!["Ghost Org"]);
    }

    #[tokio::test]
    async fn category_only_players_are_picked_up() {
        let mut source = FixtureSource::default();
        source
            .markup
            .insert("Solo".to_string(), player_markup("Solo", "Support"));
        source.players_category = vec!["Solo".to_string()];

        let report = Scraper::new(source).run(&[]).await;
        assert_eq!(report.players.len(), 1);
        assert_eq!(report.players[0].name, "Solo");
        assert_eq!(report.players[0].role, Role::Strategist);
        // No roster context: team reference stays empty.
        assert!(report.players[0].team.is_none());
    }

    #[tokio::test]
    async fn duplicate_seed_titles_are_processed_once() {
        let report = Scraper::new(sentinels_fixture())
            .run(&["Sentinels", "Sentinels"])
            .await;
        assert_eq!(report.teams.len(), 1);
    }
}
