use tracing::instrument;

use crate::driver::{ScrapeReport, Scraper};
use crate::error::Result;
use crate::fetch::{Fetcher, PageSource, CATEGORY_LIMIT_MAX};
use crate::model::{Player, RosterSlot, Team};
use crate::scrape::{player, team};

/// The main entry point for interacting with the Liquipedia Marvel Rivals
/// wiki.
///
/// `LiquipediaClient` wraps a rate-limited [`Fetcher`] and exposes methods
/// to fetch single team or player records, list category members, and run
/// the full extraction pipeline.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> rivals_scraper::Result<()> {
/// use rivals_scraper::LiquipediaClient;
///
/// let client = LiquipediaClient::new();
/// let team = client.get_team("Sentinels").await?;
/// println!("{} fields {} roster slots", team.name, team.roster.len());
/// # Ok(())
/// # }
/// ```
pub struct LiquipediaClient {
    fetcher: Fetcher,
}

impl LiquipediaClient {
    /// Create a new client with the default politeness delay.
    pub fn new() -> Self {
        Self {
            fetcher: Fetcher::new(),
        }
    }

    /// Create a new client using the provided [`Fetcher`].
    ///
    /// Use this to configure the request delay or point at a mirror.
    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch and normalize a single team page, roster slots attached but
    /// the players themselves left unfetched.
    #[instrument(skip(self))]
    pub async fn get_team(&self, title: &str) -> Result<Team> {
        let page = self.fetcher.page(title).await?;
        let (mut team, candidates) = team::parse_team_page(&page, title);
        team.roster = candidates
            .into_iter()
            .map(|c| RosterSlot {
                player: c.name,
                role: c.role,
            })
            .collect();
        Ok(team)
    }

    /// Fetch and normalize a single player page.
    #[instrument(skip(self))]
    pub async fn get_player(&self, title: &str) -> Result<Player> {
        let page = self.fetcher.page(title).await?;
        Ok(player::parse_player_page(&page, title))
    }

    /// Member titles of the global player category (single call, capped).
    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<Vec<String>> {
        self.fetcher
            .category_members("Category:Players", CATEGORY_LIMIT_MAX)
            .await
    }

    /// Member titles of the team category (single call, capped).
    #[instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<String>> {
        self.fetcher
            .category_members("Category:Teams", CATEGORY_LIMIT_MAX)
            .await
    }

    /// Run the full pipeline over the given seed team titles. Failures are
    /// collected in the report, never raised.
    #[instrument(skip(self, seed_teams))]
    pub async fn scrape_all(&self, seed_teams: &[&str]) -> ScrapeReport {
        Scraper::new(&self.fetcher).run(seed_teams).await
    }
}

impl Default for LiquipediaClient {
    fn default() -> Self {
        Self::new()
    }
}
