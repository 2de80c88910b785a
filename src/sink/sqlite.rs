use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::error::Result;
use crate::model::{Player, Team};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    short_name TEXT NOT NULL,
    region TEXT NOT NULL,
    country TEXT NOT NULL,
    founded TEXT NOT NULL,
    coach TEXT,
    captain TEXT,
    logo TEXT,
    flag TEXT,
    earnings INTEGER NOT NULL DEFAULT 0,
    roster TEXT NOT NULL,
    social_links TEXT NOT NULL,
    scraped_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL,
    real_name TEXT,
    team_id INTEGER REFERENCES teams(id),
    country TEXT NOT NULL,
    role TEXT NOT NULL,
    born TEXT,
    age INTEGER,
    signature_heroes TEXT NOT NULL,
    earnings INTEGER NOT NULL DEFAULT 0,
    social_links TEXT NOT NULL,
    biography TEXT NOT NULL,
    achievements TEXT NOT NULL,
    history TEXT NOT NULL,
    scraped_at TEXT NOT NULL
);
"#;

/// Per-batch outcome counts. Insert failures are logged and skipped, not
/// fatal to the batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub teams_written: usize,
    pub players_written: usize,
    pub skipped: usize,
}

/// Relational sink: two tables, `players.team_id` a nullable foreign key
/// into `teams`. List- and map-valued fields are stored as JSON text
/// blobs, not normalized into child tables.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Write both collections. Teams go first so player rows can resolve
    /// their team-name reference to a foreign key; a player whose team was
    /// never resolved gets a NULL `team_id`.
    pub fn write(&mut self, teams: &[Team], players: &[Player]) -> Result<SinkStats> {
        let mut stats = SinkStats::default();
        let scraped_at = Utc::now().to_rfc3339();

        let mut team_ids: HashMap<String, i64> = HashMap::new();
        for team in teams {
            match self.insert_team(team, &scraped_at) {
                Ok(id) => {
                    team_ids.insert(team.name.clone(), id);
                    stats.teams_written += 1;
                }
                Err(error) => {
                    warn!(team = %team.name, %error, "failed to insert team");
                    stats.skipped += 1;
                }
            }
        }

        for player in players {
            let team_id = player
                .team
                .as_ref()
                .and_then(|name| team_ids.get(name))
                .copied();
            match self.insert_player(player, team_id, &scraped_at) {
                Ok(()) => stats.players_written += 1,
                Err(error) => {
                    warn!(player = %player.name, %error, "failed to insert player");
                    stats.skipped += 1;
                }
            }
        }

        info!(
            teams = stats.teams_written,
            players = stats.players_written,
            skipped = stats.skipped,
            "wrote sqlite output"
        );
        Ok(stats)
    }

    fn insert_team(&self, team: &Team, scraped_at: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO teams (name, short_name, region, country, founded, coach,
                                captain, logo, flag, earnings, roster, social_links,
                                scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                team.name,
                team.short_name,
                team.region,
                team.country,
                team.founded,
                team.coach,
                team.captain,
                team.logo,
                team.flag,
                team.earnings as i64,
                serde_json::to_string(&team.roster)?,
                serde_json::to_string(&team.social_links)?,
                scraped_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_player(&self, player: &Player, team_id: Option<i64>, scraped_at: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO players (name, username, real_name, team_id, country, role,
                                  born, age, signature_heroes, earnings, social_links,
                                  biography, achievements, history, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                player.name,
                player.username,
                player.real_name,
                team_id,
                player.country,
                player.role.to_string(),
                player.born,
                player.age,
                serde_json::to_string(&player.signature_heroes)?,
                player.earnings as i64,
                serde_json::to_string(&player.social_links)?,
                player.biography,
                serde_json::to_string(&player.achievements)?,
                serde_json::to_string(&player.history)?,
                scraped_at,
            ],
        )?;
        Ok(())
    }
}
