use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::model::{Player, Team};

/// Serializes the finished collections to two JSON arrays on disk,
/// `teams.json` and `players.json`, nested structures preserved.
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn teams_path(&self) -> PathBuf {
        self.dir.join("teams.json")
    }

    pub fn players_path(&self) -> PathBuf {
        self.dir.join("players.json")
    }

    pub fn write(&self, teams: &[Team], players: &[Player]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        write_array(&self.teams_path(), teams)?;
        write_array(&self.players_path(), players)?;
        info!(
            teams = teams.len(),
            players = players.len(),
            dir = %self.dir.display(),
            "wrote json output"
        );
        Ok(())
    }
}

fn write_array<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, records)?;
    // An implicit flush on drop would swallow the error.
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, RosterSlot};

    #[test]
    fn round_trips_nested_structures() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path());

        let mut team = Team::named("Sentinels");
        team.region = "NA".to_string();
        team.roster.push(RosterSlot {
            player: "Aim".to_string(),
            role: Role::Duelist,
        });
        team.social_links
            .insert("twitter".to_string(), "https://twitter.com/sen".to_string());

        let mut player = Player::named("Aim");
        player.team = Some("Sentinels".to_string());

        sink.write(&[team], &[player]).unwrap();

        let teams: Vec<Team> =
            serde_json::from_str(&std::fs::read_to_string(sink.teams_path()).unwrap()).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].roster[0].player, "Aim");
        assert_eq!(teams[0].roster[0].role, Role::Duelist);
        assert_eq!(
            teams[0].social_links.get("twitter").map(String::as_str),
            Some("https://twitter.com/sen")
        );

        let players: Vec<Player> =
            serde_json::from_str(&std::fs::read_to_string(sink.players_path()).unwrap()).unwrap();
        assert_eq!(players[0].team.as_deref(), Some("Sentinels"));
    }

    #[test]
    fn write_failure_surfaces_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should go.
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, b"in the way").unwrap();

        let sink = JsonSink::new(&blocker);
        assert!(sink.write(&[], &[]).is_err());
    }
}
