use super::error::SnapshotError;
use super::format::{decompress_and_deserialize, serialize_and_compress, Snapshot};
use super::SNAPSHOT_VERSION;
use crate::models::game::GameStatus;

use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed persistence collaborator.
///
/// The engine never touches this itself: after each applied action the
/// session layer hands the emitted [`Snapshot`] here (fire-and-forget). Files
/// are keyed by game id, so repeated writes for the same game are idempotent
/// upserts and a newer snapshot simply supersedes an older in-flight one.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, game_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.rot", game_id))
    }

    /// Persists a snapshot atomically: write to a temp file, fsync, rename.
    pub fn persist(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let path = self.path_for(snapshot.game_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(snapshot)?;
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }

        rename(&temp_path, &path)?;

        log::debug!("persisted {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    /// Loads and migrates the snapshot for a game.
    pub fn load(&self, game_id: Uuid) -> Result<Snapshot, SnapshotError> {
        let path = self.path_for(game_id);
        Self::load_from_path(&path)
    }

    pub fn exists(&self, game_id: Uuid) -> bool {
        self.path_for(game_id).exists()
    }

    pub fn delete(&self, game_id: Uuid) -> Result<(), SnapshotError> {
        let path = self.path_for(game_id);
        if path.exists() {
            remove_file(&path)?;
            log::info!("deleted saved game {}", game_id);
        }
        Ok(())
    }

    /// Header info for every saved game in the store, most recent first.
    pub fn list(&self) -> Result<Vec<SavedGameInfo>, SnapshotError> {
        let mut games = Vec::new();
        if !self.dir.exists() {
            return Ok(games);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("rot") {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(snapshot) => games.push(SavedGameInfo::from_snapshot(&snapshot)),
                Err(err) => log::warn!("skipping unreadable save {:?}: {}", path, err),
            }
        }

        games.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(games)
    }

    fn load_from_path(path: &Path) -> Result<Snapshot, SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = migrate_snapshot(decompress_and_deserialize(&data)?)?;

        log::debug!("loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }
}

/// Brings an on-disk snapshot up to the current format version.
fn migrate_snapshot(snapshot: Snapshot) -> Result<Snapshot, SnapshotError> {
    match snapshot.version {
        SNAPSHOT_VERSION => Ok(snapshot),
        // No older formats were ever shipped; anything else is unreadable.
        found => Err(SnapshotError::VersionMismatch { found, expected: SNAPSHOT_VERSION }),
    }
}

/// Saved-game metadata for selection screens.
#[derive(Debug, Clone)]
pub struct SavedGameInfo {
    pub game_id: Uuid,
    pub timestamp: u64,
    pub home_team_name: String,
    pub away_team_name: String,
    pub our_score: u16,
    pub rival_score: u16,
    pub status: GameStatus,
}

impl SavedGameInfo {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            game_id: snapshot.game_id,
            timestamp: snapshot.timestamp,
            home_team_name: snapshot.game.home_team_name.clone(),
            away_team_name: snapshot.game.away_team_name.clone(),
            our_score: snapshot.game.our_score,
            rival_score: snapshot.game.rival_score,
            status: snapshot.game.status,
        }
    }

    pub fn format_timestamp(&self) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        let timestamp =
            OffsetDateTime::from_unix_timestamp_nanos((self.timestamp as i128) * 1_000_000)
                .unwrap_or_else(|_| OffsetDateTime::now_utc());

        timestamp.format(&Rfc3339).unwrap_or_else(|_| "Unknown".to_string())
    }

    pub fn get_display_text(&self) -> String {
        format!(
            "{} vs {} ({}-{})",
            self.home_team_name, self.away_team_name, self.our_score, self.rival_score
        )
    }
}
