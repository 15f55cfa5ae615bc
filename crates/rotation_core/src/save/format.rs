use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::config::EngineConfig;
use crate::engine::{ActionRecord, GameEngine};
use crate::models::game::{GameState, GameStatus};
use crate::models::player::{Player, Position, StintRecord, StintStart};
use crate::models::quintet::QuintetLedger;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Externally persisted representation of a full engine.
///
/// Rehydration must reconstruct an engine whose next action behaves exactly
/// like one that was never serialized, so everything the action paths read
/// rides along: open stint starts, the open quintet key/start, per-quarter
/// substitution counts, the engine config, and the undo log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snapshot format version for migration.
    pub version: u32,

    /// Game identity the external store keys idempotent upserts on.
    pub game_id: Uuid,

    /// Snapshot timestamp (unix milliseconds).
    pub timestamp: u64,

    pub config: EngineConfig,

    /// Scores, quarter, clock, status, substitution counters.
    pub game: GameState,

    /// Full roster with per-player stint ledgers.
    pub players: Vec<PlayerSnapshot>,

    /// Closed quintet intervals plus the one currently accruing.
    pub quintets: QuintetLedger,

    /// Undo log, so single-step undo keeps working across a save/load.
    #[serde(default)]
    pub history: Vec<ActionRecord>,
}

/// Player record in the persisted shape.
///
/// Stint durations and plus-minus travel as the legacy parallel arrays the
/// external consumers expect; the engine itself keeps paired records, and
/// [`Snapshot::validate`] rejects any length mismatch on the way back in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: u32,
    pub name: String,
    pub number: u8,
    pub position: Position,
    #[serde(default)]
    pub secondary_positions: Vec<Position>,
    pub on_court: bool,
    pub points: u16,
    pub fouls: u8,
    pub current_stint: Option<StintStart>,
    pub stints: Vec<u32>,
    pub stint_plus_minus: Vec<i32>,
}

impl PlayerSnapshot {
    pub(crate) fn from_player(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            number: player.number,
            position: player.position,
            secondary_positions: player.secondary_positions.clone(),
            on_court: player.on_court,
            points: player.points,
            fouls: player.fouls,
            current_stint: player.current_stint,
            stints: player.stints.iter().map(|s| s.duration_secs).collect(),
            stint_plus_minus: player.stints.iter().map(|s| s.plus_minus).collect(),
        }
    }

    /// Rebuilds the paired-record form. Callers validate array alignment
    /// first; zipping truncates silently otherwise.
    pub(crate) fn into_player(self) -> Player {
        let stints = self
            .stints
            .into_iter()
            .zip(self.stint_plus_minus)
            .map(|(duration_secs, plus_minus)| StintRecord { duration_secs, plus_minus })
            .collect();
        Player {
            id: self.id,
            name: self.name,
            number: self.number,
            position: self.position,
            secondary_positions: self.secondary_positions,
            on_court: self.on_court,
            points: self.points,
            fouls: self.fouls,
            current_stint: self.current_stint,
            stints,
        }
    }
}

impl Snapshot {
    /// Captures the full state of a live engine.
    pub fn capture(engine: &GameEngine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            game_id: engine.game_id,
            timestamp: current_timestamp(),
            config: engine.config,
            game: engine.game.clone(),
            players: engine.players.iter().map(PlayerSnapshot::from_player).collect(),
            quintets: engine.quintets.clone(),
            history: engine.history.clone(),
        }
    }

    /// Rebuilds an engine. Callers go through [`GameEngine::from_snapshot`],
    /// which validates first.
    pub(crate) fn restore(&self) -> GameEngine {
        GameEngine {
            game_id: self.game_id,
            config: self.config,
            game: self.game.clone(),
            players: self.players.iter().cloned().map(PlayerSnapshot::into_player).collect(),
            quintets: self.quintets.clone(),
            history: self.history.clone(),
        }
    }

    /// Invariant checks on the persisted shape. Any violation means the
    /// snapshot cannot produce a consistent engine and rehydration must fail
    /// hard rather than fall back to a partially-valid state.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen_ids = std::collections::HashSet::new();
        for player in &self.players {
            if !seen_ids.insert(player.id) {
                return Err(SnapshotError::Malformed {
                    reason: format!("duplicate player id {}", player.id),
                });
            }
            if player.stints.len() != player.stint_plus_minus.len() {
                return Err(SnapshotError::Malformed {
                    reason: format!(
                        "player {}: {} stint durations vs {} plus-minus entries",
                        player.id,
                        player.stints.len(),
                        player.stint_plus_minus.len()
                    ),
                });
            }
            if player.current_stint.is_some() != player.on_court {
                return Err(SnapshotError::Malformed {
                    reason: format!(
                        "player {}: open stint and on-court flag disagree",
                        player.id
                    ),
                });
            }
            if let Some(start) = player.current_stint {
                if start.clock_seconds > self.game.clock.total_elapsed {
                    return Err(SnapshotError::Malformed {
                        reason: format!("player {}: stint starts in the future", player.id),
                    });
                }
            }
        }

        let on_court = self.players.iter().filter(|p| p.on_court).count();
        let expected_on_court = match self.game.status {
            GameStatus::NotStarted => 0,
            GameStatus::InProgress | GameStatus::Finished => 5,
        };
        if on_court != expected_on_court {
            return Err(SnapshotError::Malformed {
                reason: format!(
                    "{} players on court, expected {}",
                    on_court, expected_on_court
                ),
            });
        }

        match (&self.quintets.open, self.game.status) {
            (None, GameStatus::NotStarted) => {}
            (Some(_), GameStatus::NotStarted) => {
                return Err(SnapshotError::Malformed {
                    reason: "open quintet before the game started".to_string(),
                });
            }
            (None, _) => {
                return Err(SnapshotError::Malformed {
                    reason: "started game without an open quintet".to_string(),
                });
            }
            (Some(open), _) => {
                for id in open.key.player_ids() {
                    let on = self.players.iter().any(|p| p.id == id && p.on_court);
                    if !on {
                        return Err(SnapshotError::Malformed {
                            reason: format!("open quintet references off-court player {}", id),
                        });
                    }
                }
                if open.start.clock_seconds > self.game.clock.total_elapsed {
                    return Err(SnapshotError::Malformed {
                        reason: "open quintet starts in the future".to_string(),
                    });
                }
            }
        }

        if self.game.current_quarter == 0 || self.game.current_quarter > self.config.max_quarters
        {
            return Err(SnapshotError::Malformed {
                reason: format!(
                    "quarter {} outside 1..={}",
                    self.game.current_quarter, self.config.max_quarters
                ),
            });
        }

        Ok(())
    }

    /// Human-readable export for debugging and the report pipeline.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialize and compress snapshot bytes for durable storage.
pub fn serialize_and_compress(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    // Validate before serialization
    snapshot.validate()?;

    // 1. Serialize to MessagePack with field names
    let msgpack = to_vec_named(snapshot).map_err(SnapshotError::Serialization)?;

    // 2. Compress with LZ4 (size prepended for easy decompression)
    let compressed = compress_prepend_size(&msgpack);

    // 3. Add SHA256 checksum at the end
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize snapshot bytes.
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    // Check minimum size (header + checksum)
    if bytes.len() < 4 + 32 {
        return Err(SnapshotError::Corrupted);
    }

    // Split payload and checksum
    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    // Verify checksum
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SnapshotError::ChecksumMismatch);
    }

    // Decompress
    let msgpack = decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;

    // Deserialize
    let snapshot: Snapshot = from_slice(&msgpack).map_err(SnapshotError::Deserialization)?;

    // Reject snapshots from a newer format than this build understands
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
