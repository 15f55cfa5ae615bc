//! The Rotation & Plus-Minus Accounting Engine.
//!
//! A [`GameEngine`] is an explicitly owned instance: one live game, one
//! engine, constructed from a fresh [`GameSetup`] or rehydrated from a
//! persisted [`crate::save::Snapshot`], and discarded when the session ends.
//! All mutation goes through its action methods, each of which either applies
//! fully (pushing an inverse record for undo) or rejects with an
//! [`EngineError`] leaving state untouched.

pub mod history;
mod scoring;
mod substitution;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::game::{GameState, GameStatus};
use crate::models::player::{Player, PlayerSeed};
use crate::models::quintet::QuintetLedger;
use crate::save::{Snapshot, SnapshotError};

pub use history::{ActionRecord, UndoOutcome};
pub use scoring::FoulOutcome;

/// Which side of the scoreboard a score event lands on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Us,
    Rival,
}

/// Inputs supplied by the session collaborator when a new game is created.
#[derive(Debug, Clone)]
pub struct GameSetup {
    /// Ordered roster; player ids are assigned from this order.
    pub roster: Vec<PlayerSeed>,
    pub home_team_name: String,
    pub away_team_name: String,
    pub is_home_team: bool,
    pub config: EngineConfig,
}

/// In-memory engine for one live game.
pub struct GameEngine {
    pub(crate) game_id: Uuid,
    pub(crate) config: EngineConfig,
    pub(crate) game: GameState,
    pub(crate) players: Vec<Player>,
    pub(crate) quintets: QuintetLedger,
    pub(crate) history: Vec<ActionRecord>,
}

impl GameEngine {
    /// Creates an engine for a fresh game: full roster seeded, everyone on
    /// the bench, empty ledgers.
    pub fn new(setup: GameSetup) -> Self {
        let players = setup
            .roster
            .into_iter()
            .enumerate()
            .map(|(idx, seed)| Player::new(idx as u32, seed))
            .collect();

        Self {
            game_id: Uuid::new_v4(),
            config: setup.config,
            game: GameState::new(setup.home_team_name, setup.away_team_name, setup.is_home_team),
            players,
            quintets: QuintetLedger::new(),
            history: Vec::new(),
        }
    }

    // ========================
    // Accessors
    // ========================

    /// Identity the external store keys idempotent upserts on.
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn quintets(&self) -> &QuintetLedger {
        &self.quintets
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn index_of(&self, id: u32) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(EngineError::UnknownPlayer { id })
    }

    pub(crate) fn ensure_in_progress(&self) -> Result<()> {
        match self.game.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::NotStarted => Err(EngineError::GameNotStarted),
            GameStatus::Finished => Err(EngineError::GameFinished),
        }
    }

    // ========================
    // Lifecycle
    // ========================

    /// Starts the game with the given opening five.
    ///
    /// The lineup is seeded through five synthetic substitution-in events so
    /// the opening quintet's bookkeeping is uniform with every later change.
    /// Those five events count toward `substitutions_by_quarter` but are not
    /// pushed to the undo log: the opening lineup is the floor below which
    /// undo never descends.
    pub fn start_game(&mut self, lineup: [u32; 5]) -> Result<()> {
        match self.game.status {
            GameStatus::NotStarted => {}
            GameStatus::InProgress => return Err(EngineError::GameAlreadyStarted),
            GameStatus::Finished => return Err(EngineError::GameFinished),
        }

        let mut indices = [0usize; 5];
        for (slot, id) in lineup.iter().enumerate() {
            indices[slot] = self.index_of(*id)?;
        }
        let mut sorted = lineup;
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(EngineError::InvalidLineup {
                reason: "lineup contains duplicate players".to_string(),
            });
        }

        self.game.status = GameStatus::InProgress;
        self.game.clock.start_quarter();
        for idx in indices {
            self.apply_substitution(None, idx);
        }

        log::info!(
            "game {} started: {} vs {}, lineup [{}]",
            self.game_id,
            self.game.home_team_name,
            self.game.away_team_name,
            lineup.map(|id| id.to_string()).join(", ")
        );
        Ok(())
    }

    /// Marks the game finished and stops the clock. Open stints and the open
    /// quintet interval stay open; the report aggregator finalizes them
    /// without mutating engine state.
    pub fn finish_game(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        self.game.clock.pause();
        self.game.status = GameStatus::Finished;
        log::info!(
            "game {} finished {}-{}",
            self.game_id,
            self.game.our_score,
            self.game.rival_score
        );
        Ok(())
    }

    // ========================
    // Clock
    // ========================

    /// Starts (or restarts) the current quarter's countdown after a break.
    pub fn start_quarter(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        self.game.clock.start_quarter();
        Ok(())
    }

    /// Feeds elapsed wall time into the game clock. Ticks are autonomous
    /// clock input, not user actions: they are never pushed to the undo log.
    pub fn tick(&mut self, delta_seconds: u32) {
        if self.game.status == GameStatus::InProgress {
            self.game.clock.tick(delta_seconds);
        }
    }

    pub fn pause_clock(&mut self) {
        self.game.clock.pause();
    }

    pub fn resume_clock(&mut self) {
        if self.game.status == GameStatus::InProgress {
            self.game.clock.resume();
        }
    }

    /// Moves to the next quarter: pauses the clock and zeroes the per-quarter
    /// counter. Does not by itself close any stint or quintet interval; the
    /// cumulative clock keeps interval math intact across the boundary.
    pub fn advance_quarter(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if self.game.current_quarter >= self.config.max_quarters {
            return Err(EngineError::InvalidQuarterAdvance {
                current: self.game.current_quarter,
                max: self.config.max_quarters,
            });
        }

        let prior_quarter_elapsed = self.game.clock.quarter_elapsed;
        let prior_running = self.game.clock.running;
        self.game.clock.pause();
        self.game.clock.reset_quarter();
        self.game.current_quarter += 1;

        self.history.push(ActionRecord::QuarterAdvanced {
            prior_quarter_elapsed,
            prior_running,
        });
        log::info!("game {} advanced to quarter {}", self.game_id, self.game.current_quarter);
        Ok(())
    }

    // ========================
    // Snapshot conversion
    // ========================

    /// Full serializable state, handed to the persistence collaborator after
    /// each applied action.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Rehydrates an engine from a persisted snapshot.
    ///
    /// The snapshot is validated first; a malformed snapshot is fatal here —
    /// the engine refuses to start in a known-inconsistent state.
    pub fn from_snapshot(snapshot: &Snapshot) -> std::result::Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(snapshot.restore())
    }
}
