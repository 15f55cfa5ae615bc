//! # rotation_core — Rotation & Plus-Minus Accounting Engine
//!
//! In-memory model and algorithms for tracking a live basketball game:
//! per-player stints, five-player (quintet) intervals, score and foul
//! bookkeeping, single-step undo of any past action, and a lossless
//! serializable snapshot for persistence and post-game reports.
//!
//! ## Features
//! - Interval ledgers that stay mutually consistent under order-sensitive
//!   mutation (substitution, score change, foul, quarter change, undo)
//! - Targeted inverse records instead of full-state copies, so undo memory
//!   stays bounded over a long game
//! - Snapshot round-trips that preserve open intervals exactly
//! - Pure report aggregation over snapshots, safe to run mid-game

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod save;

// Re-export the engine surface
pub use engine::{
    ActionRecord, FoulOutcome, GameEngine, GameSetup, Side, UndoOutcome,
};
pub use error::{EngineError, Result};

// Re-export the data model
pub use config::EngineConfig;
pub use models::game::{GameClock, GameState, GameStatus};
pub use models::player::{Player, PlayerSeed, Position, StintRecord, StintStart};
pub use models::quintet::{OpenQuintet, QuintetInterval, QuintetKey, QuintetLedger};

// Re-export the snapshot system
pub use save::{
    PlayerSnapshot, SavedGameInfo, Snapshot, SnapshotError, SnapshotStore, SNAPSHOT_VERSION,
};

// Re-export report aggregation
pub use report::{
    build_report, GameReport, PlayerSummary, QuintetSummary, INITIAL_LINEUP_EVENTS,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
