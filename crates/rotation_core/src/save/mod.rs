//! Snapshot codec and persistence collaborator.
//!
//! The [`Snapshot`] is the externally persisted shape of a full engine. The
//! binary codec wraps it in named MessagePack, LZ4 compression, and a SHA-256
//! checksum; [`SnapshotStore`] writes those bytes atomically, keyed by game
//! id, so external writes behave as idempotent upserts.

pub mod error;
pub mod format;
pub mod store;

pub use error::SnapshotError;
pub use format::{
    decompress_and_deserialize, serialize_and_compress, PlayerSnapshot, Snapshot,
};
pub use store::{SavedGameInfo, SnapshotStore};

/// Current snapshot format version, bumped on breaking layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;
