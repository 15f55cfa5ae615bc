use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decompression error")]
    Decompression,

    #[error("corrupted data")]
    Corrupted,

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("malformed snapshot: {reason}")]
    Malformed { reason: String },

    #[error("file not found: {path}")]
    FileNotFound { path: String },
}

impl SnapshotError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SnapshotError::Io(_) => true,
            SnapshotError::FileNotFound { .. } => true,
            SnapshotError::VersionMismatch { .. } => true, // Can try migration
            _ => false,
        }
    }
}
