use thiserror::Error;

/// Action-level failures. Every rejected action leaves the engine untouched.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid substitution: {reason}")]
    InvalidSubstitution { reason: String },

    #[error("invalid score change: {reason}")]
    InvalidScoreChange { reason: String },

    #[error("cannot advance past quarter {max} (current: {current})")]
    InvalidQuarterAdvance { current: u8, max: u8 },

    #[error("game has not started")]
    GameNotStarted,

    #[error("game already started")]
    GameAlreadyStarted,

    #[error("game is finished")]
    GameFinished,

    #[error("unknown player id: {id}")]
    UnknownPlayer { id: u32 },

    #[error("invalid lineup: {reason}")]
    InvalidLineup { reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
