use thiserror::Error;

/// Construction-time violations of the room setup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the room needs at least one AI participant")]
    NoAiParticipants,

    #[error("duplicate participant id: {0}")]
    DuplicateParticipant(String),

    #[error("AI participant cannot use the human id: {0}")]
    HumanIdTaken(String),

    #[error("the scripted response pool is empty")]
    EmptyResponsePool,

    #[error("session duration must be at least one second")]
    ZeroDuration,

    #[error("countdown tick must be greater than zero")]
    ZeroTick,

    #[error("invalid AI interval range: {min_ms}ms..{max_ms}ms")]
    InvalidInterval { min_ms: u64, max_ms: u64 },
}
