//! Discussion session engine
//!
//! This module provides the `SessionHandle` abstraction that manages:
//! - The one-second countdown that ends the session
//! - Scripted AI lines injected at randomized intervals
//! - The participant roster and the human's toggles
//! - The append-only transcript and transient reactions
//! - Lifecycle (Active → Ending → Ended) and cancellation of timed work

mod config;
mod error;
mod model;
mod scheduler;
mod session;
mod state;
mod stats;

pub use config::{
    SchedulerConfig, SessionConfig, DEFAULT_DURATION_SECS, DEFAULT_RESPONSES, DEFAULT_TOPIC,
    HUMAN_ID, HUMAN_NAME, REACTION_PALETTE,
};
pub use error::SessionError;
pub use model::{
    EndReason, GdSession, Participant, Reaction, SessionPhase, SessionSummary, TranscriptMessage,
};
pub use scheduler::Scheduler;
pub use session::SessionHandle;
pub use state::{Effect, FollowUp, SessionEvent, SessionNotice, SessionState};
pub use stats::{format_clock, SessionStats, LOW_TIME_THRESHOLD_SECS};
