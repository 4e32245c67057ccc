pub mod config;
pub mod random;
pub mod result;
pub mod session;
pub mod speech;

pub use config::Config;
pub use random::{RandomSource, SequenceRandom, StdRandom};
pub use result::{rank_label, GdResult, ResultGenerator, ScoreBand};
pub use session::{
    EndReason, GdSession, Participant, Reaction, SessionConfig, SessionError, SessionHandle,
    SessionNotice, SessionPhase, SessionStats, SessionSummary, TranscriptMessage,
};
pub use speech::{SpeechError, SpeechEvent, SpeechRecognizer, SpeechRecognizerFactory, VoiceInput};
