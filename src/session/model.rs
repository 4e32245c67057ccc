use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seat in the discussion room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,

    /// True only for the human seat
    pub is_you: bool,
    pub is_muted: bool,
    pub is_video_off: bool,
    pub is_hand_raised: bool,

    /// Set for a short window after this participant's line is appended
    pub is_speaking: bool,
}

impl Participant {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_you: true,
            is_muted: true,
            is_video_off: false,
            is_hand_raised: false,
            is_speaking: false,
        }
    }

    pub fn ai(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_you: false,
            is_muted: false,
            is_video_off: false,
            is_hand_raised: false,
            is_speaking: false,
        }
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.is_muted = muted;
        self
    }

    pub fn video_off(mut self, video_off: bool) -> Self {
        self.is_video_off = video_off;
        self
    }
}

/// A single line in the discussion transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub id: String,
    pub participant_id: String,
    pub participant_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_you: bool,
}

/// Floating emoji raised by the human, removed after a short window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: String,
    pub emoji: String,
    pub participant_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of the discussion room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdSession {
    pub topic: String,

    /// Total length of the discussion in seconds
    pub duration: u32,
    pub participants: Vec<Participant>,
    pub transcript: Vec<TranscriptMessage>,
    pub reactions: Vec<Reaction>,
    pub start_time: DateTime<Utc>,
    pub is_recording: bool,
    pub is_screen_sharing: bool,
}

impl GdSession {
    /// The unique human participant
    pub fn you(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_you)
    }

    pub fn ai_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| !p.is_you)
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

/// Lifecycle of a session: Active → Ending → Ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Active,
    Ending,
    Ended,
}

impl SessionPhase {
    pub fn is_active(self) -> bool {
        matches!(self, SessionPhase::Active)
    }
}

/// Why a session left the active phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The countdown reached zero
    TimeUp,
    /// The consumer called `end_session`
    EndedByUser,
    /// The handle was disposed while still active
    Disposed,
}

/// Frozen view of a finished session, handed to the result generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub topic: String,
    pub participants: Vec<Participant>,
    pub transcript: Vec<TranscriptMessage>,
    pub reason: EndReason,
    pub time_remaining: u32,
    pub ended_at: DateTime<Utc>,
}
