//! Pure session state machine
//!
//! Every change to a session goes through [`SessionState::apply`]. Timed work
//! lives in the engine; this module never sleeps, spawns or reads a clock, so
//! each transition reads the roster and flags as they are *now*.

use super::config::SessionConfig;
use super::model::{
    EndReason, GdSession, Participant, Reaction, SessionPhase, SessionSummary, TranscriptMessage,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One countdown step
    Tick,

    /// An AI line is due; `speaker_slot` indexes the AI participants in roster order
    AiTurn {
        speaker_slot: usize,
        at: DateTime<Utc>,
    },

    /// The speaking window of `participant_id` has elapsed
    SpeakingElapsed { participant_id: String },

    ToggleMute,
    ToggleVideo,
    ToggleHandRaise,
    ToggleRecording,
    ToggleScreenShare,

    /// Text typed (or dictated) by the human
    Send { content: String, at: DateTime<Utc> },

    React { emoji: String, at: DateTime<Utc> },
    ReactionExpired { reaction_id: String },

    End(EndReason),
}

/// Change notifications published to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionNotice {
    MessageAppended(TranscriptMessage),
    SpeakingChanged {
        participant_id: String,
        is_speaking: bool,
    },
    Tick {
        time_remaining: u32,
    },
    ParticipantUpdated(Participant),
    RecordingChanged {
        is_recording: bool,
    },
    ScreenShareChanged {
        is_screen_sharing: bool,
    },
    ReactionAdded(Reaction),
    ReactionExpired {
        reaction_id: String,
    },
    Ended {
        reason: EndReason,
        time_remaining: u32,
    },
}

/// Delayed work a transition asks the engine to schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    ResetSpeaking { participant_id: String },
    ExpireReaction { reaction_id: String },
}

/// Result of applying one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effect {
    pub notices: Vec<SessionNotice>,
    pub follow_up: Option<FollowUp>,

    /// Set when this event moved the session out of the active phase
    pub ended: Option<EndReason>,
}

impl Effect {
    pub fn ignored() -> Self {
        Self::default()
    }

    fn notify(notice: SessionNotice) -> Self {
        Self {
            notices: vec![notice],
            ..Self::default()
        }
    }

    fn deactivated(reason: EndReason) -> Self {
        Self {
            ended: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.notices.is_empty() && self.follow_up.is_none() && self.ended.is_none()
    }
}

/// Which flag of the human participant a toggle flips
#[derive(Debug, Clone, Copy)]
enum HumanFlag {
    Muted,
    VideoOff,
    HandRaised,
}

/// Mutable state of one discussion
#[derive(Debug, Clone)]
pub struct SessionState {
    topic: String,
    duration: u32,
    participants: Vec<Participant>,
    transcript: Vec<TranscriptMessage>,
    reactions: Vec<Reaction>,
    start_time: DateTime<Utc>,
    is_recording: bool,
    is_screen_sharing: bool,
    time_remaining: u32,
    phase: SessionPhase,
    end_reason: Option<EndReason>,
    responses: Vec<String>,
    response_cursor: usize,
}

impl SessionState {
    /// Build the initial state; `config` must already be validated
    pub fn new(config: &SessionConfig, start_time: DateTime<Utc>) -> Self {
        Self {
            topic: config.topic.clone(),
            duration: config.duration_secs,
            participants: config.roster(),
            transcript: Vec::new(),
            reactions: Vec::new(),
            start_time,
            is_recording: false,
            is_screen_sharing: false,
            time_remaining: config.duration_secs,
            phase: SessionPhase::Active,
            end_reason: None,
            responses: config.responses.clone(),
            response_cursor: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn transcript(&self) -> &[TranscriptMessage] {
        &self.transcript
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Number of AI lines emitted so far
    pub fn response_cursor(&self) -> usize {
        self.response_cursor
    }

    pub fn ai_count(&self) -> usize {
        self.participants.iter().filter(|p| !p.is_you).count()
    }

    pub fn snapshot(&self) -> GdSession {
        GdSession {
            topic: self.topic.clone(),
            duration: self.duration,
            participants: self.participants.clone(),
            transcript: self.transcript.clone(),
            reactions: self.reactions.clone(),
            start_time: self.start_time,
            is_recording: self.is_recording,
            is_screen_sharing: self.is_screen_sharing,
        }
    }

    /// Apply one event. Anything arriving after deactivation is ignored.
    pub fn apply(&mut self, event: SessionEvent) -> Effect {
        if !self.is_active() {
            return Effect::ignored();
        }

        match event {
            SessionEvent::Tick => self.tick(),
            SessionEvent::AiTurn { speaker_slot, at } => self.ai_turn(speaker_slot, at),
            SessionEvent::SpeakingElapsed { participant_id } => {
                self.set_speaking(&participant_id, false)
            }
            SessionEvent::ToggleMute => self.toggle_human(HumanFlag::Muted),
            SessionEvent::ToggleVideo => self.toggle_human(HumanFlag::VideoOff),
            SessionEvent::ToggleHandRaise => self.toggle_human(HumanFlag::HandRaised),
            SessionEvent::ToggleRecording => {
                self.is_recording = !self.is_recording;
                Effect::notify(SessionNotice::RecordingChanged {
                    is_recording: self.is_recording,
                })
            }
            SessionEvent::ToggleScreenShare => {
                self.is_screen_sharing = !self.is_screen_sharing;
                Effect::notify(SessionNotice::ScreenShareChanged {
                    is_screen_sharing: self.is_screen_sharing,
                })
            }
            SessionEvent::Send { content, at } => {
                let Some(you) = self.participants.iter().find(|p| p.is_you) else {
                    return Effect::ignored();
                };
                let you_id = you.id.clone();
                match self.append_message(&you_id, &content, at) {
                    Some(message) => Effect::notify(SessionNotice::MessageAppended(message)),
                    None => Effect::ignored(),
                }
            }
            SessionEvent::React { emoji, at } => self.react(&emoji, at),
            SessionEvent::ReactionExpired { reaction_id } => {
                let before = self.reactions.len();
                self.reactions.retain(|r| r.id != reaction_id);
                if self.reactions.len() == before {
                    Effect::ignored()
                } else {
                    Effect::notify(SessionNotice::ReactionExpired { reaction_id })
                }
            }
            SessionEvent::End(reason) => self.deactivate(reason),
        }
    }

    /// Append a line to the transcript.
    ///
    /// Human lines are trimmed and dropped when blank. Unknown participants are
    /// ignored.
    pub fn append_message(
        &mut self,
        participant_id: &str,
        content: &str,
        at: DateTime<Utc>,
    ) -> Option<TranscriptMessage> {
        if !self.is_active() {
            return None;
        }

        let author = self.participants.iter().find(|p| p.id == participant_id)?;
        let content = if author.is_you {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.to_string()
        } else {
            content.to_string()
        };

        let message = TranscriptMessage {
            id: Uuid::now_v7().to_string(),
            participant_id: author.id.clone(),
            participant_name: author.name.clone(),
            content,
            timestamp: at,
            is_you: author.is_you,
        };
        self.transcript.push(message.clone());
        Some(message)
    }

    /// Move from Ending to Ended. Flags and transcript stay exactly as they
    /// were at deactivation.
    pub fn finish(&mut self, ended_at: DateTime<Utc>) -> Option<SessionSummary> {
        let reason = self.end_reason?;
        self.phase = SessionPhase::Ended;

        Some(SessionSummary {
            topic: self.topic.clone(),
            participants: self.participants.clone(),
            transcript: self.transcript.clone(),
            reason,
            time_remaining: self.time_remaining,
            ended_at,
        })
    }

    fn tick(&mut self) -> Effect {
        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            return self.deactivate(EndReason::TimeUp);
        }

        self.time_remaining -= 1;
        Effect::notify(SessionNotice::Tick {
            time_remaining: self.time_remaining,
        })
    }

    fn ai_turn(&mut self, speaker_slot: usize, at: DateTime<Utc>) -> Effect {
        let ai_count = self.ai_count();
        if ai_count == 0 || self.responses.is_empty() {
            return Effect::ignored();
        }

        let Some(speaker_id) = self
            .participants
            .iter()
            .filter(|p| !p.is_you)
            .nth(speaker_slot % ai_count)
            .map(|p| p.id.clone())
        else {
            return Effect::ignored();
        };

        let line = self.responses[self.response_cursor % self.responses.len()].clone();
        self.response_cursor += 1;

        let Some(message) = self.append_message(&speaker_id, &line, at) else {
            return Effect::ignored();
        };

        let mut effect = self.set_speaking(&speaker_id, true);
        effect
            .notices
            .insert(0, SessionNotice::MessageAppended(message));
        effect.follow_up = Some(FollowUp::ResetSpeaking {
            participant_id: speaker_id,
        });
        effect
    }

    fn set_speaking(&mut self, participant_id: &str, speaking: bool) -> Effect {
        match self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id && !p.is_you)
        {
            Some(p) => {
                p.is_speaking = speaking;
                Effect::notify(SessionNotice::SpeakingChanged {
                    participant_id: p.id.clone(),
                    is_speaking: speaking,
                })
            }
            None => Effect::ignored(),
        }
    }

    fn toggle_human(&mut self, flag: HumanFlag) -> Effect {
        let Some(you) = self.participants.iter_mut().find(|p| p.is_you) else {
            return Effect::ignored();
        };

        match flag {
            HumanFlag::Muted => you.is_muted = !you.is_muted,
            HumanFlag::VideoOff => you.is_video_off = !you.is_video_off,
            HumanFlag::HandRaised => you.is_hand_raised = !you.is_hand_raised,
        }
        Effect::notify(SessionNotice::ParticipantUpdated(you.clone()))
    }

    fn react(&mut self, emoji: &str, at: DateTime<Utc>) -> Effect {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Effect::ignored();
        }
        let Some(you) = self.participants.iter().find(|p| p.is_you) else {
            return Effect::ignored();
        };

        let reaction = Reaction {
            id: Uuid::now_v7().to_string(),
            emoji: emoji.to_string(),
            participant_id: you.id.clone(),
            timestamp: at,
        };
        self.reactions.push(reaction.clone());

        let reaction_id = reaction.id.clone();
        let mut effect = Effect::notify(SessionNotice::ReactionAdded(reaction));
        effect.follow_up = Some(FollowUp::ExpireReaction { reaction_id });
        effect
    }

    fn deactivate(&mut self, reason: EndReason) -> Effect {
        self.phase = SessionPhase::Ending;
        self.end_reason = Some(reason);
        Effect::deactivated(reason)
    }
}
