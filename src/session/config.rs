use super::error::SessionError;
use super::model::Participant;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_TOPIC: &str = "Is AI a threat or an opportunity for fresh graduates?";

/// 20 minutes
pub const DEFAULT_DURATION_SECS: u32 = 20 * 60;

pub const HUMAN_ID: &str = "you";
pub const HUMAN_NAME: &str = "You";

pub const DEFAULT_RESPONSES: [&str; 10] = [
    "I believe AI presents more opportunities than threats for fresh graduates. It's creating new job roles that didn't exist before.",
    "While I agree there are opportunities, we can't ignore that AI automation is displacing many entry-level positions.",
    "The key is adaptability. Fresh graduates who learn to work alongside AI will thrive in this new landscape.",
    "I think the education system needs to evolve. We should be teaching AI literacy from an early stage.",
    "Let's not forget the entrepreneurial opportunities. AI tools are making it easier to start businesses with minimal resources.",
    "However, the skill gap is real. Many graduates aren't prepared for AI-integrated workplaces.",
    "I see AI as a great equalizer. It gives graduates from smaller cities access to world-class resources.",
    "The threat perception often comes from resistance to change. Those who embrace AI will find more doors opening.",
    "We should focus on developing skills that AI can't replicate - creativity, emotional intelligence, and critical thinking.",
    "The job market is definitely shifting. Traditional roles are evolving, not disappearing entirely.",
];

pub const REACTION_PALETTE: [&str; 6] = ["👍", "👏", "😊", "🎉", "❤️", "🤔"];

/// Timing knobs for the AI scheduler and transient UI state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Delay before the first AI line
    /// Default: 5 seconds
    pub initial_delay: Duration,

    /// Lower bound (inclusive) of the randomized gap between AI lines
    pub min_interval: Duration,

    /// Upper bound (exclusive) of the randomized gap between AI lines
    pub max_interval: Duration,

    /// How long an AI participant shows as speaking after its line
    pub speaking_window: Duration,

    /// How long a reaction stays on screen
    pub reaction_ttl: Duration,

    /// Countdown resolution
    pub tick: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(5000),
            min_interval: Duration::from_millis(15000),
            max_interval: Duration::from_millis(25000),
            speaking_window: Duration::from_millis(3000),
            reaction_ttl: Duration::from_millis(2000),
            tick: Duration::from_millis(1000),
        }
    }
}

/// Configuration for a discussion session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Discussion topic shown to every participant
    pub topic: String,

    /// Session length in seconds (default: 1200)
    pub duration_secs: u32,

    /// The scripted participants; the human seat is added automatically
    pub ai_participants: Vec<Participant>,

    /// Ordered pool of scripted lines, consumed round-robin
    pub responses: Vec<String>,

    pub scheduler: SchedulerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            ai_participants: vec![
                Participant::ai("1", "Arjun Sharma"),
                Participant::ai("2", "Priya Patel"),
                Participant::ai("3", "Rahul Verma").video_off(true),
                Participant::ai("4", "Sneha Gupta").muted(true),
                Participant::ai("5", "Vikram Singh"),
            ],
            responses: DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Check the room can be built; every later operation relies on these holding
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.duration_secs == 0 {
            return Err(SessionError::ZeroDuration);
        }
        if self.ai_participants.is_empty() {
            return Err(SessionError::NoAiParticipants);
        }
        if self.responses.is_empty() {
            return Err(SessionError::EmptyResponsePool);
        }

        let mut seen = HashSet::new();
        for p in &self.ai_participants {
            if p.id == HUMAN_ID {
                return Err(SessionError::HumanIdTaken(p.id.clone()));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(SessionError::DuplicateParticipant(p.id.clone()));
            }
        }

        let s = &self.scheduler;
        if s.tick.is_zero() {
            return Err(SessionError::ZeroTick);
        }
        if s.min_interval.is_zero() || s.min_interval >= s.max_interval {
            return Err(SessionError::InvalidInterval {
                min_ms: s.min_interval.as_millis() as u64,
                max_ms: s.max_interval.as_millis() as u64,
            });
        }

        Ok(())
    }

    /// Full roster: the human seat first, then the AI participants
    pub fn roster(&self) -> Vec<Participant> {
        let mut participants = Vec::with_capacity(self.ai_participants.len() + 1);
        participants.push(Participant::human(HUMAN_ID, HUMAN_NAME));
        participants.extend(self.ai_participants.iter().cloned().map(|mut p| {
            p.is_you = false;
            p.is_speaking = false;
            p
        }));
        participants
    }
}
