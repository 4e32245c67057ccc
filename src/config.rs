use crate::session::{Participant, SchedulerConfig, SessionConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `GD_ROOM__SESSION__DURATION_SECS=300`
pub const ENV_PREFIX: &str = "GD_ROOM";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub session: SessionSection,
    pub scheduler: SchedulerSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "gd-room".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub topic: Option<String>,
    pub duration_secs: Option<u32>,

    /// Replaces the stock AI roster when set
    pub participants: Option<Vec<ParticipantEntry>>,

    /// Replaces the stock scripted lines when set
    pub responses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub video_off: bool,
}

/// Scheduler timings in milliseconds
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    pub initial_delay_ms: Option<u64>,
    pub min_interval_ms: Option<u64>,
    pub max_interval_ms: Option<u64>,
    pub speaking_window_ms: Option<u64>,
    pub reaction_ttl_ms: Option<u64>,
}

impl Config {
    /// Load from a config file (any format the `config` crate understands),
    /// layered with `GD_ROOM__*` environment variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Stock settings plus environment overrides, no file required
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to read environment configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Build the engine configuration, falling back to stock values
    pub fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        let stock = SchedulerConfig::default();
        let ms = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_millis).unwrap_or(fallback)
        };

        SessionConfig {
            topic: self.session.topic.clone().unwrap_or(defaults.topic),
            duration_secs: self.session.duration_secs.unwrap_or(defaults.duration_secs),
            ai_participants: match &self.session.participants {
                Some(entries) => entries
                    .iter()
                    .map(|e| {
                        Participant::ai(e.id.clone(), e.name.clone())
                            .muted(e.muted)
                            .video_off(e.video_off)
                    })
                    .collect(),
                None => defaults.ai_participants,
            },
            responses: self.session.responses.clone().unwrap_or(defaults.responses),
            scheduler: SchedulerConfig {
                initial_delay: ms(self.scheduler.initial_delay_ms, stock.initial_delay),
                min_interval: ms(self.scheduler.min_interval_ms, stock.min_interval),
                max_interval: ms(self.scheduler.max_interval_ms, stock.max_interval),
                speaking_window: ms(self.scheduler.speaking_window_ms, stock.speaking_window),
                reaction_ttl: ms(self.scheduler.reaction_ttl_ms, stock.reaction_ttl),
                tick: stock.tick,
            },
        }
    }
}
