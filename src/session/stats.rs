use super::model::SessionPhase;
use super::state::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Below this many seconds the clock is shown as running out
pub const LOW_TIME_THRESHOLD_SECS: u32 = 120;

/// Point-in-time status of a discussion session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub phase: SessionPhase,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Seconds left on the countdown
    pub time_remaining: u32,

    /// Seconds consumed so far, derived from the countdown
    pub elapsed_secs: u32,

    /// Countdown rendered as MM:SS
    pub clock: String,

    /// Whether less than two minutes are left
    pub is_low_time: bool,

    /// Number of transcript lines so far
    pub transcript_len: usize,

    /// Number of lines sent by the human
    pub your_message_count: usize,
}

impl SessionStats {
    pub fn from_state(state: &SessionState) -> Self {
        let remaining = state.time_remaining();
        Self {
            phase: state.phase(),
            started_at: state.start_time(),
            time_remaining: remaining,
            elapsed_secs: state.duration().saturating_sub(remaining),
            clock: format_clock(remaining),
            is_low_time: remaining < LOW_TIME_THRESHOLD_SECS,
            transcript_len: state.transcript().len(),
            your_message_count: state.transcript().iter().filter(|m| m.is_you).count(),
        }
    }
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(1200), "20:00");
        assert_eq!(format_clock(119), "01:59");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
