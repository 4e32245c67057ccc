use crate::random::RandomSource;
use crate::session::{TranscriptMessage, HUMAN_ID, HUMAN_NAME};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A metric drawn uniformly from `[baseline, baseline + jitter)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub baseline: f64,
    pub jitter: f64,
}

impl MetricRange {
    pub const fn new(baseline: f64, jitter: f64) -> Self {
        Self { baseline, jitter }
    }

    fn sample(&self, random: &mut dyn RandomSource) -> f64 {
        self.baseline + self.jitter * random.next_unit()
    }
}

pub const RELEVANCE: MetricRange = MetricRange::new(7.8, 1.5);
pub const COMMUNICATION: MetricRange = MetricRange::new(7.5, 2.0);
pub const CONFIDENCE: MetricRange = MetricRange::new(7.2, 2.3);
pub const LOGICAL_FLOW: MetricRange = MetricRange::new(7.6, 1.8);

/// Jitter added on top of the participation base
pub const PARTICIPATION_JITTER: f64 = 1.5;

/// Participation base when the human never spoke
pub const SILENT_PARTICIPATION_BASE: f64 = 6.5;

const STRENGTHS: [&str; 5] = [
    "Clear and articulate presentation of ideas",
    "Strong understanding of the topic and its implications",
    "Respectful and collaborative approach with other participants",
    "Used relevant real-world examples to support arguments",
    "Maintained composure and confidence throughout the discussion",
];

const WEAKNESSES: [&str; 3] = [
    "Could initiate more points proactively",
    "Some arguments needed deeper analysis",
    "More engagement with opposing viewpoints would strengthen arguments",
];

const SUGGESTIONS: [&str; 5] = [
    "Practice opening statements to initiate discussions confidently",
    "Back up your arguments with statistics and credible sources",
    "Actively acknowledge and build upon other participants' points",
    "Summarize key takeaways at the end to leave a strong impression",
    "Work on body language and eye contact for better presence",
];

/// Simulated performance report for the human participant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GdResult {
    pub participant_id: String,
    pub participant_name: String,

    /// Average of the five metrics, one decimal
    pub score: f64,

    /// Simulated placement among the room, 1..=3
    pub rank: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub relevance: f64,
    pub communication: f64,
    pub confidence: f64,
    pub participation: f64,
    pub logical_flow: f64,
}

impl GdResult {
    /// Metrics with their display labels, in report order
    pub fn metrics(&self) -> [(&'static str, f64); 5] {
        [
            ("Relevance", self.relevance),
            ("Communication", self.communication),
            ("Confidence", self.confidence),
            ("Participation", self.participation),
            ("Logical Flow", self.logical_flow),
        ]
    }
}

/// Coarse grading of a metric or score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn of(value: f64) -> Self {
        if value >= 8.0 {
            ScoreBand::Strong
        } else if value >= 6.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Ordinal label for a rank: 1st, 2nd, 3rd, 4th...
pub fn rank_label(rank: u8) -> String {
    match rank {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

/// Participation base for `k` human messages: 6.5 when silent, otherwise
/// `5 + (k / 3) * 5` capped at 10
pub fn participation_base(human_messages: usize) -> f64 {
    if human_messages == 0 {
        SILENT_PARTICIPATION_BASE
    } else {
        (5.0 + (human_messages as f64 / 3.0) * 5.0).min(10.0)
    }
}

/// Turns a finished transcript into a `GdResult`
pub struct ResultGenerator {
    random: Box<dyn RandomSource>,
}

impl ResultGenerator {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Score the human participant. Total: an empty transcript still yields a report.
    pub fn generate(&mut self, transcript: &[TranscriptMessage]) -> GdResult {
        let human_messages = transcript.iter().filter(|m| m.is_you).count();
        let base = participation_base(human_messages);

        let random = self.random.as_mut();
        let relevance = RELEVANCE.sample(random);
        let communication = COMMUNICATION.sample(random);
        let confidence = CONFIDENCE.sample(random);
        let logical_flow = LOGICAL_FLOW.sample(random);
        let participation = MetricRange::new(base, PARTICIPATION_JITTER).sample(random);

        let average =
            (participation + relevance + communication + confidence + logical_flow) / 5.0;
        let score = round_to_tenth(average).clamp(0.0, 10.0);

        // Placement is simulated; it is not derived from the score
        let rank = random.next_index(3) as u8 + 1;

        debug!(
            "Scored {} human message(s): score={:.1}, rank={}",
            human_messages, score, rank
        );

        GdResult {
            participant_id: HUMAN_ID.to_string(),
            participant_name: HUMAN_NAME.to_string(),
            score,
            rank,
            strengths: STRENGTHS.iter().map(|s| s.to_string()).collect(),
            weaknesses: WEAKNESSES.iter().map(|s| s.to_string()).collect(),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            relevance,
            communication,
            confidence,
            participation,
            logical_flow,
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
