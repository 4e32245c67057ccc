//! Simulated performance scoring for a finished discussion

mod generator;

pub use generator::{
    participation_base, rank_label, GdResult, MetricRange, ResultGenerator, ScoreBand,
    COMMUNICATION, CONFIDENCE, LOGICAL_FLOW, PARTICIPATION_JITTER, RELEVANCE,
    SILENT_PARTICIPATION_BASE,
};
