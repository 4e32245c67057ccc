// Tests for the simulated performance report

use chrono::Utc;
use gd_room::result::{
    participation_base, rank_label, ResultGenerator, PARTICIPATION_JITTER,
    SILENT_PARTICIPATION_BASE,
};
use gd_room::{SequenceRandom, StdRandom, TranscriptMessage};

fn message(i: usize, is_you: bool) -> TranscriptMessage {
    TranscriptMessage {
        id: format!("m{}", i),
        participant_id: if is_you { "you".into() } else { "1".into() },
        participant_name: if is_you { "You".into() } else { "Arjun Sharma".into() },
        content: format!("point {}", i),
        timestamp: Utc::now(),
        is_you,
    }
}

fn transcript(human: usize, ai: usize) -> Vec<TranscriptMessage> {
    let mut messages: Vec<_> = (0..ai).map(|i| message(i, false)).collect();
    messages.extend((0..human).map(|i| message(ai + i, true)));
    messages
}

#[test]
fn test_empty_transcript_still_produces_report() {
    let mut generator = ResultGenerator::new(Box::new(SequenceRandom::constant(0.0)));
    let result = generator.generate(&[]);

    assert_eq!(result.participant_id, "you");
    assert_eq!(result.participant_name, "You");
    assert_eq!(result.participation, SILENT_PARTICIPATION_BASE);
    assert_eq!(result.strengths.len(), 5);
    assert_eq!(result.weaknesses.len(), 3);
    assert_eq!(result.suggestions.len(), 5);
    assert!((0.0..=10.0).contains(&result.score));
}

#[test]
fn test_baselines_with_zero_jitter() {
    let mut generator = ResultGenerator::new(Box::new(SequenceRandom::constant(0.0)));
    let result = generator.generate(&transcript(0, 4));

    assert_eq!(result.relevance, 7.8);
    assert_eq!(result.communication, 7.5);
    assert_eq!(result.confidence, 7.2);
    assert_eq!(result.logical_flow, 7.6);
    assert_eq!(result.participation, 6.5);
    // (6.5 + 7.8 + 7.5 + 7.2 + 7.6) / 5 = 7.32
    assert_eq!(result.score, 7.3);
    assert_eq!(result.rank, 1);
}

#[test]
fn test_only_human_messages_count_toward_participation() {
    let mut generator = ResultGenerator::new(Box::new(SequenceRandom::constant(0.0)));

    let quiet = generator.generate(&transcript(0, 12));
    assert_eq!(quiet.participation, 6.5);

    let one = generator.generate(&transcript(1, 12));
    assert!((one.participation - participation_base(1)).abs() < 1e-9);
}

#[test]
fn test_participation_bounds_for_silent_and_active_humans() {
    for seed in 0..200 {
        let mut generator = ResultGenerator::new(Box::new(StdRandom::seeded(seed)));

        let silent = generator.generate(&transcript(0, 5));
        assert!(silent.participation >= 6.5);
        assert!(silent.participation < 6.5 + PARTICIPATION_JITTER);

        let chatty = generator.generate(&transcript(6, 5));
        assert!(chatty.participation >= 10.0, "k=6 caps the base at 10");
        assert!(chatty.participation < 10.0 + PARTICIPATION_JITTER);
    }
}

#[test]
fn test_score_and_metrics_stay_in_range() {
    for seed in 0..500 {
        let mut generator = ResultGenerator::new(Box::new(StdRandom::seeded(seed)));
        let result = generator.generate(&transcript((seed % 9) as usize, 5));

        assert!((0.0..=10.0).contains(&result.score), "score {}", result.score);
        assert_eq!(result.score, (result.score * 10.0).round() / 10.0, "one decimal");
        assert!((1..=3).contains(&result.rank));

        assert!((7.8..9.3).contains(&result.relevance));
        assert!((7.5..9.5).contains(&result.communication));
        assert!((7.2..9.5).contains(&result.confidence));
        assert!((7.6..9.4).contains(&result.logical_flow));
    }
}

#[test]
fn test_max_jitter_score() {
    let mut generator = ResultGenerator::new(Box::new(SequenceRandom::constant(0.999_999)));
    let result = generator.generate(&transcript(9, 0));

    assert!(result.participation > 11.4);
    assert!(result.score <= 10.0);
    assert_eq!(result.rank, 3);
    assert_eq!(rank_label(result.rank), "3rd");
}

#[test]
fn test_rank_covers_all_placements() {
    let mut seen = [false; 3];
    let mut generator = ResultGenerator::new(Box::new(StdRandom::seeded(7)));
    for _ in 0..200 {
        let result = generator.generate(&[]);
        seen[(result.rank - 1) as usize] = true;
    }
    assert_eq!(seen, [true, true, true]);
}

#[test]
fn test_result_serializes_camel_case() {
    let mut generator = ResultGenerator::new(Box::new(SequenceRandom::constant(0.0)));
    let result = generator.generate(&[]);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("logicalFlow").is_some());
    assert!(json.get("participantName").is_some());
    assert_eq!(json["rank"], 1);
}
