// Tests for the optional speech input collaborator

use anyhow::Result;
use gd_room::speech::{
    drive, ScriptedRecognizer, SpeechError, SpeechEvent, SpeechRecognizer,
    SpeechRecognizerFactory, SpeechSource, VoiceInput,
};
use gd_room::{SequenceRandom, SessionConfig, SessionHandle};
use std::time::Duration;

#[test]
fn test_system_recognizer_is_unsupported() {
    match SpeechRecognizerFactory::create(SpeechSource::System) {
        Err(SpeechError::Unsupported(_)) => {}
        Err(other) => panic!("unexpected error: {}", other),
        Ok(recognizer) => panic!("unexpected recognizer: {}", recognizer.name()),
    }
}

#[test]
fn test_voice_input_interim_then_final() {
    let mut input = VoiceInput::new();

    assert_eq!(input.on_event(SpeechEvent::Interim("AI".into())), None);
    assert_eq!(input.pending(), "AI");
    assert_eq!(input.on_event(SpeechEvent::Interim("AI creates".into())), None);
    assert_eq!(input.pending(), "AI creates");

    let sent = input.on_event(SpeechEvent::Final("AI creates jobs".into()));
    assert_eq!(sent.as_deref(), Some("AI creates jobs"));
    assert_eq!(input.pending(), "");
}

#[test]
fn test_voice_input_blank_final_is_dropped() {
    let mut input = VoiceInput::new();
    assert_eq!(input.on_event(SpeechEvent::Final("   ".into())), None);
    assert_eq!(input.take(), None);
}

#[test]
fn test_voice_input_error_keeps_pending_text() {
    let mut input = VoiceInput::new();
    input.on_event(SpeechEvent::Interim("half a thought".into()));
    assert_eq!(input.on_event(SpeechEvent::Error("network".into())), None);
    assert_eq!(input.take().as_deref(), Some("half a thought"));
}

#[tokio::test(start_paused = true)]
async fn test_scripted_recognizer_reveals_words() -> Result<()> {
    let mut recognizer = ScriptedRecognizer::new(vec!["skills matter most".into()])
        .with_word_delay(Duration::from_millis(100));

    let mut rx = recognizer.start().await?;
    assert!(recognizer.is_listening());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            SpeechEvent::Interim("skills".into()),
            SpeechEvent::Interim("skills matter".into()),
            SpeechEvent::Interim("skills matter most".into()),
            SpeechEvent::Final("skills matter most".into()),
        ]
    );

    recognizer.stop().await?;
    assert!(!recognizer.is_listening());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scripted_recognizer_rejects_double_start() -> Result<()> {
    let mut recognizer = ScriptedRecognizer::new(vec!["one".into()]);
    let _rx = recognizer.start().await?;

    assert!(matches!(
        recognizer.start().await,
        Err(SpeechError::AlreadyListening(_))
    ));

    recognizer.stop().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drive_unmutes_and_sends_final_utterances() -> Result<()> {
    let session =
        SessionHandle::create(SessionConfig::default(), Box::new(SequenceRandom::constant(0.0)))?;
    assert!(session.session().await.you().unwrap().is_muted);

    let mut recognizer = ScriptedRecognizer::new(vec![
        "AI creates new roles".into(),
        "adaptability is key".into(),
    ])
    .with_word_delay(Duration::from_millis(100));

    let sent = drive(&mut recognizer, &session).await?;
    assert_eq!(sent, 2);

    let snapshot = session.session().await;
    assert!(!snapshot.you().unwrap().is_muted, "Listening unmutes the human");

    let spoken: Vec<_> = snapshot
        .transcript
        .iter()
        .filter(|m| m.is_you)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(spoken, vec!["AI creates new roles", "adaptability is key"]);
    assert!(!recognizer.is_listening());

    session.dispose().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drive_stops_when_session_ended() -> Result<()> {
    let session =
        SessionHandle::create(SessionConfig::default(), Box::new(SequenceRandom::constant(0.0)))?;
    session.end_session().await;

    let mut recognizer = ScriptedRecognizer::new(vec!["too late".into()])
        .with_word_delay(Duration::from_millis(100));
    let sent = drive(&mut recognizer, &session).await?;

    assert_eq!(sent, 0);
    assert!(session.session().await.transcript.is_empty());

    session.dispose().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drive_counts_only_lines_that_reached_transcript() -> Result<()> {
    let config = SessionConfig {
        duration_secs: 2,
        ..SessionConfig::default()
    };
    let session = SessionHandle::create(config, Box::new(SequenceRandom::constant(0.0)))?;

    // First line settles at 0.6s, the second would settle at 2.7s, after time is up
    let mut recognizer = ScriptedRecognizer::new(vec![
        "one two".into(),
        "three four five six seven eight nine".into(),
    ])
    .with_word_delay(Duration::from_millis(300));

    let sent = drive(&mut recognizer, &session).await?;

    let spoken = session
        .session()
        .await
        .transcript
        .iter()
        .filter(|m| m.is_you)
        .count();
    assert!(!session.is_active());
    assert_eq!(sent, 1);
    assert_eq!(sent, spoken);

    session.dispose().await;
    Ok(())
}
