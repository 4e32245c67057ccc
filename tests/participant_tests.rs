// Integration tests for the participant registry and room toggles

use gd_room::{GdSession, Participant, SequenceRandom, SessionConfig, SessionHandle};

fn session() -> SessionHandle {
    SessionHandle::create(SessionConfig::default(), Box::new(SequenceRandom::constant(0.0)))
        .unwrap()
}

fn you(snapshot: &GdSession) -> Participant {
    snapshot.you().cloned().expect("human participant")
}

fn ai(snapshot: &GdSession) -> Vec<Participant> {
    snapshot.ai_participants().cloned().collect()
}

#[tokio::test(start_paused = true)]
async fn test_default_roster() {
    let session = session();
    let snapshot = session.session().await;

    let me = you(&snapshot);
    assert_eq!(me.id, "you");
    assert_eq!(me.name, "You");
    assert!(me.is_muted, "Human joins muted");
    assert!(!me.is_video_off);
    assert!(!me.is_hand_raised);

    let names: Vec<_> = ai(&snapshot).into_iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        vec!["Arjun Sharma", "Priya Patel", "Rahul Verma", "Sneha Gupta", "Vikram Singh"]
    );

    let rahul = snapshot.participant("3").unwrap();
    assert!(rahul.is_video_off);
    let sneha = snapshot.participant("4").unwrap();
    assert!(sneha.is_muted);

    session.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_toggle_parity_affects_only_the_human() {
    let session = session();
    let initial = session.session().await;
    let initial_you = you(&initial);
    let initial_ai = ai(&initial);

    for n in 1..=6 {
        session.toggle_mute().await;
        if n % 2 == 0 {
            session.toggle_video().await;
        }
        if n % 3 == 0 {
            session.toggle_hand_raise().await;
        }

        let snapshot = session.session().await;
        let me = you(&snapshot);
        let mute_calls = n;
        let video_calls = n / 2;
        let hand_calls = n / 3;

        assert_eq!(me.is_muted, initial_you.is_muted ^ (mute_calls % 2 == 1));
        assert_eq!(me.is_video_off, initial_you.is_video_off ^ (video_calls % 2 == 1));
        assert_eq!(me.is_hand_raised, initial_you.is_hand_raised ^ (hand_calls % 2 == 1));
        assert_eq!(ai(&snapshot), initial_ai, "AI participants must never change");
        assert_eq!(snapshot.participants.iter().filter(|p| p.is_you).count(), 1);
    }

    session.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_double_toggle_restores_state() {
    let session = session();
    let before = session.session().await;

    session.toggle_mute().await;
    session.toggle_mute().await;
    session.toggle_video().await;
    session.toggle_video().await;
    session.toggle_hand_raise().await;
    session.toggle_hand_raise().await;
    session.toggle_recording().await;
    session.toggle_recording().await;
    session.toggle_screen_share().await;
    session.toggle_screen_share().await;

    let after = session.session().await;
    assert_eq!(before.participants, after.participants);
    assert_eq!(before.is_recording, after.is_recording);
    assert_eq!(before.is_screen_sharing, after.is_screen_sharing);

    session.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_recording_and_screen_share_are_independent() {
    let session = session();

    session.toggle_recording().await;
    let snapshot = session.session().await;
    assert!(snapshot.is_recording);
    assert!(!snapshot.is_screen_sharing);

    session.toggle_screen_share().await;
    session.toggle_recording().await;
    let snapshot = session.session().await;
    assert!(!snapshot.is_recording);
    assert!(snapshot.is_screen_sharing);
    assert!(snapshot.transcript.is_empty());

    session.dispose().await;
}
