use super::recognizer::{SpeechError, SpeechEvent, SpeechRecognizer};
use crate::session::SessionHandle;
use tracing::{info, warn};

/// Buffer between a speech recognizer and the session
///
/// Interim text replaces whatever is pending; final text replaces it and is
/// committed for sending.
#[derive(Debug, Default)]
pub struct VoiceInput {
    pending: String,
}

impl VoiceInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text heard so far but not yet sent
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Feed one recognizer event; returns text ready to send
    pub fn on_event(&mut self, event: SpeechEvent) -> Option<String> {
        match event {
            SpeechEvent::Interim(text) => {
                self.pending = text;
                None
            }
            SpeechEvent::Final(text) => {
                self.pending = text;
                self.take()
            }
            SpeechEvent::Error(err) => {
                warn!("Speech recognition error: {}", err);
                None
            }
        }
    }

    /// Take the pending text if it is not blank
    pub fn take(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.pending);
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Listen with `recognizer` and send each settled utterance to `session`.
///
/// Unmutes the human when listening starts. Stops when the recognizer runs
/// dry, reports an error, or the session ends. Returns the number of lines
/// that reached the transcript.
pub async fn drive(
    recognizer: &mut dyn SpeechRecognizer,
    session: &SessionHandle,
) -> Result<usize, SpeechError> {
    let mut events = recognizer.start().await?;
    info!("Voice input started with {} recognizer", recognizer.name());

    let muted = session
        .session()
        .await
        .you()
        .map(|p| p.is_muted)
        .unwrap_or(false);
    if muted {
        session.toggle_mute().await;
    }

    let mut input = VoiceInput::new();
    let mut sent = 0;

    while let Some(event) = events.recv().await {
        if !session.is_active() {
            break;
        }

        let failed = matches!(event, SpeechEvent::Error(_));
        if let Some(text) = input.on_event(event) {
            if session.send_message(&text).await {
                sent += 1;
            } else if !session.is_active() {
                break;
            }
        }
        if failed {
            break;
        }
    }

    recognizer.stop().await?;
    info!("Voice input stopped after {} utterance(s)", sent);
    Ok(sent)
}
