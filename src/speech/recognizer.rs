use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Text produced by a speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Best guess so far for the current utterance; replaces earlier guesses
    Interim(String),
    /// Settled text for the current utterance
    Final(String),
    /// Recognizer-reported failure; listening stops
    Error(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech recognition is not supported: {0}")]
    Unsupported(String),

    #[error("recognizer {0} is already listening")]
    AlreadyListening(String),
}

/// Speech recognizer trait
///
/// Implementations:
/// - Scripted: replays fixed utterances (demo/testing)
/// - System: platform recognizer, not available in this crate
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start listening
    ///
    /// Returns a channel receiver that yields interim and final text
    async fn start(&mut self) -> Result<mpsc::Receiver<SpeechEvent>, SpeechError>;

    /// Stop listening
    async fn stop(&mut self) -> Result<(), SpeechError>;

    /// Check if the recognizer is currently listening
    fn is_listening(&self) -> bool;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

/// Speech input source
#[derive(Debug, Clone)]
pub enum SpeechSource {
    /// Platform speech recognition
    System,
    /// Replay the given utterances
    Scripted(Vec<String>),
}

/// Speech recognizer factory
pub struct SpeechRecognizerFactory;

impl SpeechRecognizerFactory {
    pub fn create(source: SpeechSource) -> Result<Box<dyn SpeechRecognizer>, SpeechError> {
        match source {
            SpeechSource::System => Err(SpeechError::Unsupported(
                "no platform speech recognizer is available; use text input".to_string(),
            )),
            SpeechSource::Scripted(lines) => Ok(Box::new(ScriptedRecognizer::new(lines))),
        }
    }
}

/// Recognizer that "hears" a fixed list of utterances
///
/// Each utterance is revealed word by word as interim results, then
/// delivered as a final result.
pub struct ScriptedRecognizer {
    lines: Vec<String>,
    word_delay: Duration,
    listening: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ScriptedRecognizer {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            word_delay: Duration::from_millis(150),
            listening: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    pub fn with_word_delay(mut self, delay: Duration) -> Self {
        self.word_delay = delay;
        self
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<SpeechEvent>, SpeechError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(SpeechError::AlreadyListening(self.name().to_string()));
        }

        info!("Scripted recognizer started ({} utterances)", self.lines.len());

        let (tx, rx) = mpsc::channel(32);
        let lines = self.lines.clone();
        let delay = self.word_delay;
        let listening = Arc::clone(&self.listening);

        self.task = Some(tokio::spawn(async move {
            'lines: for line in lines {
                let mut heard = String::new();
                for word in line.split_whitespace() {
                    tokio::time::sleep(delay).await;
                    if !heard.is_empty() {
                        heard.push(' ');
                    }
                    heard.push_str(word);
                    if tx.send(SpeechEvent::Interim(heard.clone())).await.is_err() {
                        break 'lines;
                    }
                }
                if tx.send(SpeechEvent::Final(line)).await.is_err() {
                    break;
                }
            }
            listening.store(false, Ordering::SeqCst);
            debug!("Scripted recognizer finished");
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), SpeechError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
