//! Optional speech-to-text input
//!
//! The session never depends on a recognizer being present; text input
//! always works.

pub mod input;
pub mod recognizer;

pub use input::{drive, VoiceInput};
pub use recognizer::{
    ScriptedRecognizer, SpeechError, SpeechEvent, SpeechRecognizer, SpeechRecognizerFactory,
    SpeechSource,
};
