//! Trait for platform speech synthesis.
//!
//! The platform capability may be entirely absent; `NullSynthesizer` stands
//! in and every call degrades to a no-op.

use crate::defaults;

/// A single utterance with fixed voice parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub locale: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            rate: defaults::TTS_RATE,
            pitch: defaults::TTS_PITCH,
            locale: defaults::LOCALE.to_string(),
        }
    }

    pub fn with_voice(mut self, rate: f32, pitch: f32, locale: &str) -> Self {
        self.rate = rate;
        self.pitch = pitch;
        self.locale = locale.to_string();
        self
    }
}

/// Trait for text-to-speech output.
///
/// This trait allows swapping implementations (platform TTS vs mock).
/// Implementations are not required to queue: callers that need the
/// one-utterance-in-flight contract go through `FeedbackChannel`.
pub trait Synthesizer: Send {
    /// Whether the platform capability is present.
    fn is_available(&self) -> bool;

    /// Begin speaking an utterance.
    fn speak(&mut self, utterance: &Utterance);

    /// Cancel whatever is playing or pending.
    fn cancel(&mut self);
}

/// Implement Synthesizer for a shared handle so a test or UI layer can
/// keep inspecting an engine it handed to the feedback channel.
impl<T: Synthesizer> Synthesizer for std::sync::Arc<std::sync::Mutex<T>> {
    fn is_available(&self) -> bool {
        self.lock().expect("synthesizer lock poisoned").is_available()
    }

    fn speak(&mut self, utterance: &Utterance) {
        self.lock().expect("synthesizer lock poisoned").speak(utterance)
    }

    fn cancel(&mut self) {
        self.lock().expect("synthesizer lock poisoned").cancel()
    }
}

/// Synthesizer used when the platform has no speech output.
///
/// Every operation is a no-op; features relying on speech silently
/// disable themselves.
#[derive(Debug, Default)]
pub struct NullSynthesizer;

impl Synthesizer for NullSynthesizer {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: &Utterance) {}

    fn cancel(&mut self) {}
}

/// An observable synthesis event, recorded by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthEvent {
    Speak(String),
    Cancel,
}

/// Mock synthesizer for testing.
///
/// Records the full event sequence and tracks which utterance is
/// currently "audible".
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    events: Vec<SynthEvent>,
    active: Option<Utterance>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The utterance currently in flight, if any.
    pub fn active(&self) -> Option<&Utterance> {
        self.active.as_ref()
    }

    /// Every speak/cancel event in order.
    pub fn events(&self) -> &[SynthEvent] {
        &self.events
    }

    /// Texts of all utterances ever started.
    pub fn spoken(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SynthEvent::Speak(text) => Some(text.clone()),
                SynthEvent::Cancel => None,
            })
            .collect()
    }
}

impl Synthesizer for MockSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: &Utterance) {
        self.events.push(SynthEvent::Speak(utterance.text.clone()));
        self.active = Some(utterance.clone());
    }

    fn cancel(&mut self) {
        self.events.push(SynthEvent::Cancel);
        self.active = None;
    }
}
