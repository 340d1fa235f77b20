//! Single-flight speech feedback channel.
//!
//! Contract: at most one utterance is ever in flight. There is no queue; a
//! new `speak` always cancels whatever is playing first. Every consumer of
//! spoken feedback must route through this channel, otherwise the
//! single-flight guarantee is bypassed.

use crate::config::VoiceConfig;
use crate::defaults;
use crate::prefs::PrefsStore;
use crate::speech::synthesizer::{Synthesizer, Utterance};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Inner {
    synthesizer: Box<dyn Synthesizer>,
    last_feedback: Option<(String, Instant)>,
}

pub struct FeedbackChannel {
    prefs: Arc<PrefsStore>,
    inner: Mutex<Inner>,
    voice: VoiceConfig,
    clear_after: Duration,
}

impl FeedbackChannel {
    pub fn new(synthesizer: Box<dyn Synthesizer>, prefs: Arc<PrefsStore>) -> Self {
        Self::with_voice(
            synthesizer,
            prefs,
            VoiceConfig::default(),
            Duration::from_millis(defaults::FEEDBACK_CLEAR_MS),
        )
    }

    pub fn with_voice(
        synthesizer: Box<dyn Synthesizer>,
        prefs: Arc<PrefsStore>,
        voice: VoiceConfig,
        clear_after: Duration,
    ) -> Self {
        Self {
            prefs,
            inner: Mutex::new(Inner {
                synthesizer,
                last_feedback: None,
            }),
            voice,
            clear_after,
        }
    }

    /// Speak `text`, pre-empting any in-flight utterance.
    pub fn speak(&self, text: &str) {
        self.speak_at(text, Instant::now());
    }

    /// Speak with an explicit timestamp for the feedback indicator.
    pub fn speak_at(&self, text: &str, now: Instant) {
        if !self.prefs.get().tts_enabled {
            return;
        }

        let utterance = Utterance::new(text).with_voice(
            self.voice.rate,
            self.voice.pitch,
            &self.voice.locale,
        );

        let mut inner = self.lock();
        inner.synthesizer.cancel();
        inner.synthesizer.speak(&utterance);
        inner.last_feedback = Some((text.to_string(), now));
    }

    /// Cancel the current utterance, if any.
    pub fn stop(&self) {
        self.lock().synthesizer.cancel();
    }

    /// The short-lived "last feedback" value shown by the UI indicator.
    ///
    /// Expires after the configured window unless overwritten sooner.
    pub fn last_feedback(&self, now: Instant) -> Option<String> {
        let mut inner = self.lock();
        if expired(&inner.last_feedback, now, self.clear_after) {
            inner.last_feedback = None;
            return None;
        }
        inner.last_feedback.as_ref().map(|(text, _)| text.clone())
    }

    /// Drop an expired feedback value. Called from the owner's tick.
    pub fn tick(&self, now: Instant) {
        let mut inner = self.lock();
        if expired(&inner.last_feedback, now, self.clear_after) {
            inner.last_feedback = None;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("feedback lock poisoned")
    }
}

fn expired(entry: &Option<(String, Instant)>, now: Instant, window: Duration) -> bool {
    matches!(entry, Some((_, at)) if now.duration_since(*at) >= window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingReporter;
    use crate::prefs::{MemoryStorage, PrefsPatch, RootStyle};
    use crate::speech::synthesizer::{MockSynthesizer, SynthEvent};

    fn prefs_store() -> Arc<PrefsStore> {
        let store = PrefsStore::new(
            Box::new(MemoryStorage::new()),
            Box::new(RootStyle::new()),
            Arc::new(CollectingReporter::new()),
        );
        store.hydrate();
        Arc::new(store)
    }

    fn channel_with_mock() -> (FeedbackChannel, Arc<Mutex<MockSynthesizer>>, Arc<PrefsStore>) {
        let mock = Arc::new(Mutex::new(MockSynthesizer::new()));
        let prefs = prefs_store();
        let channel = FeedbackChannel::with_voice(
            Box::new(mock.clone()),
            prefs.clone(),
            VoiceConfig::default(),
            Duration::from_millis(3000),
        );
        (channel, mock, prefs)
    }

    #[test]
    fn test_speak_cancels_before_speaking() {
        let (channel, mock, _prefs) = channel_with_mock();

        channel.speak("a");
        channel.speak("b");

        let mock = mock.lock().unwrap();
        // Exactly one utterance in flight, and it is the newest one.
        assert_eq!(mock.active().unwrap().text, "b");
        assert_eq!(
            mock.events(),
            &[
                SynthEvent::Cancel,
                SynthEvent::Speak("a".to_string()),
                SynthEvent::Cancel,
                SynthEvent::Speak("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_stop_cancels_current_utterance() {
        let (channel, mock, _prefs) = channel_with_mock();

        channel.speak("algo");
        channel.stop();

        assert!(mock.lock().unwrap().active().is_none());
    }

    #[test]
    fn test_speak_uses_fixed_voice_parameters() {
        let (channel, mock, _prefs) = channel_with_mock();
        channel.speak("hola");

        let mock = mock.lock().unwrap();
        let active = mock.active().unwrap();
        assert_eq!(active.rate, 1.0);
        assert_eq!(active.pitch, 1.0);
        assert_eq!(active.locale, "es-ES");
    }

    #[test]
    fn test_disabled_tts_suppresses_speech() {
        let (channel, mock, prefs) = channel_with_mock();
        prefs.patch(PrefsPatch {
            tts_enabled: Some(false),
            ..Default::default()
        });

        channel.speak("silencio");

        assert!(mock.lock().unwrap().events().is_empty());
    }

    #[test]
    fn test_last_feedback_expires_after_window() {
        let (channel, _mock, _prefs) = channel_with_mock();
        let t0 = Instant::now();

        channel.speak_at("listo", t0);
        assert_eq!(
            channel.last_feedback(t0 + Duration::from_millis(100)),
            Some("listo".to_string())
        );
        assert_eq!(channel.last_feedback(t0 + Duration::from_millis(3001)), None);
    }

    #[test]
    fn test_last_feedback_overwritten_by_newer_speak() {
        let (channel, _mock, _prefs) = channel_with_mock();
        let t0 = Instant::now();

        channel.speak_at("uno", t0);
        channel.speak_at("dos", t0 + Duration::from_millis(2900));

        // The second value gets its own full window.
        assert_eq!(
            channel.last_feedback(t0 + Duration::from_millis(4000)),
            Some("dos".to_string())
        );
    }

    #[test]
    fn test_tick_clears_expired_feedback() {
        let (channel, _mock, _prefs) = channel_with_mock();
        let t0 = Instant::now();

        channel.speak_at("listo", t0);
        channel.tick(t0 + Duration::from_millis(3500));
        assert_eq!(channel.last_feedback(t0 + Duration::from_millis(3600)), None);
    }
}
