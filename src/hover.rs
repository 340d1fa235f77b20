//! Hover-to-speak: pointer-driven text extraction and speech.
//!
//! Active only while both the hover preference and speech output are
//! enabled. Shares the single-flight feedback channel, so sweeping the
//! pointer across many elements continuously interrupts prior speech;
//! that is the intended reading behavior, not a defect.

use crate::defaults;
use crate::prefs::PrefsStore;
use crate::speech::FeedbackChannel;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A candidate pointer-enter event, already reduced to its text sources.
#[derive(Debug, Clone, Default)]
pub struct HoverEvent {
    /// Accessible label attribute.
    pub label: Option<String>,
    /// Title attribute.
    pub title: Option<String>,
    /// Alternative text attribute.
    pub alt: Option<String>,
    /// Visible text content.
    pub text: Option<String>,
    /// True when the element lives inside the accessibility menu itself,
    /// which must never be read on hover.
    pub within_menu: bool,
}

impl HoverEvent {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn from_label(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }
}

/// Pick the spoken text: label beats title beats alt beats visible text.
/// Whitespace is collapsed and the result truncated; empty extractions
/// yield `None`.
pub fn extract_text(event: &HoverEvent) -> Option<String> {
    let raw = [&event.label, &event.title, &event.alt, &event.text]
        .into_iter()
        .flatten()
        .map(|s| collapse_whitespace(s))
        .find(|s| !s.is_empty())?;

    Some(truncate_chars(&raw, defaults::HOVER_TEXT_MAX))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub struct HoverReader {
    prefs: Arc<PrefsStore>,
    feedback: Arc<FeedbackChannel>,
    dedupe_window: Duration,
    last_spoken: Option<(String, Instant)>,
}

impl HoverReader {
    pub fn new(prefs: Arc<PrefsStore>, feedback: Arc<FeedbackChannel>) -> Self {
        Self::with_dedupe_window(
            prefs,
            feedback,
            Duration::from_millis(defaults::HOVER_DEDUPE_MS),
        )
    }

    pub fn with_dedupe_window(
        prefs: Arc<PrefsStore>,
        feedback: Arc<FeedbackChannel>,
        dedupe_window: Duration,
    ) -> Self {
        Self {
            prefs,
            feedback,
            dedupe_window,
            last_spoken: None,
        }
    }

    /// Handle a pointer-enter event. Returns true when something was
    /// spoken.
    pub fn on_pointer_enter(&mut self, event: &HoverEvent) -> bool {
        self.on_pointer_enter_at(event, Instant::now())
    }

    /// Variant with an explicit timestamp, used by the owner's event loop
    /// and by tests.
    pub fn on_pointer_enter_at(&mut self, event: &HoverEvent, now: Instant) -> bool {
        let prefs = self.prefs.get();
        if !(prefs.hover_to_speak && prefs.tts_enabled) {
            return false;
        }
        if event.within_menu {
            return false;
        }

        let Some(text) = extract_text(event) else {
            return false;
        };

        // An identical text inside the window is a re-hover of the same
        // element; stay quiet. The remembered entry is not refreshed, so
        // the element speaks again once the original window lapses.
        if let Some((prev, at)) = &self.last_spoken
            && *prev == text
            && now.duration_since(*at) < self.dedupe_window
        {
            return false;
        }

        self.feedback.speak_at(&text, now);
        self.last_spoken = Some((text, now));
        true
    }
}
