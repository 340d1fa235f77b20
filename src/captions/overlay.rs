//! Standalone live-transcription overlay.
//!
//! Unlike video captions, the overlay accumulates: every final fragment is
//! appended to one continuously growing displayed string. Recognition runs
//! exactly while the live-transcription preference is enabled. Errors do
//! not clear the continuation gate here; the overlay keeps trying for as
//! long as the user leaves it on.

use crate::captions::diagnostics::{CaptureProbe, MicTestOutcome};
use crate::recognition::engine::TranscriptFragment;
use crate::recognition::error::RecognitionError;
use crate::recognition::manager::{
    ErrorDisposition, RecognitionHandler, RecognitionManager,
};
use std::time::Instant;

#[derive(Debug, Default)]
struct OverlaySink {
    accumulated: String,
    last_error: Option<&'static str>,
}

impl RecognitionHandler for OverlaySink {
    fn on_fragment(&mut self, fragment: &TranscriptFragment) {
        if !fragment.is_final {
            return;
        }
        if !self.accumulated.is_empty() {
            self.accumulated.push(' ');
        }
        self.accumulated.push_str(&fragment.text);
    }

    fn on_error(&mut self, error: &RecognitionError) -> ErrorDisposition {
        self.last_error = Some(error.friendly());
        ErrorDisposition::Keep
    }
}

pub struct TranscriptionOverlay {
    manager: RecognitionManager,
    sink: OverlaySink,
    enabled: bool,
}

impl TranscriptionOverlay {
    pub fn new(manager: RecognitionManager) -> Self {
        Self {
            manager,
            sink: OverlaySink::default(),
            enabled: false,
        }
    }

    /// Follow the live-transcription preference flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            if !self.manager.is_listening() {
                self.manager.set_continuation(true);
                self.manager.start();
            }
        } else {
            self.manager.set_continuation(false);
            self.manager.stop();
            self.sink.accumulated.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_listening(&self) -> bool {
        self.manager.is_listening()
    }

    /// Drain session events.
    pub fn tick(&mut self, now: Instant) {
        self.manager.pump(now, &mut self.sink);
    }

    /// The growing transcript.
    pub fn transcript(&self) -> &str {
        &self.sink.accumulated
    }

    pub fn last_error_message(&self) -> Option<&'static str> {
        self.sink.last_error
    }

    /// Briefly request and release a capture stream to check that the
    /// microphone is reachable.
    pub fn mic_self_test(&self, probe: &mut dyn CaptureProbe) -> MicTestOutcome {
        probe.request_and_release()
    }
}
