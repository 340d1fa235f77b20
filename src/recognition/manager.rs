//! Lifecycle manager for one continuous recognition session.
//!
//! An explicit state machine (`Idle`, `Listening`, `Error`) around a
//! `RecognitionEngine`, with flag-gated auto-restart. The manager forwards
//! fragments untouched; deciding what they mean is the owner's job through
//! the handler it supplies to `pump`.

use crate::defaults;
use crate::recognition::engine::{EngineEvent, RecognitionEngine, StartError, TranscriptFragment};
use crate::recognition::error::RecognitionError;
use std::time::{Duration, Instant};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    Error,
}

/// Result of a `start` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Capability absent; the feature should not render at all.
    Unsupported,
    /// The engine refused to start.
    Failed,
}

/// What the owner wants done with the continuation flag after a
/// non-benign error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    Keep,
    Clear,
}

/// Owner-supplied sink for session events.
pub trait RecognitionHandler {
    /// A partial or final fragment arrived while listening.
    fn on_fragment(&mut self, fragment: &TranscriptFragment);

    /// A non-benign error occurred. Benign kinds (no speech, aborted)
    /// never reach this.
    fn on_error(&mut self, _error: &RecognitionError) -> ErrorDisposition {
        ErrorDisposition::Keep
    }
}

pub struct RecognitionManager {
    engine: Box<dyn RecognitionEngine>,
    state: SessionState,
    continuation: bool,
    last_error: Option<RecognitionError>,
    restart_at: Option<Instant>,
    restart_delay: Duration,
}

impl RecognitionManager {
    pub fn new(engine: Box<dyn RecognitionEngine>) -> Self {
        Self::with_restart_delay(engine, Duration::from_millis(defaults::RESTART_DELAY_MS))
    }

    pub fn with_restart_delay(engine: Box<dyn RecognitionEngine>, restart_delay: Duration) -> Self {
        Self {
            engine,
            state: SessionState::Idle,
            continuation: false,
            last_error: None,
            restart_at: None,
            restart_delay,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    pub fn continuation(&self) -> bool {
        self.continuation
    }

    /// Set the auto-restart gate. Owned by the enabling component's
    /// toggle, never by the session itself.
    pub fn set_continuation(&mut self, continuation: bool) {
        self.continuation = continuation;
    }

    pub fn last_error(&self) -> Option<&RecognitionError> {
        self.last_error.as_ref()
    }

    /// Whether a delayed restart is currently scheduled.
    pub fn restart_pending(&self) -> bool {
        self.restart_at.is_some()
    }

    /// Start a session.
    ///
    /// A "double start" from the engine is caught and treated as success,
    /// which makes `start` idempotent under toggle races.
    pub fn start(&mut self) -> StartOutcome {
        if !self.engine.is_available() {
            return StartOutcome::Unsupported;
        }
        match self.engine.start() {
            Ok(()) | Err(StartError::AlreadyStarted) => {
                self.enter_listening();
                StartOutcome::Started
            }
            Err(StartError::Failed(_)) => StartOutcome::Failed,
        }
    }

    /// Stop the session. Idempotent; "not started" is swallowed.
    pub fn stop(&mut self) {
        let _ = self.engine.stop();
        self.state = SessionState::Idle;
        self.restart_at = None;
    }

    /// Drain engine events, run transitions, fire a due restart.
    pub fn pump(&mut self, now: Instant, handler: &mut dyn RecognitionHandler) {
        while let Some(event) = self.engine.try_event() {
            match event {
                EngineEvent::Result(fragment) => {
                    // A fragment that lands after stop is a stale callback;
                    // the flag re-check drops it.
                    if self.state == SessionState::Listening {
                        handler.on_fragment(&fragment);
                    }
                }
                EngineEvent::End => self.session_ended(now),
                EngineEvent::Error { raw } => self.session_errored(&raw, handler),
            }
        }

        self.fire_due_restart(now);
    }

    fn enter_listening(&mut self) {
        self.state = SessionState::Listening;
        self.last_error = None;
        self.restart_at = None;
    }

    /// Transition out of a finished session; schedule the restart if the
    /// continuation gate is still open.
    fn session_ended(&mut self, now: Instant) {
        self.state = SessionState::Idle;
        if self.continuation {
            self.restart_at = Some(now + self.restart_delay);
        }
    }

    /// Classify the raw error into state. Benign kinds leave the
    /// continuation gate untouched; all others ask the handler.
    fn session_errored(&mut self, raw: &str, handler: &mut dyn RecognitionHandler) {
        let error = RecognitionError::classify(raw);
        self.state = SessionState::Error;

        if !error.kind.is_benign()
            && handler.on_error(&error) == ErrorDisposition::Clear
        {
            self.continuation = false;
            self.restart_at = None;
        }

        self.last_error = Some(error);
    }

    /// The restart re-checks the continuation flag at fire time, so a
    /// disable during the delay window suppresses it. Start failures here
    /// are swallowed: the device may have gone away mid-delay.
    fn fire_due_restart(&mut self, now: Instant) {
        match self.restart_at {
            Some(at) if now >= at => {}
            _ => return,
        }
        self.restart_at = None;

        if !self.continuation || self.state == SessionState::Listening {
            return;
        }
        if let Ok(()) | Err(StartError::AlreadyStarted) = self.engine.start() {
            self.enter_listening();
        }
    }
}
