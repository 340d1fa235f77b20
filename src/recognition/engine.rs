//! Trait for continuous speech recognition engines.
//!
//! The platform capability may be entirely absent (`NullRecognizer`).
//! Engines deliver fragments, session end, and errors as drained events;
//! interpretation of fragments is the caller's job, never the engine's.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

/// A recognized fragment: settled (`is_final`) or still changing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub text: String,
    pub is_final: bool,
}

impl TranscriptFragment {
    pub fn interim(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_final: false,
        }
    }

    pub fn final_(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_final: true,
        }
    }
}

/// Events produced by a recognition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A partial or final transcript fragment.
    Result(TranscriptFragment),
    /// The session ended, for whatever reason.
    End,
    /// A raw engine error code, unclassified.
    Error { raw: String },
}

/// Failure to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// A session is already running. Callers treat this as success.
    AlreadyStarted,
    /// The engine refused to start.
    Failed(String),
}

/// Failure to stop a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopError {
    /// No session was running. Callers swallow this.
    NotStarted,
}

/// Trait for continuous speech-to-text.
///
/// This trait allows swapping implementations (a platform binding vs mock).
/// Sessions are continuous with interim results at a fixed locale; those
/// properties are configured at engine construction, not per call.
pub trait RecognitionEngine: Send {
    /// Whether the platform capability is present.
    fn is_available(&self) -> bool;

    /// Start a continuous session.
    fn start(&mut self) -> Result<(), StartError>;

    /// Stop the running session.
    fn stop(&mut self) -> Result<(), StopError>;

    /// Drain one pending event, non-blocking.
    fn try_event(&mut self) -> Option<EngineEvent>;
}

/// Engine used when the platform has no speech recognition.
#[derive(Debug, Default)]
pub struct NullRecognizer;

impl RecognitionEngine for NullRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), StartError> {
        Err(StartError::Failed("recognition unavailable".to_string()))
    }

    fn stop(&mut self) -> Result<(), StopError> {
        Err(StopError::NotStarted)
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        None
    }
}

/// Mock recognition engine for testing.
#[derive(Debug, Default)]
pub struct MockRecognizer {
    started: bool,
    start_count: u32,
    stop_count: u32,
    fail_next_start: bool,
    queue: std::collections::VecDeque<EngineEvent>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next `try_event` drains.
    pub fn push(&mut self, event: EngineEvent) {
        self.queue.push_back(event);
    }

    /// Make the next `start` call fail.
    pub fn fail_next_start(&mut self) {
        self.fail_next_start = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }
}

impl RecognitionEngine for MockRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), StartError> {
        if self.fail_next_start {
            self.fail_next_start = false;
            return Err(StartError::Failed("mock start failure".to_string()));
        }
        if self.started {
            return Err(StartError::AlreadyStarted);
        }
        self.started = true;
        self.start_count += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), StopError> {
        if !self.started {
            return Err(StopError::NotStarted);
        }
        self.started = false;
        self.stop_count += 1;
        Ok(())
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        self.queue.pop_front()
    }
}

/// Implement the engine for a shared handle so a test can keep driving an
/// engine it handed to a manager.
impl<T: RecognitionEngine> RecognitionEngine for std::sync::Arc<std::sync::Mutex<T>> {
    fn is_available(&self) -> bool {
        self.lock().expect("engine lock poisoned").is_available()
    }

    fn start(&mut self) -> Result<(), StartError> {
        self.lock().expect("engine lock poisoned").start()
    }

    fn stop(&mut self) -> Result<(), StopError> {
        self.lock().expect("engine lock poisoned").stop()
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        self.lock().expect("engine lock poisoned").try_event()
    }
}

/// Control requests surfaced to the platform glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    Start,
    Stop,
}

/// Channel-backed engine for embedding.
///
/// The platform glue holds a `BridgeHandle` and forwards its native
/// callbacks into it; the engine side drains them through `try_event`.
/// Start/stop requests flow the other way on the command channel.
pub struct RecognizerBridge {
    events: Receiver<EngineEvent>,
    commands: Sender<BridgeCommand>,
    available: bool,
    started: bool,
}

/// The platform-facing side of a `RecognizerBridge`.
#[derive(Clone)]
pub struct BridgeHandle {
    events: Sender<EngineEvent>,
    commands: Receiver<BridgeCommand>,
}

impl RecognizerBridge {
    /// Create a connected bridge/handle pair.
    pub fn new() -> (Self, BridgeHandle) {
        let (event_tx, event_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();
        (
            Self {
                events: event_rx,
                commands: command_tx,
                available: true,
                started: false,
            },
            BridgeHandle {
                events: event_tx,
                commands: command_rx,
            },
        )
    }

    /// Mark the bridge as backed by no real capability.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

impl RecognitionEngine for RecognizerBridge {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self) -> Result<(), StartError> {
        if self.started {
            return Err(StartError::AlreadyStarted);
        }
        self.commands
            .send(BridgeCommand::Start)
            .map_err(|_| StartError::Failed("platform side disconnected".to_string()))?;
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), StopError> {
        if !self.started {
            return Err(StopError::NotStarted);
        }
        self.started = false;
        // A disconnected platform side already stopped.
        let _ = self.commands.send(BridgeCommand::Stop);
        Ok(())
    }

    fn try_event(&mut self) -> Option<EngineEvent> {
        match self.events.try_recv() {
            Ok(event) => {
                if matches!(event, EngineEvent::End | EngineEvent::Error { .. }) {
                    self.started = false;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl BridgeHandle {
    /// Forward a platform result callback.
    pub fn result(&self, text: &str, is_final: bool) {
        let _ = self.events.send(EngineEvent::Result(TranscriptFragment {
            text: text.to_string(),
            is_final,
        }));
    }

    /// Forward a platform end callback.
    pub fn ended(&self) {
        let _ = self.events.send(EngineEvent::End);
    }

    /// Forward a platform error callback with its raw code.
    pub fn error(&self, raw: &str) {
        let _ = self.events.send(EngineEvent::Error {
            raw: raw.to_string(),
        });
    }

    /// Next pending start/stop request, non-blocking.
    pub fn try_command(&self) -> Option<BridgeCommand> {
        self.commands.try_recv().ok()
    }
}
