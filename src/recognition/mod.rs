//! Continuous speech recognition: the engine seam, error classification,
//! and the lifecycle manager that wraps one session with auto-restart.

pub mod engine;
pub mod error;
pub mod manager;

pub use engine::{
    BridgeHandle, EngineEvent, MockRecognizer, NullRecognizer, RecognitionEngine,
    RecognizerBridge, StartError, StopError, TranscriptFragment,
};
pub use error::{RecognitionError, RecognitionErrorKind};
pub use manager::{ErrorDisposition, RecognitionHandler, RecognitionManager, SessionState, StartOutcome};
