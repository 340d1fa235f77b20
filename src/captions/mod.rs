//! Live captioning: the video-bound caption pipeline, the standalone
//! transcription overlay, and the speech diagnostics routine.

pub mod diagnostics;
pub mod overlay;
pub mod video;

pub use diagnostics::{
    CaptureProbe, DiagnosticsPorts, EnvironmentFacts, FixedPermission, MicTestOutcome,
    MockCaptureProbe, PermissionProbe, PermissionState, SpeechDiagnostics, StaticEnvironment,
};
pub use overlay::TranscriptionOverlay;
pub use video::VideoCaptionPipeline;
