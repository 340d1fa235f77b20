//! Speech output: the synthesis engine seam and the single-flight
//! feedback channel every consumer must route through.

pub mod feedback;
pub mod synthesizer;

pub use feedback::FeedbackChannel;
pub use synthesizer::{MockSynthesizer, NullSynthesizer, SynthEvent, Synthesizer, Utterance};
