//! Captions bound to video playback.
//!
//! Recognition runs exactly while captions are enabled, the video is
//! playing, and it is not paused; the session starts and stops in lockstep
//! with those three conditions. Caption history is depth one: each final
//! fragment replaces the settled line outright, each interim fragment
//! replaces the in-progress line. Renderers show the settled line at
//! reduced emphasis and the in-progress line at full emphasis.

use crate::recognition::engine::TranscriptFragment;
use crate::recognition::manager::{
    ErrorDisposition, RecognitionHandler, RecognitionManager,
};
use crate::recognition::error::RecognitionError;
use std::time::Instant;

/// The two caption lines plus the last user-facing error.
#[derive(Debug, Default)]
struct CaptionBuffer {
    final_line: String,
    interim_line: String,
    last_error: Option<&'static str>,
}

impl CaptionBuffer {
    fn clear_lines(&mut self) {
        self.final_line.clear();
        self.interim_line.clear();
    }
}

impl RecognitionHandler for CaptionBuffer {
    fn on_fragment(&mut self, fragment: &TranscriptFragment) {
        if fragment.is_final {
            self.final_line = fragment.text.clone();
            self.interim_line.clear();
        } else {
            self.interim_line = fragment.text.clone();
        }
    }

    fn on_error(&mut self, error: &RecognitionError) -> ErrorDisposition {
        self.last_error = Some(error.friendly());
        // Captions give up on real errors; playback continues without them.
        ErrorDisposition::Clear
    }
}

pub struct VideoCaptionPipeline {
    manager: RecognitionManager,
    buffer: CaptionBuffer,
    captions_enabled: bool,
    playing: bool,
    paused: bool,
}

impl VideoCaptionPipeline {
    pub fn new(manager: RecognitionManager) -> Self {
        Self {
            manager,
            buffer: CaptionBuffer::default(),
            captions_enabled: false,
            playing: false,
            paused: false,
        }
    }

    pub fn set_captions_enabled(&mut self, enabled: bool) {
        self.captions_enabled = enabled;
        self.sync();
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.sync();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.sync();
    }

    fn desired(&self) -> bool {
        self.captions_enabled && self.playing && !self.paused
    }

    /// Bring the session in line with the three playback conditions.
    fn sync(&mut self) {
        if self.desired() {
            if !self.manager.is_listening() {
                self.manager.set_continuation(true);
                self.manager.start();
            }
        } else {
            self.manager.set_continuation(false);
            self.manager.stop();
            self.buffer.clear_lines();
        }
    }

    /// Drain session events and keep the buffers consistent.
    pub fn tick(&mut self, now: Instant) {
        self.manager.pump(now, &mut self.buffer);

        // An error cleared the continuation gate: the session is over for
        // good, so the lines go too.
        if !self.desired() || (!self.manager.continuation() && !self.manager.is_listening()) {
            self.buffer.clear_lines();
        }
    }

    /// The settled caption line (reduced emphasis).
    pub fn final_line(&self) -> &str {
        &self.buffer.final_line
    }

    /// The still-changing caption line (full emphasis).
    pub fn interim_line(&self) -> &str {
        &self.buffer.interim_line
    }

    pub fn last_error_message(&self) -> Option<&'static str> {
        self.buffer.last_error
    }

    pub fn is_listening(&self) -> bool {
        self.manager.is_listening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::engine::{EngineEvent, MockRecognizer, RecognitionEngine};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn pipeline() -> (Arc<Mutex<MockRecognizer>>, VideoCaptionPipeline) {
        let engine = Arc::new(Mutex::new(MockRecognizer::new()));
        let manager = RecognitionManager::with_restart_delay(
            Box::new(engine.clone()),
            Duration::from_millis(500),
        );
        (engine, VideoCaptionPipeline::new(manager))
    }

    fn running_pipeline() -> (Arc<Mutex<MockRecognizer>>, VideoCaptionPipeline) {
        let (engine, mut pipeline) = pipeline();
        pipeline.set_captions_enabled(true);
        pipeline.set_playing(true);
        assert!(pipeline.is_listening());
        (engine, pipeline)
    }

    #[test]
    fn test_recognition_requires_all_three_conditions() {
        let (engine, mut pipeline) = pipeline();

        pipeline.set_captions_enabled(true);
        assert!(!pipeline.is_listening());

        pipeline.set_playing(true);
        assert!(pipeline.is_listening());

        pipeline.set_paused(true);
        assert!(!pipeline.is_listening());
        assert_eq!(engine.lock().unwrap().stop_count(), 1);

        pipeline.set_paused(false);
        assert!(pipeline.is_listening());
    }

    #[test]
    fn test_interim_then_final_replacement() {
        let (engine, mut pipeline) = running_pipeline();

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::interim("hola")));
        pipeline.tick(Instant::now());
        assert_eq!(pipeline.interim_line(), "hola");
        assert_eq!(pipeline.final_line(), "");

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::final_("hola mundo")));
        pipeline.tick(Instant::now());
        assert_eq!(pipeline.final_line(), "hola mundo");
        assert_eq!(pipeline.interim_line(), "");
    }

    #[test]
    fn test_second_final_replaces_not_accumulates() {
        let (engine, mut pipeline) = running_pipeline();

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::final_("hola mundo")));
        pipeline.tick(Instant::now());

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::final_("adiós")));
        pipeline.tick(Instant::now());

        assert_eq!(pipeline.final_line(), "adiós");
    }

    #[test]
    fn test_buffers_cleared_on_stop() {
        let (engine, mut pipeline) = running_pipeline();

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::final_("hola mundo")));
        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::interim("adi")));
        pipeline.tick(Instant::now());

        pipeline.set_paused(true);
        assert_eq!(pipeline.final_line(), "");
        assert_eq!(pipeline.interim_line(), "");
    }

    #[test]
    fn test_error_clears_continuation_and_lines() {
        let (engine, mut pipeline) = running_pipeline();

        engine
            .lock()
            .unwrap()
            .push(EngineEvent::Result(TranscriptFragment::final_("hola")));
        pipeline.tick(Instant::now());

        {
            let mut engine = engine.lock().unwrap();
            engine.push(EngineEvent::Error {
                raw: "network".to_string(),
            });
            engine.stop().unwrap();
            engine.push(EngineEvent::End);
        }

        let t0 = Instant::now();
        pipeline.tick(t0);
        assert_eq!(pipeline.final_line(), "");
        assert_eq!(
            pipeline.last_error_message(),
            Some("Error de red en el reconocimiento de voz")
        );

        // No restart: the error disposition cleared the gate.
        pipeline.tick(t0 + Duration::from_millis(600));
        assert!(!pipeline.is_listening());
        assert_eq!(engine.lock().unwrap().start_count(), 1);
    }

    #[test]
    fn test_benign_error_keeps_captions_running() {
        let (engine, mut pipeline) = running_pipeline();

        {
            let mut engine = engine.lock().unwrap();
            engine.push(EngineEvent::Error {
                raw: "no-speech".to_string(),
            });
            engine.stop().unwrap();
            engine.push(EngineEvent::End);
        }

        let t0 = Instant::now();
        pipeline.tick(t0);
        pipeline.tick(t0 + Duration::from_millis(500));

        assert!(pipeline.is_listening());
        assert_eq!(engine.lock().unwrap().start_count(), 2);
    }

    #[test]
    fn test_toggle_while_stopped_is_idempotent() {
        let (engine, mut pipeline) = pipeline();
        pipeline.set_paused(true);
        pipeline.set_paused(true);
        pipeline.set_captions_enabled(false);
        assert!(!pipeline.is_listening());
        assert_eq!(engine.lock().unwrap().start_count(), 0);
    }
}
