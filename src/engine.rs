//! Composition root.
//!
//! `AccessibilityEngine` wires the preference store, feedback channel,
//! voice-command listener, hover reader, and both caption pipelines
//! together, and drives their timers through `tick`. The host embeds this
//! object once, feeds it key and pointer events, and calls `tick` from its
//! event loop.

use crate::captions::{CaptureProbe, MicTestOutcome, TranscriptionOverlay, VideoCaptionPipeline};
use crate::commands::{CommandDispatcher, DispatchContext, Navigator, PageText, RoleLookup, SessionGate};
use crate::config::EngineConfig;
use crate::error::Reporter;
use crate::hover::{HoverEvent, HoverReader};
use crate::prefs::{PrefsStorage, PrefsStore, StyleSink};
use crate::recognition::engine::{RecognitionEngine, TranscriptFragment};
use crate::recognition::error::RecognitionError;
use crate::recognition::manager::{
    ErrorDisposition, RecognitionHandler, RecognitionManager, StartOutcome,
};
use crate::speech::{FeedbackChannel, Synthesizer};
use std::sync::Arc;
use std::time::Instant;

/// A pressed key with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub key: char,
}

/// The fixed shortcut that toggles the voice-command listener.
pub const VOICE_TOGGLE_CHORD: KeyChord = KeyChord {
    alt: true,
    shift: true,
    ctrl: false,
    key: 'v',
};

/// Every external capability the engine consumes, behind its seam.
pub struct EnginePorts {
    pub synthesizer: Box<dyn Synthesizer>,
    pub voice_engine: Box<dyn RecognitionEngine>,
    pub caption_engine: Box<dyn RecognitionEngine>,
    pub overlay_engine: Box<dyn RecognitionEngine>,
    pub storage: Box<dyn PrefsStorage>,
    pub style: Box<dyn StyleSink>,
    pub navigator: Arc<dyn Navigator>,
    pub session: Arc<dyn SessionGate>,
    pub page: Arc<dyn PageText>,
    pub reporter: Arc<dyn Reporter>,
}

impl EnginePorts {
    /// Ports for a host with no platform speech at all: every speech
    /// feature silently disables itself.
    pub fn headless() -> Self {
        use crate::commands::{MockSessionGate, RecordingNavigator, StaticPage};
        use crate::error::StderrReporter;
        use crate::prefs::{MemoryStorage, RootStyle};
        use crate::recognition::engine::NullRecognizer;
        use crate::speech::NullSynthesizer;

        Self {
            synthesizer: Box::new(NullSynthesizer),
            voice_engine: Box::new(NullRecognizer),
            caption_engine: Box::new(NullRecognizer),
            overlay_engine: Box::new(NullRecognizer),
            storage: Box::new(MemoryStorage::new()),
            style: Box::new(RootStyle::new()),
            navigator: Arc::new(RecordingNavigator::new()),
            session: Arc::new(MockSessionGate::new()),
            page: Arc::new(StaticPage::new("")),
            reporter: Arc::new(StderrReporter),
        }
    }
}

/// Routes final voice-listener fragments into the dispatcher and speaks
/// friendly messages for real errors. The listener keeps its continuation
/// gate on error; the user toggle is the only thing that closes it.
struct VoiceControlSink<'a> {
    dispatcher: &'a CommandDispatcher,
    feedback: &'a FeedbackChannel,
    reporter: &'a dyn Reporter,
}

impl RecognitionHandler for VoiceControlSink<'_> {
    fn on_fragment(&mut self, fragment: &TranscriptFragment) {
        if fragment.is_final {
            self.dispatcher.dispatch(&fragment.text);
        }
    }

    fn on_error(&mut self, error: &RecognitionError) -> ErrorDisposition {
        self.feedback.speak(error.friendly());
        self.reporter.report("voice", &error.to_string());
        ErrorDisposition::Keep
    }
}

pub struct AccessibilityEngine {
    prefs: Arc<PrefsStore>,
    feedback: Arc<FeedbackChannel>,
    dispatcher: CommandDispatcher,
    voice: RecognitionManager,
    voice_active: bool,
    hover: HoverReader,
    video: VideoCaptionPipeline,
    overlay: TranscriptionOverlay,
    reporter: Arc<dyn Reporter>,
    seen_captions_enabled: bool,
    seen_live_enabled: bool,
}

impl AccessibilityEngine {
    pub async fn new(
        ports: EnginePorts,
        config: EngineConfig,
        role_lookup: &dyn RoleLookup,
    ) -> Self {
        let reporter = ports.reporter;
        let prefs = Arc::new(PrefsStore::new(ports.storage, ports.style, reporter.clone()));
        let feedback = Arc::new(FeedbackChannel::with_voice(
            ports.synthesizer,
            prefs.clone(),
            config.voice.clone(),
            config.timing.feedback_clear(),
        ));

        let ctx = DispatchContext::new(
            prefs.clone(),
            feedback.clone(),
            ports.navigator,
            ports.session,
            ports.page,
            reporter.clone(),
        )
        .with_nav_delay(config.timing.nav_delay());
        let dispatcher = CommandDispatcher::new(role_lookup, ctx).await;

        let restart_delay = config.timing.restart_delay();
        let voice = RecognitionManager::with_restart_delay(ports.voice_engine, restart_delay);
        let video = VideoCaptionPipeline::new(RecognitionManager::with_restart_delay(
            ports.caption_engine,
            restart_delay,
        ));
        let overlay = TranscriptionOverlay::new(RecognitionManager::with_restart_delay(
            ports.overlay_engine,
            restart_delay,
        ));

        let hover = HoverReader::with_dedupe_window(
            prefs.clone(),
            feedback.clone(),
            config.timing.hover_dedupe(),
        );

        Self {
            prefs,
            feedback,
            dispatcher,
            voice,
            voice_active: false,
            hover,
            video,
            overlay,
            reporter,
            seen_captions_enabled: false,
            seen_live_enabled: false,
        }
    }

    /// Load the persisted preference record.
    pub fn hydrate(&self) {
        self.prefs.hydrate();
    }

    pub fn prefs(&self) -> Arc<PrefsStore> {
        self.prefs.clone()
    }

    pub fn feedback(&self) -> Arc<FeedbackChannel> {
        self.feedback.clone()
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn captions(&self) -> &VideoCaptionPipeline {
        &self.video
    }

    pub fn overlay(&self) -> &TranscriptionOverlay {
        &self.overlay
    }

    /// Whether the voice-command listener is currently enabled.
    pub fn voice_active(&self) -> bool {
        self.voice_active
    }

    /// Handle a key press; returns true when the chord was consumed.
    pub fn handle_key(&mut self, chord: KeyChord) -> bool {
        if chord == VOICE_TOGGLE_CHORD {
            self.toggle_voice_control();
            true
        } else {
            false
        }
    }

    /// Toggle the voice-command listener, with spoken confirmation.
    pub fn toggle_voice_control(&mut self) {
        if self.voice_active {
            self.voice_active = false;
            self.voice.set_continuation(false);
            self.voice.stop();
            self.feedback.speak("Control por voz desactivado");
            return;
        }

        self.voice.set_continuation(true);
        match self.voice.start() {
            StartOutcome::Started => {
                self.voice_active = true;
                self.feedback.speak("Control por voz activado");
            }
            StartOutcome::Unsupported => {
                // Capability absent: the feature does not render.
                self.voice.set_continuation(false);
            }
            StartOutcome::Failed => {
                self.voice.set_continuation(false);
                self.reporter.report("voice", "recognition failed to start");
            }
        }
    }

    /// Forward a pointer-enter event to the hover reader.
    pub fn pointer_enter(&mut self, event: &HoverEvent) -> bool {
        self.hover.on_pointer_enter(event)
    }

    pub fn pointer_enter_at(&mut self, event: &HoverEvent, now: Instant) -> bool {
        self.hover.on_pointer_enter_at(event, now)
    }

    /// Playback state changes from the video player.
    pub fn set_media_playing(&mut self, playing: bool) {
        self.video.set_playing(playing);
    }

    pub fn set_media_paused(&mut self, paused: bool) {
        self.video.set_paused(paused);
    }

    /// Microphone self-test, surfaced by the transcription overlay UI.
    pub fn mic_self_test(&self, probe: &mut dyn CaptureProbe) -> MicTestOutcome {
        self.overlay.mic_self_test(probe)
    }

    /// Drive timers, event pumps, and preference-flag lockstep.
    pub fn tick(&mut self, now: Instant) {
        self.feedback.tick(now);

        // Preference flags are the only cancel signal; pick up changes
        // before pumping so a disable stops the session this tick.
        self.sync_preference_flags();

        let Self {
            voice,
            dispatcher,
            feedback,
            reporter,
            ..
        } = self;
        let mut sink = VoiceControlSink {
            dispatcher: &*dispatcher,
            feedback: feedback.as_ref(),
            reporter: reporter.as_ref(),
        };
        voice.pump(now, &mut sink);

        // A voice command may have flipped a flag just now; observe it in
        // the same tick before the pipelines run.
        self.sync_preference_flags();

        self.video.tick(now);
        self.overlay.tick(now);
    }

    fn sync_preference_flags(&mut self) {
        let prefs = self.prefs.get();
        if prefs.captions_enabled != self.seen_captions_enabled {
            self.seen_captions_enabled = prefs.captions_enabled;
            self.video.set_captions_enabled(prefs.captions_enabled);
        }
        if prefs.live_transcription_enabled != self.seen_live_enabled {
            self.seen_live_enabled = prefs.live_transcription_enabled;
            self.overlay.set_enabled(prefs.live_transcription_enabled);
        }
    }
}
