//! Speech diagnostics.
//!
//! A guided check of everything live transcription depends on: capability
//! presence, a short recognition probe, microphone permission, a capture
//! probe, and ambient platform facts. Results append to a bounded
//! in-memory log the user can clear.

use crate::defaults;
use crate::recognition::engine::{EngineEvent, RecognitionEngine, StartError};
use crate::recognition::error::RecognitionError;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of briefly requesting and releasing a capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MicTestOutcome {
    Ok,
    PermissionDenied,
    Failed(String),
}

/// Trait for microphone capture probing.
///
/// This trait allows swapping implementations (a platform capture binding
/// vs mock).
pub trait CaptureProbe: Send {
    /// Request a capture stream and release it immediately.
    fn request_and_release(&mut self) -> MicTestOutcome;
}

/// Microphone permission state, where the platform exposes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    /// The platform offers no permission query.
    Unsupported,
}

/// Trait for querying microphone permission.
pub trait PermissionProbe: Send {
    fn microphone_permission(&self) -> PermissionState;
}

/// Ambient platform facts recorded alongside the probe results.
pub trait EnvironmentFacts: Send {
    fn secure_context(&self) -> bool;
    /// `None` when the platform cannot tell.
    fn online(&self) -> Option<bool>;
    fn user_agent(&self) -> String;
}

/// Everything the diagnostics routine needs to reach.
pub struct DiagnosticsPorts<'a> {
    pub engine: &'a mut dyn RecognitionEngine,
    pub capture: &'a mut dyn CaptureProbe,
    pub permission: &'a dyn PermissionProbe,
    pub env: &'a dyn EnvironmentFacts,
}

pub struct SpeechDiagnostics {
    lines: VecDeque<String>,
    cap: usize,
    probe_grace: Duration,
    probe_timeout: Duration,
}

impl Default for SpeechDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechDiagnostics {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            cap: defaults::DIAG_LOG_CAP,
            probe_grace: Duration::from_millis(defaults::PROBE_GRACE_MS),
            probe_timeout: Duration::from_millis(defaults::PROBE_TIMEOUT_MS),
        }
    }

    /// Override the probe windows, mainly for tests and the CLI flags.
    pub fn with_probe_timing(mut self, grace: Duration, timeout: Duration) -> Self {
        self.probe_grace = grace;
        self.probe_timeout = timeout;
        self
    }

    /// Run every check in order, appending result lines.
    pub fn run(&mut self, ports: &mut DiagnosticsPorts<'_>) {
        let available = ports.engine.is_available();
        self.log(&format!(
            "reconocimiento de voz: {}",
            if available { "disponible" } else { "no disponible" }
        ));

        if available {
            self.probe_recognition(ports.engine);
        }

        let permission = match ports.permission.microphone_permission() {
            PermissionState::Granted => "concedido",
            PermissionState::Denied => "denegado",
            PermissionState::Prompt => "pendiente de solicitud",
            PermissionState::Unsupported => "no consultable",
        };
        self.log(&format!("permiso de micrófono: {}", permission));

        match ports.capture.request_and_release() {
            MicTestOutcome::Ok => self.log("micrófono: accesible"),
            MicTestOutcome::PermissionDenied => self.log("micrófono: permiso denegado"),
            MicTestOutcome::Failed(reason) => {
                self.log(&format!("micrófono: fallo ({})", reason))
            }
        }

        self.log(&format!(
            "contexto seguro: {}",
            if ports.env.secure_context() { "sí" } else { "no" }
        ));
        let online = match ports.env.online() {
            Some(true) => "en línea",
            Some(false) => "sin conexión",
            None => "desconocida",
        };
        self.log(&format!("red: {}", online));
        self.log(&format!("agente: {}", ports.env.user_agent()));
    }

    /// Start recognition briefly to surface any immediate error, then stop.
    ///
    /// Waits up to the grace window for an error event; the whole probe is
    /// additionally capped by the hard timeout.
    fn probe_recognition(&mut self, engine: &mut dyn RecognitionEngine) {
        match engine.start() {
            Ok(()) | Err(StartError::AlreadyStarted) => {}
            Err(StartError::Failed(reason)) => {
                self.log(&format!("prueba de reconocimiento: no arrancó ({})", reason));
                return;
            }
        }

        let started = Instant::now();
        let deadline = started + self.probe_grace.min(self.probe_timeout);
        let mut immediate_error: Option<RecognitionError> = None;

        loop {
            while let Some(event) = engine.try_event() {
                if let EngineEvent::Error { raw } = event {
                    immediate_error = Some(RecognitionError::classify(&raw));
                    break;
                }
            }
            if immediate_error.is_some() || Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(25));
        }

        let _ = engine.stop();

        match immediate_error {
            Some(error) => self.log(&format!(
                "prueba de reconocimiento: {} ({})",
                error.friendly(),
                error.raw
            )),
            None => self.log("prueba de reconocimiento: sin errores inmediatos"),
        }
    }

    /// Append a timestamped line, dropping the oldest past the cap.
    pub fn log(&mut self, message: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.lines.push_back(format!("[{}] {}", stamp, message));
        while self.lines.len() > self.cap {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Capture probe with a fixed outcome, for tests and capability-less hosts.
pub struct MockCaptureProbe {
    outcome: MicTestOutcome,
    calls: u32,
}

impl MockCaptureProbe {
    pub fn granting() -> Self {
        Self {
            outcome: MicTestOutcome::Ok,
            calls: 0,
        }
    }

    pub fn denying() -> Self {
        Self {
            outcome: MicTestOutcome::PermissionDenied,
            calls: 0,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: MicTestOutcome::Failed(reason.to_string()),
            calls: 0,
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl CaptureProbe for MockCaptureProbe {
    fn request_and_release(&mut self) -> MicTestOutcome {
        self.calls += 1;
        self.outcome.clone()
    }
}

/// Permission probe with a fixed answer.
pub struct FixedPermission(pub PermissionState);

impl PermissionProbe for FixedPermission {
    fn microphone_permission(&self) -> PermissionState {
        self.0
    }
}

/// Environment facts with fixed answers.
pub struct StaticEnvironment {
    pub secure: bool,
    pub online: Option<bool>,
    pub user_agent: String,
}

impl EnvironmentFacts for StaticEnvironment {
    fn secure_context(&self) -> bool {
        self.secure
    }

    fn online(&self) -> Option<bool> {
        self.online
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }
}
