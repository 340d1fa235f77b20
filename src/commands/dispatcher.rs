//! The voice-command dispatcher.
//!
//! Matching is first-match-wins over the table in definition order: the
//! first entry whose trigger is contained in the transcript, or that
//! contains the transcript, fires and scanning stops. There is no
//! longest-match tie-break. Unmatched transcripts do nothing at all.
//!
//! Dispatch never awaits an action. Delayed and async work (navigation,
//! sign-out) is spawned onto the ambient Tokio runtime, so `dispatch` must
//! be called from within one. A spawned action that fails is reported and
//! the dispatch loop is unaffected.

use crate::commands::context::{Navigator, PageText, RoleLookup, SessionGate};
use crate::commands::table::{CommandAction, CommandEntry, Role, effective_table};
use crate::defaults;
use crate::error::Reporter;
use crate::prefs::{ContrastLevel, PrefsPatch, PrefsStore};
use crate::speech::FeedbackChannel;
use std::sync::Arc;
use std::time::Duration;

/// Everything an action can touch.
pub struct DispatchContext {
    pub prefs: Arc<PrefsStore>,
    pub feedback: Arc<FeedbackChannel>,
    pub navigator: Arc<dyn Navigator>,
    pub session: Arc<dyn SessionGate>,
    pub page: Arc<dyn PageText>,
    pub reporter: Arc<dyn Reporter>,
    /// Pause between speaking a confirmation and navigating.
    pub nav_delay: Duration,
}

impl DispatchContext {
    pub fn new(
        prefs: Arc<PrefsStore>,
        feedback: Arc<FeedbackChannel>,
        navigator: Arc<dyn Navigator>,
        session: Arc<dyn SessionGate>,
        page: Arc<dyn PageText>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            prefs,
            feedback,
            navigator,
            session,
            page,
            reporter,
            nav_delay: Duration::from_millis(defaults::NAV_DELAY_MS),
        }
    }

    pub fn with_nav_delay(mut self, nav_delay: Duration) -> Self {
        self.nav_delay = nav_delay;
        self
    }
}

pub struct CommandDispatcher {
    entries: Vec<CommandEntry>,
    role: Role,
    ctx: DispatchContext,
}

impl CommandDispatcher {
    /// Build the dispatcher for the current session.
    ///
    /// The role is looked up exactly once here and cached for the
    /// dispatcher's lifetime; a role change mid-session is not observed.
    pub async fn new(role_lookup: &dyn RoleLookup, ctx: DispatchContext) -> Self {
        let role = role_lookup.current_role().await;
        Self {
            entries: effective_table(role),
            role,
            ctx,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Match a recognized transcript against the table and fire the first
    /// matching action. Returns the matched trigger, if any.
    pub fn dispatch(&self, transcript: &str) -> Option<&'static str> {
        let normalized = transcript.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        for entry in &self.entries {
            if normalized.contains(entry.trigger) || entry.trigger.contains(normalized.as_str()) {
                self.run(&entry.action);
                return Some(entry.trigger);
            }
        }
        None
    }

    fn run(&self, action: &CommandAction) {
        match action {
            CommandAction::Patch { patch, confirm } => {
                self.ctx.prefs.patch(patch.clone());
                self.ctx.feedback.speak(confirm);
            }
            CommandAction::AdjustFontScale { delta, confirm } => {
                let current = self.ctx.prefs.get().font_scale;
                self.ctx
                    .prefs
                    .patch(PrefsPatch::font_scale(current + delta));
                self.ctx.feedback.speak(confirm);
            }
            CommandAction::CycleContrast => {
                let next = self.ctx.prefs.get().contrast_level.next();
                self.ctx.prefs.patch(PrefsPatch {
                    contrast_level: Some(next),
                    ..Default::default()
                });
                self.ctx
                    .feedback
                    .speak(&format!("Contraste {}", contrast_label(next)));
            }
            CommandAction::Navigate { path, confirm } => {
                self.ctx.feedback.speak(confirm);
                let navigator = self.ctx.navigator.clone();
                let delay = self.ctx.nav_delay;
                let path = *path;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.go_to(path);
                });
            }
            CommandAction::SignOut { confirm } => {
                self.ctx.feedback.speak(confirm);
                let session = self.ctx.session.clone();
                let navigator = self.ctx.navigator.clone();
                let reporter = self.ctx.reporter.clone();
                let delay = self.ctx.nav_delay;
                tokio::spawn(async move {
                    match session.sign_out().await {
                        Ok(()) => {
                            tokio::time::sleep(delay).await;
                            navigator.go_to("/");
                        }
                        Err(e) => reporter.report("dispatch", &format!("sign-out failed: {}", e)),
                    }
                });
            }
            CommandAction::ReadPage => {
                let text = self.ctx.page.visible_text();
                if !text.trim().is_empty() {
                    self.ctx.feedback.speak(&text);
                }
            }
            CommandAction::StopSpeech => {
                self.ctx.feedback.stop();
            }
        }
    }
}

fn contrast_label(level: ContrastLevel) -> &'static str {
    match level {
        ContrastLevel::Soft => "suave",
        ContrastLevel::Medium => "medio",
        ContrastLevel::High => "alto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::{
        FixedRoleLookup, MockSessionGate, RecordingNavigator, StaticPage,
    };
    use crate::error::CollectingReporter;
    use crate::prefs::{MemoryStorage, RootStyle};
    use crate::speech::synthesizer::MockSynthesizer;
    use std::sync::Mutex;

    struct Harness {
        dispatcher: CommandDispatcher,
        prefs: Arc<PrefsStore>,
        synth: Arc<Mutex<MockSynthesizer>>,
        navigator: Arc<RecordingNavigator>,
        gate: Arc<MockSessionGate>,
        reporter: Arc<CollectingReporter>,
    }

    async fn harness(role: Role) -> Harness {
        harness_with_gate(role, MockSessionGate::new()).await
    }

    async fn harness_with_gate(role: Role, gate: MockSessionGate) -> Harness {
        let prefs = Arc::new(PrefsStore::new(
            Box::new(MemoryStorage::new()),
            Box::new(RootStyle::new()),
            Arc::new(CollectingReporter::new()),
        ));
        prefs.hydrate();

        let synth = Arc::new(Mutex::new(MockSynthesizer::new()));
        let feedback = Arc::new(FeedbackChannel::new(Box::new(synth.clone()), prefs.clone()));
        let navigator = Arc::new(RecordingNavigator::new());
        let gate = Arc::new(gate);
        let reporter = Arc::new(CollectingReporter::new());

        let ctx = DispatchContext::new(
            prefs.clone(),
            feedback,
            navigator.clone(),
            gate.clone(),
            Arc::new(StaticPage::new("Bolsa de trabajo. Tres ofertas nuevas.")),
            reporter.clone(),
        )
        .with_nav_delay(Duration::from_millis(5));

        let dispatcher = CommandDispatcher::new(&FixedRoleLookup(role), ctx).await;

        Harness {
            dispatcher,
            prefs,
            synth,
            navigator,
            gate,
            reporter,
        }
    }

    fn spoken(h: &Harness) -> Vec<String> {
        h.synth.lock().unwrap().spoken()
    }

    #[tokio::test]
    async fn test_role_is_queried_once_at_construction() {
        let h = harness(Role::Admin).await;
        assert_eq!(h.dispatcher.role(), Role::Admin);
        assert!(h
            .dispatcher
            .entries()
            .iter()
            .any(|e| e.trigger == "panel de administración"));
    }

    #[tokio::test]
    async fn test_patch_command_patches_and_confirms() {
        let h = harness(Role::Candidate).await;

        let matched = h.dispatcher.dispatch("Activar alto contraste");
        assert_eq!(matched, Some("activar alto contraste"));
        assert!(h.prefs.get().high_contrast);
        assert_eq!(spoken(&h), vec!["Alto contraste activado"]);
    }

    #[tokio::test]
    async fn test_first_match_wins_over_more_specific_trigger() {
        // The table registers "activar alto contraste" before "contraste".
        // A transcript containing both must fire the first registered
        // entry, never the broader one.
        let h = harness(Role::Candidate).await;

        let matched = h.dispatcher.dispatch("quiero activar alto contraste ahora");

        assert_eq!(matched, Some("activar alto contraste"));
        let prefs = h.prefs.get();
        assert!(prefs.high_contrast, "the patch action must have fired");
        assert_eq!(
            prefs.contrast_level,
            ContrastLevel::Medium,
            "the contrast-cycle action must not have fired"
        );
    }

    #[tokio::test]
    async fn test_bare_transcript_matches_by_reverse_inclusion() {
        // "contraste" is contained in the trigger "activar alto contraste",
        // which is registered first, so the first entry wins here too.
        let h = harness(Role::Candidate).await;
        let matched = h.dispatcher.dispatch("contraste");
        assert_eq!(matched, Some("activar alto contraste"));
    }

    #[tokio::test]
    async fn test_unmatched_transcript_is_silent() {
        let h = harness(Role::Candidate).await;
        let matched = h.dispatcher.dispatch("algo completamente distinto");
        assert_eq!(matched, None);
        assert!(spoken(&h).is_empty());
        assert!(h.navigator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_ignored() {
        let h = harness(Role::Candidate).await;
        assert_eq!(h.dispatcher.dispatch("   "), None);
    }

    #[tokio::test]
    async fn test_transcript_is_lowercased_and_trimmed() {
        let h = harness(Role::Candidate).await;
        let matched = h.dispatcher.dispatch("  AUMENTAR TEXTO  ");
        assert_eq!(matched, Some("aumentar texto"));
        assert!(h.prefs.get().font_scale > 1.0);
    }

    #[tokio::test]
    async fn test_font_scale_adjustment_clamps_at_bounds() {
        let h = harness(Role::Candidate).await;
        for _ in 0..20 {
            h.dispatcher.dispatch("aumentar texto");
        }
        assert_eq!(h.prefs.get().font_scale, 1.6);
    }

    #[tokio::test]
    async fn test_cycle_contrast_speaks_new_level() {
        let h = harness(Role::Candidate).await;
        // A sentence without "activar"/"desactivar" falls through to the
        // bare "contraste" entry.
        let matched = h.dispatcher.dispatch("sube el contraste un poco");
        assert_eq!(matched, Some("contraste"));
        assert_eq!(h.prefs.get().contrast_level, ContrastLevel::High);
        assert_eq!(spoken(&h), vec!["Contraste alto"]);
    }

    #[tokio::test]
    async fn test_navigation_speaks_then_navigates_after_delay() {
        let h = harness(Role::Candidate).await;

        let matched = h.dispatcher.dispatch("quiero buscar empleo");
        assert_eq!(matched, Some("buscar empleo"));

        // Spoken immediately, not navigated yet.
        assert_eq!(spoken(&h), vec!["Abriendo búsqueda de empleo"]);
        assert!(h.navigator.paths().is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.navigator.paths(), vec!["/empleos"]);
    }

    #[tokio::test]
    async fn test_sign_out_awaits_gate_then_navigates_home() {
        let h = harness(Role::Candidate).await;

        h.dispatcher.dispatch("cerrar sesión");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(h.gate.calls(), 1);
        assert_eq!(h.navigator.paths(), vec!["/"]);
        assert_eq!(spoken(&h), vec!["Cerrando sesión"]);
    }

    #[tokio::test]
    async fn test_failed_sign_out_is_reported_and_does_not_navigate() {
        let h = harness_with_gate(Role::Candidate, MockSessionGate::failing()).await;

        h.dispatcher.dispatch("cerrar sesión");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(h.navigator.paths().is_empty());
        let reports = h.reporter.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].1.contains("sign-out failed"));
    }

    #[tokio::test]
    async fn test_read_page_speaks_visible_text() {
        let h = harness(Role::Candidate).await;
        h.dispatcher.dispatch("leer página");
        assert_eq!(spoken(&h), vec!["Bolsa de trabajo. Tres ofertas nuevas."]);
    }

    #[tokio::test]
    async fn test_stop_speech_cancels_channel() {
        let h = harness(Role::Candidate).await;
        h.dispatcher.dispatch("leer página");
        h.dispatcher.dispatch("silencio");
        assert!(h.synth.lock().unwrap().active().is_none());
    }

    #[tokio::test]
    async fn test_role_scoped_commands_unavailable_to_other_roles() {
        let h = harness(Role::Candidate).await;
        assert_eq!(h.dispatcher.dispatch("publicar oferta"), None);

        let h = harness(Role::Company).await;
        assert_eq!(
            h.dispatcher.dispatch("publicar oferta"),
            Some("publicar oferta")
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.navigator.paths(), vec!["/empresa/ofertas/nueva"]);
    }
}
