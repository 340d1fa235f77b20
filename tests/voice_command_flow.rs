//! End-to-end voice control flow: recognized speech in, preference
//! changes, spoken feedback, and navigation out.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use voznav::commands::{FixedRoleLookup, MockSessionGate, RecordingNavigator, Role, StaticPage};
use voznav::config::EngineConfig;
use voznav::engine::{AccessibilityEngine, EnginePorts, VOICE_TOGGLE_CHORD};
use voznav::error::CollectingReporter;
use voznav::hover::HoverEvent;
use voznav::prefs::{MemoryStorage, PrefsPatch, RootStyle};
use voznav::recognition::engine::{EngineEvent, MockRecognizer, TranscriptFragment};
use voznav::speech::synthesizer::MockSynthesizer;

struct Fixture {
    engine: AccessibilityEngine,
    synth: Arc<Mutex<MockSynthesizer>>,
    voice: Arc<Mutex<MockRecognizer>>,
    navigator: Arc<RecordingNavigator>,
    gate: Arc<MockSessionGate>,
}

/// Build an engine and load its preference record, the normal startup
/// sequence.
async fn fixture(role: Role, stored: Option<&str>) -> Fixture {
    let f = fixture_unhydrated(role, stored).await;
    f.engine.hydrate();
    f
}

/// Build an engine without loading the record, for the hydration-race
/// test.
async fn fixture_unhydrated(role: Role, stored: Option<&str>) -> Fixture {
    let synth = Arc::new(Mutex::new(MockSynthesizer::new()));
    let voice = Arc::new(Mutex::new(MockRecognizer::new()));
    let navigator = Arc::new(RecordingNavigator::new());
    let gate = Arc::new(MockSessionGate::new());

    let storage = match stored {
        Some(json) => MemoryStorage::with_value(json),
        None => MemoryStorage::new(),
    };

    let ports = EnginePorts {
        synthesizer: Box::new(synth.clone()),
        voice_engine: Box::new(voice.clone()),
        caption_engine: Box::new(MockRecognizer::new()),
        overlay_engine: Box::new(MockRecognizer::new()),
        storage: Box::new(storage),
        style: Box::new(RootStyle::new()),
        navigator: navigator.clone(),
        session: gate.clone(),
        page: Arc::new(StaticPage::new("Portal de empleo. Dos ofertas destacadas.")),
        reporter: Arc::new(CollectingReporter::new()),
    };

    let mut config = EngineConfig::default();
    config.timing.nav_delay_ms = 5;

    let engine = AccessibilityEngine::new(ports, config, &FixedRoleLookup(role)).await;

    Fixture {
        engine,
        synth,
        voice,
        navigator,
        gate,
    }
}

fn speak_final(fixture: &Fixture, transcript: &str) {
    fixture
        .voice
        .lock()
        .unwrap()
        .push(EngineEvent::Result(TranscriptFragment::final_(transcript)));
}

fn spoken(fixture: &Fixture) -> Vec<String> {
    fixture.synth.lock().unwrap().spoken()
}

#[tokio::test]
async fn voice_command_patches_preferences_and_confirms() {
    let mut f = fixture(Role::Candidate, None).await;

    assert!(f.engine.handle_key(VOICE_TOGGLE_CHORD));
    speak_final(&f, "quiero activar alto contraste ahora");
    f.engine.tick(Instant::now());

    assert!(f.engine.prefs().get().high_contrast);
    assert_eq!(
        spoken(&f),
        vec!["Control por voz activado", "Alto contraste activado"]
    );
}

#[tokio::test]
async fn voice_navigation_speaks_then_navigates() {
    let mut f = fixture(Role::Candidate, None).await;

    f.engine.toggle_voice_control();
    speak_final(&f, "buscar empleo por favor");
    f.engine.tick(Instant::now());

    assert!(spoken(&f).contains(&"Abriendo búsqueda de empleo".to_string()));
    assert!(f.navigator.paths().is_empty());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(f.navigator.paths(), vec!["/empleos"]);
}

#[tokio::test]
async fn sign_out_flow_awaits_gate_before_navigating_home() {
    let mut f = fixture(Role::Company, None).await;

    f.engine.toggle_voice_control();
    speak_final(&f, "cerrar sesión");
    f.engine.tick(Instant::now());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(f.gate.calls(), 1);
    assert_eq!(f.navigator.paths(), vec!["/"]);
}

#[tokio::test]
async fn read_page_command_reads_visible_text() {
    let mut f = fixture(Role::Candidate, None).await;

    f.engine.toggle_voice_control();
    speak_final(&f, "leer página");
    f.engine.tick(Instant::now());

    assert!(spoken(&f).contains(&"Portal de empleo. Dos ofertas destacadas.".to_string()));
}

#[tokio::test]
async fn stored_preferences_survive_and_pre_load_patches_do_not() {
    let f = fixture(Role::Candidate, Some(r#"{"fontScale": 1.4}"#)).await;

    // fixture() already hydrated; the stored scale is in effect.
    assert_eq!(f.engine.prefs().get().font_scale, 1.4);

    // A fresh engine where a patch races ahead of the load.
    let f2 = fixture_unhydrated(Role::Candidate, Some(r#"{"fontScale": 1.4}"#)).await;
    let prefs = f2.engine.prefs();
    prefs.patch(PrefsPatch::high_contrast(true));
    prefs.hydrate();
    assert!(
        !prefs.get().high_contrast,
        "load must replace the record wholesale"
    );
}

#[tokio::test]
async fn role_determines_available_commands() {
    let mut candidate = fixture(Role::Candidate, None).await;
    candidate.engine.toggle_voice_control();
    speak_final(&candidate, "publicar oferta");
    candidate.engine.tick(Instant::now());
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(candidate.navigator.paths().is_empty());

    let mut company = fixture(Role::Company, None).await;
    company.engine.toggle_voice_control();
    speak_final(&company, "publicar oferta");
    company.engine.tick(Instant::now());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(company.navigator.paths(), vec!["/empresa/ofertas/nueva"]);
}

#[tokio::test]
async fn hover_dedupe_window_through_the_engine() {
    let mut f = fixture(Role::Candidate, None).await;
    f.engine.prefs().patch(PrefsPatch {
        hover_to_speak: Some(true),
        ..Default::default()
    });

    let button = HoverEvent::from_label("Enviar candidatura");
    let t0 = Instant::now();

    assert!(f.engine.pointer_enter_at(&button, t0));
    assert!(!f.engine.pointer_enter_at(&button, t0 + Duration::from_millis(400)));
    assert!(f.engine.pointer_enter_at(&button, t0 + Duration::from_millis(1000)));

    assert_eq!(
        spoken(&f),
        vec!["Enviar candidatura", "Enviar candidatura"]
    );
}

#[tokio::test]
async fn unmatched_speech_changes_nothing() {
    let mut f = fixture(Role::Candidate, None).await;
    f.engine.toggle_voice_control();
    let before = f.engine.prefs().get();

    speak_final(&f, "el tiempo está soleado hoy");
    f.engine.tick(Instant::now());
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(f.engine.prefs().get(), before);
    assert_eq!(spoken(&f), vec!["Control por voz activado"]);
    assert!(f.navigator.paths().is_empty());
}
