use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use voznav::captions::{
    CaptureProbe, DiagnosticsPorts, EnvironmentFacts, FixedPermission, MicTestOutcome,
    PermissionState, SpeechDiagnostics,
};
use voznav::cli::{Cli, Commands, PrefsAction};
use voznav::commands::{CommandAction, Role, effective_table};
use voznav::config::EngineConfig;
use voznav::error::StderrReporter;
use voznav::prefs::{FileStorage, PrefsStorage, PrefsStore, RootStyle};
use voznav::recognition::engine::NullRecognizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Diagnose { grace, timeout } => {
            run_diagnose(grace, timeout, cli.quiet);
        }
        Commands::Prefs { action } => {
            handle_prefs_command(&config, action)?;
        }
        Commands::Commands { role } => {
            list_commands(role.into());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default(&EngineConfig::default_path())?,
    };
    Ok(config.with_env_overrides())
}

/// Capture probe for a host without any audio capture binding.
struct NoCapture;

impl CaptureProbe for NoCapture {
    fn request_and_release(&mut self) -> MicTestOutcome {
        MicTestOutcome::Failed("sin captura de audio en esta plataforma".to_string())
    }
}

/// Environment facts taken from the running process.
struct HostEnvironment;

impl EnvironmentFacts for HostEnvironment {
    fn secure_context(&self) -> bool {
        // A local process has no transport to be insecure over.
        true
    }

    fn online(&self) -> Option<bool> {
        None
    }

    fn user_agent(&self) -> String {
        format!("voznav/{} ({})", voznav::version_string(), std::env::consts::OS)
    }
}

fn run_diagnose(grace: Duration, timeout: Duration, quiet: bool) {
    if !quiet {
        eprintln!("Comprobando voz y micrófono...\n");
    }

    let mut diagnostics = SpeechDiagnostics::new().with_probe_timing(grace, timeout);
    let mut engine = NullRecognizer;
    let mut capture = NoCapture;
    let permission = FixedPermission(PermissionState::Unsupported);
    let env = HostEnvironment;

    let mut ports = DiagnosticsPorts {
        engine: &mut engine,
        capture: &mut capture,
        permission: &permission,
        env: &env,
    };
    diagnostics.run(&mut ports);

    for line in diagnostics.lines() {
        if line.contains("no disponible") || line.contains("fallo") || line.contains("denegado") {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}

fn storage_for(config: &EngineConfig) -> FileStorage {
    let dir = config
        .storage
        .path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::data_dir()
                .expect("Could not determine data directory")
                .join("voznav")
        });
    FileStorage::new(dir)
}

fn handle_prefs_command(config: &EngineConfig, action: PrefsAction) -> Result<()> {
    let storage = storage_for(config);

    match action {
        PrefsAction::Show => {
            let mut storage = storage;
            match storage.load() {
                Ok(Some(json)) => println!("{}", json),
                Ok(None) => println!("(sin registro guardado)"),
                Err(e) => return Err(e.into()),
            }
        }
        PrefsAction::Reset => {
            let store = PrefsStore::new(
                Box::new(storage),
                Box::new(RootStyle::new()),
                std::sync::Arc::new(StderrReporter),
            );
            store.hydrate();
            store.reset();
            println!("{}", "Preferencias restablecidas.".green());
        }
        PrefsAction::Path => {
            println!("{}", storage.path().display());
        }
    }

    Ok(())
}

fn list_commands(role: Role) {
    println!(
        "Comandos de voz para el rol {}:\n",
        role.as_str().bold()
    );
    for entry in effective_table(role) {
        println!(
            "  {:32} {}",
            entry.trigger.bold(),
            describe_action(&entry.action).dimmed()
        );
    }
}

fn describe_action(action: &CommandAction) -> String {
    match action {
        CommandAction::Patch { confirm, .. } => format!("preferencia: {}", confirm),
        CommandAction::AdjustFontScale { delta, .. } => {
            if *delta > 0.0 {
                "aumenta el tamaño del texto".to_string()
            } else {
                "reduce el tamaño del texto".to_string()
            }
        }
        CommandAction::CycleContrast => "cambia el nivel de contraste".to_string(),
        CommandAction::Navigate { path, .. } => format!("navega a {}", path),
        CommandAction::SignOut { .. } => "cierra la sesión".to_string(),
        CommandAction::ReadPage => "lee la página en voz alta".to_string(),
        CommandAction::StopSpeech => "detiene la lectura".to_string(),
    }
}
