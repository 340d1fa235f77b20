//! The static voice-command table.
//!
//! Entries are a typed tagged list built once at dispatcher construction:
//! the shared base table plus the table for the session's role. Definition
//! order is load-bearing: dispatch is first-match-wins with no
//! most-specific preference, so broader triggers belong after the longer
//! phrases they would otherwise shadow.

use crate::defaults;
use crate::prefs::PrefsPatch;

/// The session roles the application distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Candidate,
    Company,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Company => "company",
            Self::Admin => "admin",
        }
    }
}

/// Which table an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Base,
    Candidate,
    Company,
    Admin,
}

impl Scope {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Candidate => Self::Candidate,
            Role::Company => Self::Company,
            Role::Admin => Self::Admin,
        }
    }
}

/// What a matched command does.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandAction {
    /// Apply a preference patch and confirm it aloud.
    Patch {
        patch: PrefsPatch,
        confirm: &'static str,
    },
    /// Bump the font scale relative to its current value.
    AdjustFontScale {
        delta: f32,
        confirm: &'static str,
    },
    /// Advance the contrast level through its cycle.
    CycleContrast,
    /// Speak the confirmation, then navigate after a short delay so the
    /// speech has started.
    Navigate {
        path: &'static str,
        confirm: &'static str,
    },
    /// Speak, await sign-out, then navigate home after a delay.
    SignOut { confirm: &'static str },
    /// Read the visible page text aloud.
    ReadPage,
    /// Cancel whatever is being spoken.
    StopSpeech,
}

/// One command table entry. Triggers are lowercase by construction;
/// transcripts are lowercased before matching.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEntry {
    pub trigger: &'static str,
    pub scope: Scope,
    pub action: CommandAction,
}

impl CommandEntry {
    fn new(trigger: &'static str, scope: Scope, action: CommandAction) -> Self {
        debug_assert_eq!(trigger, trigger.to_lowercase());
        Self {
            trigger,
            scope,
            action,
        }
    }
}

fn patch_entry(trigger: &'static str, patch: PrefsPatch, confirm: &'static str) -> CommandEntry {
    CommandEntry::new(trigger, Scope::Base, CommandAction::Patch { patch, confirm })
}

fn nav_entry(
    trigger: &'static str,
    scope: Scope,
    path: &'static str,
    confirm: &'static str,
) -> CommandEntry {
    CommandEntry::new(trigger, scope, CommandAction::Navigate { path, confirm })
}

/// Commands available to every role.
pub fn base_table() -> Vec<CommandEntry> {
    vec![
        // "activar alto contraste" must stay ahead of the bare
        // "contraste" trigger, which would otherwise match it first.
        patch_entry(
            "activar alto contraste",
            PrefsPatch::high_contrast(true),
            "Alto contraste activado",
        ),
        patch_entry(
            "desactivar alto contraste",
            PrefsPatch::high_contrast(false),
            "Alto contraste desactivado",
        ),
        CommandEntry::new("contraste", Scope::Base, CommandAction::CycleContrast),
        CommandEntry::new(
            "aumentar texto",
            Scope::Base,
            CommandAction::AdjustFontScale {
                delta: defaults::FONT_SCALE_STEP,
                confirm: "Texto más grande",
            },
        ),
        CommandEntry::new(
            "reducir texto",
            Scope::Base,
            CommandAction::AdjustFontScale {
                delta: -defaults::FONT_SCALE_STEP,
                confirm: "Texto más pequeño",
            },
        ),
        patch_entry(
            "activar espaciado",
            PrefsPatch {
                letter_spacing: Some(true),
                ..Default::default()
            },
            "Espaciado de letras activado",
        ),
        patch_entry(
            "desactivar espaciado",
            PrefsPatch {
                letter_spacing: Some(false),
                ..Default::default()
            },
            "Espaciado de letras desactivado",
        ),
        patch_entry(
            "reducir movimiento",
            PrefsPatch {
                reduced_motion: Some(true),
                ..Default::default()
            },
            "Movimiento reducido activado",
        ),
        patch_entry(
            "restaurar movimiento",
            PrefsPatch {
                reduced_motion: Some(false),
                ..Default::default()
            },
            "Movimiento restaurado",
        ),
        patch_entry(
            "botones grandes",
            PrefsPatch {
                large_buttons: Some(true),
                ..Default::default()
            },
            "Botones grandes activados",
        ),
        patch_entry(
            "botones normales",
            PrefsPatch {
                large_buttons: Some(false),
                ..Default::default()
            },
            "Botones normales",
        ),
        patch_entry(
            "activar subtítulos",
            PrefsPatch::captions_enabled(true),
            "Subtítulos activados",
        ),
        patch_entry(
            "desactivar subtítulos",
            PrefsPatch::captions_enabled(false),
            "Subtítulos desactivados",
        ),
        patch_entry(
            "activar transcripción",
            PrefsPatch {
                live_transcription_enabled: Some(true),
                ..Default::default()
            },
            "Transcripción en vivo activada",
        ),
        patch_entry(
            "desactivar transcripción",
            PrefsPatch {
                live_transcription_enabled: Some(false),
                ..Default::default()
            },
            "Transcripción en vivo desactivada",
        ),
        CommandEntry::new("leer página", Scope::Base, CommandAction::ReadPage),
        CommandEntry::new("silencio", Scope::Base, CommandAction::StopSpeech),
        nav_entry("ir a inicio", Scope::Base, "/", "Abriendo inicio"),
        CommandEntry::new(
            "cerrar sesión",
            Scope::Base,
            CommandAction::SignOut {
                confirm: "Cerrando sesión",
            },
        ),
    ]
}

/// Commands specific to one role.
pub fn role_table(role: Role) -> Vec<CommandEntry> {
    match role {
        Role::Candidate => vec![
            nav_entry(
                "buscar empleo",
                Scope::Candidate,
                "/empleos",
                "Abriendo búsqueda de empleo",
            ),
            nav_entry(
                "mis postulaciones",
                Scope::Candidate,
                "/postulaciones",
                "Abriendo tus postulaciones",
            ),
            nav_entry(
                "mi currículum",
                Scope::Candidate,
                "/perfil/curriculum",
                "Abriendo tu currículum",
            ),
            nav_entry("mi perfil", Scope::Candidate, "/perfil", "Abriendo tu perfil"),
        ],
        Role::Company => vec![
            nav_entry(
                "publicar oferta",
                Scope::Company,
                "/empresa/ofertas/nueva",
                "Abriendo publicación de oferta",
            ),
            nav_entry(
                "mis ofertas",
                Scope::Company,
                "/empresa/ofertas",
                "Abriendo tus ofertas",
            ),
            nav_entry(
                "ver candidatos",
                Scope::Company,
                "/empresa/candidatos",
                "Abriendo candidatos",
            ),
        ],
        Role::Admin => vec![
            nav_entry(
                "panel de administración",
                Scope::Admin,
                "/admin",
                "Abriendo panel de administración",
            ),
            nav_entry(
                "gestión de usuarios",
                Scope::Admin,
                "/admin/usuarios",
                "Abriendo gestión de usuarios",
            ),
            nav_entry("informes", Scope::Admin, "/admin/informes", "Abriendo informes"),
        ],
    }
}

/// The full table for a role: base entries first, role entries after.
pub fn effective_table(role: Role) -> Vec<CommandEntry> {
    let mut entries = base_table();
    entries.extend(role_table(role));
    entries
}
