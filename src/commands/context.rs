//! Collaborators the dispatcher reaches outside the engine: role lookup,
//! navigation, sign-out, and page text. All behind traits with mock
//! implementations for tests.

use crate::commands::table::Role;
use async_trait::async_trait;
use std::sync::Mutex;

/// Resolves the current session's role. Queried once per dispatcher; the
/// role is never refreshed for the dispatcher's lifetime.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn current_role(&self) -> Role;
}

/// Navigation primitive.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Session termination primitive.
#[async_trait]
pub trait SessionGate: Send + Sync {
    async fn sign_out(&self) -> Result<(), String>;
}

/// Access to the currently visible page text, for read-aloud commands.
pub trait PageText: Send + Sync {
    fn visible_text(&self) -> String;
}

/// Role lookup that always answers the same role.
pub struct FixedRoleLookup(pub Role);

#[async_trait]
impl RoleLookup for FixedRoleLookup {
    async fn current_role(&self) -> Role {
        self.0
    }
}

/// Navigator that records every requested path.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("navigator lock poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        self.paths
            .lock()
            .expect("navigator lock poisoned")
            .push(path.to_string());
    }
}

/// Session gate that counts calls and can be configured to fail.
#[derive(Default)]
pub struct MockSessionGate {
    calls: Mutex<u32>,
    fail: bool,
}

impl MockSessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().expect("gate lock poisoned")
    }
}

#[async_trait]
impl SessionGate for MockSessionGate {
    async fn sign_out(&self) -> Result<(), String> {
        *self.calls.lock().expect("gate lock poisoned") += 1;
        if self.fail {
            Err("sign-out rejected".to_string())
        } else {
            Ok(())
        }
    }
}

/// Page text source with fixed content.
pub struct StaticPage(pub String);

impl StaticPage {
    pub fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl PageText for StaticPage {
    fn visible_text(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_role_lookup() {
        let lookup = FixedRoleLookup(Role::Company);
        assert_eq!(lookup.current_role().await, Role::Company);
    }

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new();
        nav.go_to("/empleos");
        nav.go_to("/perfil");
        assert_eq!(nav.paths(), vec!["/empleos", "/perfil"]);
    }

    #[tokio::test]
    async fn test_mock_session_gate() {
        let gate = MockSessionGate::new();
        assert!(gate.sign_out().await.is_ok());
        assert_eq!(gate.calls(), 1);

        let failing = MockSessionGate::failing();
        assert!(failing.sign_out().await.is_err());
    }

    #[test]
    fn test_static_page() {
        let page = StaticPage::new("Ofertas de empleo disponibles");
        assert_eq!(page.visible_text(), "Ofertas de empleo disponibles");
    }
}
