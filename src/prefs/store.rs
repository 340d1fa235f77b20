//! The subscribable preference store.
//!
//! Construction puts defaults in memory with `loaded = false`. `hydrate`
//! performs the deferred durable load: it replaces the whole in-memory
//! record with the stored one and flips `loaded`. Patches issued before
//! `hydrate` completes are visible in memory but are discarded by the
//! replacement; this is documented behavior the rest of the system relies
//! on, not an accident (the `loaded` flag is the hydration guard).

use crate::error::Reporter;
use crate::prefs::model::{AccessibilityPreferences, PrefsPatch};
use crate::prefs::storage::PrefsStorage;
use crate::prefs::style::{self, StyleSink};
use std::sync::{Arc, Mutex};

type SubscriberFn = Arc<dyn Fn(&AccessibilityPreferences) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner {
    prefs: AccessibilityPreferences,
    loaded: bool,
    next_id: u64,
    subscribers: Vec<(u64, SubscriberFn)>,
}

pub struct PrefsStore {
    inner: Mutex<Inner>,
    storage: Mutex<Box<dyn PrefsStorage>>,
    style: Mutex<Box<dyn StyleSink>>,
    reporter: Arc<dyn Reporter>,
}

impl PrefsStore {
    pub fn new(
        storage: Box<dyn PrefsStorage>,
        style: Box<dyn StyleSink>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                prefs: AccessibilityPreferences::default(),
                loaded: false,
                next_id: 0,
                subscribers: Vec::new(),
            }),
            storage: Mutex::new(storage),
            style: Mutex::new(style),
            reporter,
        }
    }

    /// Current record (a copy).
    pub fn get(&self) -> AccessibilityPreferences {
        self.lock_inner().prefs.clone()
    }

    /// Whether the durable load has completed.
    pub fn loaded(&self) -> bool {
        self.lock_inner().loaded
    }

    /// Perform the durable load.
    ///
    /// Reads the stored record (defaults if absent or corrupt), replaces
    /// the in-memory state wholesale, sets `loaded`, then notifies
    /// subscribers and applies style effects. Nothing is persisted here.
    pub fn hydrate(&self) {
        let raw = match self.storage.lock().expect("storage lock poisoned").load() {
            Ok(raw) => raw,
            Err(e) => {
                self.reporter.report("prefs", &e.to_string());
                None
            }
        };

        let mut loaded_prefs = raw
            .and_then(|json| serde_json::from_str::<AccessibilityPreferences>(&json).ok())
            .unwrap_or_default();
        loaded_prefs.clamp_font_scale();

        let snapshot;
        let subscribers;
        {
            let mut inner = self.lock_inner();
            inner.prefs = loaded_prefs;
            inner.loaded = true;
            snapshot = inner.prefs.clone();
            subscribers = snapshot_subscribers(&inner);
        }

        notify(&subscribers, &snapshot);
        self.apply_style(&snapshot);
    }

    /// Apply a partial update.
    ///
    /// Always notifies subscribers; persists and applies style effects only
    /// once `loaded` is true.
    pub fn patch(&self, patch: PrefsPatch) {
        let snapshot;
        let loaded;
        let subscribers;
        {
            let mut inner = self.lock_inner();
            patch.apply(&mut inner.prefs);
            snapshot = inner.prefs.clone();
            loaded = inner.loaded;
            subscribers = snapshot_subscribers(&inner);
        }

        notify(&subscribers, &snapshot);

        if loaded {
            self.persist(&snapshot);
            self.apply_style(&snapshot);
        }
    }

    /// Reset to defaults. This is itself a patch: it persists and
    /// re-applies style effects like any other post-load mutation.
    pub fn reset(&self) {
        let snapshot;
        let loaded;
        let subscribers;
        {
            let mut inner = self.lock_inner();
            inner.prefs = AccessibilityPreferences::default();
            snapshot = inner.prefs.clone();
            loaded = inner.loaded;
            subscribers = snapshot_subscribers(&inner);
        }

        notify(&subscribers, &snapshot);

        if loaded {
            self.persist(&snapshot);
            self.apply_style(&snapshot);
        }
    }

    pub fn subscribe(
        &self,
        callback: Arc<dyn Fn(&AccessibilityPreferences) + Send + Sync>,
    ) -> SubscriptionId {
        let mut inner = self.lock_inner();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, callback));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.lock_inner();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id.0);
    }

    fn persist(&self, prefs: &AccessibilityPreferences) {
        let json = match serde_json::to_string(prefs) {
            Ok(json) => json,
            Err(e) => {
                self.reporter.report("prefs", &format!("encode failed: {}", e));
                return;
            }
        };
        if let Err(e) = self
            .storage
            .lock()
            .expect("storage lock poisoned")
            .save(&json)
        {
            self.reporter.report("prefs", &e.to_string());
        }
    }

    fn apply_style(&self, prefs: &AccessibilityPreferences) {
        let mut sink = self.style.lock().expect("style lock poisoned");
        style::apply_preferences(prefs, sink.as_mut());
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("prefs lock poisoned")
    }
}

fn snapshot_subscribers(inner: &Inner) -> Vec<SubscriberFn> {
    inner.subscribers.iter().map(|(_, f)| f.clone()).collect()
}

fn notify(subscribers: &[SubscriberFn], prefs: &AccessibilityPreferences) {
    for subscriber in subscribers {
        subscriber(prefs);
    }
}
