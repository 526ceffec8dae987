// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use camp_registrar::config::Config;
use camp_registrar::db::{FirestoreDb, MemoryStore};
use camp_registrar::error::AppError;
use camp_registrar::middleware::auth::{create_jwt, Claims};
use camp_registrar::models::SessionUser;
use camp_registrar::routes::create_router;
use camp_registrar::services::ui::{Modal, NoticeLevel};
use camp_registrar::services::{
    CampEvent, CamperResolver, DirectiveRecorder, IdentityFanout, IdentitySink, Navigator,
    Notifier, Traits,
};
use camp_registrar::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

/// Everything a sink saw, in order.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum SinkCall {
    Identify(String),
    ErrorContext(String),
    Track(String, CampEvent),
    Error(Option<String>, String),
}

/// Identity sink that remembers its calls.
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<CampEvent> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Track(_, event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(CampEvent::name).collect()
    }

    pub fn identify_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Identify(_)))
            .count()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Error(_, error) => Some(error),
                _ => None,
            })
            .collect()
    }
}

impl IdentitySink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn identify(&self, user_id: &str, _traits: &Traits) {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Identify(user_id.to_string()));
    }

    fn track(&self, user_id: &str, event: &CampEvent) {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Track(user_id.to_string(), event.clone()));
    }

    fn set_error_context(&self, user: &SessionUser) {
        self.calls.lock().unwrap().push(SinkCall::ErrorContext(
            user.id.clone().unwrap_or_default(),
        ));
    }

    fn capture_error(&self, user_id: Option<&str>, error: &AppError) {
        self.calls.lock().unwrap().push(SinkCall::Error(
            user_id.map(str::to_string),
            error.to_string(),
        ));
    }
}

/// UI whose navigation always fails; everything else is recorded.
#[derive(Default)]
#[allow(dead_code)]
pub struct BrokenNavigator {
    pub inner: DirectiveRecorder,
}

impl Navigator for BrokenNavigator {
    async fn navigate(&self, _path: &str) -> Result<(), AppError> {
        Err(AppError::Navigation("router unavailable".to_string()))
    }
}

impl Notifier for BrokenNavigator {
    fn notify(&self, level: NoticeLevel, text: &str) {
        self.inner.notify(level, text);
    }

    fn show_modal(&self, modal: Modal) {
        self.inner.show_modal(modal);
    }

    fn show_loading(&self, text: &str) {
        self.inner.show_loading(text);
    }

    fn dismiss_loading(&self) {
        self.inner.dismiss_loading();
    }
}

/// A resolver over an in-memory store with a recording sink.
#[allow(dead_code)]
pub fn test_resolver() -> (CamperResolver<MemoryStore>, MemoryStore, Arc<RecordingSink>) {
    let config = Config::test_default();
    let store = MemoryStore::new();
    let sink = Arc::new(RecordingSink::default());
    let resolver = CamperResolver::new(
        store.clone(),
        config.majors.clone(),
        IdentityFanout::default().with_sink(sink.clone()),
        config.main_site_url.clone(),
    );
    (resolver, store, sink)
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the store and the recording sink.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, MemoryStore, Arc<RecordingSink>) {
    let config = Config::test_default();
    let store = MemoryStore::new();
    let sink = Arc::new(RecordingSink::default());
    let identity = IdentityFanout::default().with_sink(sink.clone());

    let state = Arc::new(AppState::with_identity(config, store.clone(), identity));
    (create_router(state), store, sink)
}

/// Create a test app with the offline Firestore client.
#[allow(dead_code)]
pub fn create_offline_app() -> axum::Router {
    let state = Arc::new(AppState::new(Config::test_default(), FirestoreDb::new_mock()));
    create_router(state)
}

/// Session token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn test_token(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        name: Some("Test Camper".to_string()),
        email: Some("camper@example.com".to_string()),
        picture: None,
        ..Default::default()
    };
    create_jwt(claims, &Config::test_default().jwt_signing_key).unwrap()
}
