#![allow(dead_code)]

use std::sync::Arc;

use autoservice_api::{
    credentials::{Argon2Scheme, PasswordScheme, Plaintext},
    state::AppState,
    store::JsonStore,
};
use tempfile::TempDir;

/// State backed by a fresh temporary data directory. Keep the `TempDir`
/// alive for as long as the state is used.
pub fn setup_state() -> (TempDir, AppState) {
    setup_state_with(Arc::new(Plaintext))
}

pub fn setup_argon2_state() -> (TempDir, AppState) {
    setup_state_with(Arc::new(Argon2Scheme))
}

fn setup_state_with(passwords: Arc<dyn PasswordScheme>) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("temp data dir");
    let state = AppState::new(JsonStore::new(dir.path()), passwords);
    (dir, state)
}
