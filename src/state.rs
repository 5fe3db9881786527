use std::sync::Arc;

use crate::{
    config::AppConfig,
    credentials::PasswordScheme,
    store::{JsonStore, ids::IdGenerator},
};

#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub ids: Arc<IdGenerator>,
    pub passwords: Arc<dyn PasswordScheme>,
}

impl AppState {
    pub fn new(store: JsonStore, passwords: Arc<dyn PasswordScheme>) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            passwords,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            JsonStore::new(config.data_dir.clone()),
            config.password_scheme.build(),
        )
    }
}
