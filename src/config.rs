use std::{env, path::PathBuf};

use anyhow::Context;

use crate::credentials::PasswordSchemeKind;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub password_scheme: PasswordSchemeKind,
    /// Write the default documents on startup when they are missing.
    pub seed_defaults: bool,
    /// Built presentation layer, served for any non-API path.
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let password_scheme = match lookup("PASSWORD_SCHEME") {
            Some(value) => value.parse::<PasswordSchemeKind>().context("invalid PASSWORD_SCHEME")?,
            None => PasswordSchemeKind::default(),
        };
        let seed_defaults = match lookup("SEED_DEFAULTS") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("invalid SEED_DEFAULTS value `{value}`"))?,
            None => true,
        };
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_dir,
            host,
            port,
            password_scheme,
            seed_defaults,
            static_dir,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
