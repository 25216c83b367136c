use std::collections::BTreeMap;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Settings taken from the environment verbatim. Matching is case-insensitive.
const TEXT_KEYS: &[&str] = &[
    "database_url",
    "database_name",
    "cors_origins",
    "vault_password",
    "vault_token",
    "loglevel",
];

/// Settings parsed into numbers or booleans.
const TYPED_KEYS: &[&str] = &[
    "port",
    "login_attempts_per_minute",
    "body_limit_bytes",
    "protect_api",
];

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("missing required setting `{0}`")]
    Missing(&'static str),
}

/// Runtime configuration, built once at startup and shared through the router state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub port: u16,
    pub cors_origins: String,
    pub vault_password: String,
    pub vault_token: String,
    pub loglevel: String,
    /// Login attempts allowed per minute across all clients; `0` disables throttling.
    /// Successful logins spend the quota too, so a client hammering the
    /// endpoint also locks out the correct password until the minute rolls over.
    pub login_attempts_per_minute: u32,
    pub body_limit_bytes: usize,
    /// Require the bearer token on every resource route.
    pub protect_api: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            database_name: String::new(),
            port: 8000,
            cors_origins: "*".to_string(),
            vault_password: String::new(),
            vault_token: String::new(),
            loglevel: "info".to_string(),
            login_attempts_per_minute: 10,
            body_limit_bytes: 10 * 1024 * 1024,
            protect_api: false,
        }
    }
}

/// Parsed form of `CORS_ORIGINS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Config {
    /// `Env` parses values (`007` becomes `7`, `[a,b]` an array), so only the
    /// typed keys go through it; text keys are merged as raw strings.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Env::raw().only(TYPED_KEYS))
            .merge(Serialized::defaults(text_env()))
    }

    /// Load from the process environment and reject missing required settings.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: Config = figment.extract().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("DATABASE_URL", &self.database_url),
            ("DATABASE_NAME", &self.database_name),
            ("VAULT_PASSWORD", &self.vault_password),
            ("VAULT_TOKEN", &self.vault_token),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(key));
            }
        }
        Ok(())
    }

    pub fn cors_origins(&self) -> CorsOrigins {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

fn text_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?.trim().to_ascii_lowercase();
            if !TEXT_KEYS.contains(&key.as_str()) {
                return None;
            }
            Some((key, value.into_string().ok()?))
        })
        .collect()
}
