//! Configuration system for marionette.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{MarionetteError, MarionetteResult};

/// State store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateStoreProvider {
    /// In-memory maps, lost on restart.
    #[default]
    Memory,
    /// In-memory maps mirrored to a JSON file after every write.
    FlatFile,
}

/// State store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateStoreConfig {
    pub provider: StateStoreProvider,
    /// Snapshot location, required for `flat_file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Application service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppServiceConfig {
    /// Client-server API base URL, e.g. `https://matrix.example.org`.
    pub homeserver_url: String,
    /// Server name used to build user IDs, e.g. `example.org`.
    pub homeserver_domain: String,
    /// Token the homeserver issued to this application service.
    pub as_token: String,
    /// Localpart of the bot user that can invite others.
    pub bot_localpart: String,
    pub state_store: StateStoreConfig,
}

impl Default for AppServiceConfig {
    fn default() -> Self {
        Self {
            homeserver_url: "http://localhost:8008".to_string(),
            homeserver_domain: "localhost".to_string(),
            as_token: String::new(),
            bot_localpart: "bridgebot".to_string(),
            state_store: StateStoreConfig::default(),
        }
    }
}

impl AppServiceConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MarionetteResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| MarionetteError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MarionetteError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| MarionetteError::Configuration(e.to_string())),
            _ => Err(MarionetteError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Ok(url) = std::env::var("MARIONETTE_HOMESERVER_URL") {
            config.homeserver_url = url;
        }
        if let Ok(domain) = std::env::var("MARIONETTE_HOMESERVER_DOMAIN") {
            config.homeserver_domain = domain;
        }
        if let Ok(token) = std::env::var("MARIONETTE_AS_TOKEN") {
            config.as_token = token;
        }
        if let Ok(localpart) = std::env::var("MARIONETTE_BOT_LOCALPART") {
            config.bot_localpart = localpart;
        }
        if let Ok(path) = std::env::var("MARIONETTE_STATE_STORE_PATH") {
            config.state_store = StateStoreConfig {
                provider: StateStoreProvider::FlatFile,
                path: Some(PathBuf::from(path)),
            };
        }

        config
    }

    /// Check that the fields needed to act on the homeserver are present.
    pub fn validate(&self) -> MarionetteResult<()> {
        if self.homeserver_domain.is_empty() {
            return Err(MarionetteError::Configuration(
                "homeserver_domain must not be empty".to_string(),
            ));
        }
        if self.bot_localpart.is_empty() {
            return Err(MarionetteError::Configuration(
                "bot_localpart must not be empty".to_string(),
            ));
        }
        if self.as_token.is_empty() {
            return Err(MarionetteError::Configuration(
                "as_token must not be empty".to_string(),
            ));
        }
        if self.state_store.provider == StateStoreProvider::FlatFile
            && self.state_store.path.is_none()
        {
            return Err(MarionetteError::Configuration(
                "state_store.path is required for the flat_file provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> AppServiceConfigBuilder {
        AppServiceConfigBuilder::default()
    }
}

/// Builder for AppServiceConfig.
#[derive(Default)]
pub struct AppServiceConfigBuilder {
    config: AppServiceConfig,
}

impl AppServiceConfigBuilder {
    pub fn homeserver_url(mut self, url: impl Into<String>) -> Self {
        self.config.homeserver_url = url.into();
        self
    }

    pub fn homeserver_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.homeserver_domain = domain.into();
        self
    }

    pub fn as_token(mut self, token: impl Into<String>) -> Self {
        self.config.as_token = token.into();
        self
    }

    pub fn bot_localpart(mut self, localpart: impl Into<String>) -> Self {
        self.config.bot_localpart = localpart.into();
        self
    }

    /// Persist state to a flat file at `path`.
    pub fn flat_file_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.state_store = StateStoreConfig {
            provider: StateStoreProvider::FlatFile,
            path: Some(path.into()),
        };
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppServiceConfig {
        self.config
    }
}
