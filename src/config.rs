use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::language::Language;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub target_language: Language,
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_char_limit() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            target_language: Language::default(),
            char_limit: default_char_limit(),
        }
    }
}

impl Config {
    /// Load a YAML or JSON config file. `${VAR}` placeholders are replaced
    /// from the environment before parsing; unset variables are left as-is.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let bytes = fs::read(path)?;
        let content = substitute_env_vars(&decode_text(&bytes));

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Fill gaps from the process environment
    pub fn apply_env_overrides(&mut self) {
        if self.translate.api_key.is_empty() {
            if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
                debug!("Using translation API key from GOOGLE_API_KEY");
                self.translate.api_key = key;
            }
        }

        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.char_limit == 0 {
            anyhow::bail!("translate.char_limit must be greater than zero");
        }
        if self.translate.endpoint.trim().is_empty() {
            anyhow::bail!("translate.endpoint must not be empty");
        }
        Ok(())
    }
}

/// Decode config file bytes, honouring a UTF-8 or UTF-16 BOM
fn decode_text(bytes: &[u8]) -> String {
    let (cow, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if had_errors {
        debug!("Config file is not valid {}; decoded lossily", encoding.name());
    }
    cow.into_owned()
}

fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static env var pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
