//! Configuration management for the `Farecast` application
//!
//! All settings are sourced from environment variables (`AMADEUS_API_KEY`,
//! `GROQ_API_KEY`, `UPLOAD_DIR`, ...) with sensible defaults for everything
//! that is not a credential.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure for the `Farecast` application
#[derive(Debug, Clone, Deserialize)]
pub struct FarecastConfig {
    /// Host the API server binds to
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Port the API server binds to
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Amadeus flight-offer API key
    #[serde(default)]
    pub amadeus_api_key: Option<String>,
    /// Amadeus flight-offer API secret
    #[serde(default)]
    pub amadeus_api_secret: Option<String>,

    /// Groq chat-completion API key (AI features are disabled without it)
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Directory transient PDF uploads are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

// Default value functions
fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for FarecastConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            api_port: default_api_port(),
            amadeus_api_key: None,
            amadeus_api_secret: None,
            groq_api_key: None,
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

impl FarecastConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Both Amadeus credentials, if fully configured
    #[must_use]
    pub fn amadeus_credentials(&self) -> Option<(String, String)> {
        match (&self.amadeus_api_key, &self.amadeus_api_secret) {
            (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
            _ => None,
        }
    }
}
