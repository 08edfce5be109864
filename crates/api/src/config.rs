//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Inference service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the exported vectorizer artifact
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: String,

    /// Path to the exported classifier artifact
    #[serde(default = "default_classifier_path")]
    pub classifier_path: String,
}

fn default_port() -> u16 {
    5000
}

fn default_vectorizer_path() -> String {
    "vectorizer (1).pkl".to_string()
}

fn default_classifier_path() -> String {
    "financial_classifier_model (1).pkl".to_string()
}

impl ServiceConfig {
    /// Load configuration from NUDGER_-prefixed environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("NUDGER"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            port: default_port(),
            vectorizer_path: default_vectorizer_path(),
            classifier_path: default_classifier_path(),
        }))
    }
}
