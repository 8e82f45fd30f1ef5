//! Configuration module for QuantDesk.
//!
//! Configuration is resolved once at startup from environment variables
//! (with `.env` loaded by the binary) and is read-only afterwards.

use std::env;

/// Process-wide application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the decision service, without a trailing slash.
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        Self { api_base_url }
    }
}
