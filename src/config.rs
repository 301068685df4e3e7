//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

use crate::services::api_key_service::TokenPolicy;

/// Free-tier token budget used when `FREE_TOKENS` is not set.
///
/// This is the only place the fallback lives; the schema has no competing default.
pub const DEFAULT_FREE_TOKENS: i64 = 1000;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://api_keys.db`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `FREE_TOKENS` (optional): token budget for keys created without an explicit limit
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_free_tokens")]
    pub free_tokens: i64,
}

fn default_database_url() -> String {
    "sqlite://api_keys.db".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_free_tokens() -> i64 {
    DEFAULT_FREE_TOKENS
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g. a non-numeric `FREE_TOKENS`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are automatically converted: free_tokens -> FREE_TOKENS
        envy::from_env::<Config>()
    }

    /// Token defaults handed to the API key store.
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy::new(self.free_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite://api_keys.db");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.free_tokens, DEFAULT_FREE_TOKENS);
    }

    #[test]
    fn free_tokens_read_from_environment() {
        let config = from_pairs(&[("FREE_TOKENS", "25000")]).unwrap();
        assert_eq!(config.free_tokens, 25000);
        assert_eq!(config.token_policy().free_tokens(), 25000);
    }

    #[test]
    fn malformed_free_tokens_is_a_configuration_error() {
        assert!(from_pairs(&[("FREE_TOKENS", "plenty")]).is_err());
    }
}
