//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::str::FromStr;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file, or `:memory:`
    pub database_path: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// JSON file with the default vocabulary. `None` disables seeding.
    pub seed_file: Option<String>,
    /// Default number of words returned by the weak-words query
    pub weak_words_limit: u32,
    /// Default number of words returned by the due-words query
    pub review_batch_limit: u32,
    /// Idle seconds before an unfinished review session is dropped
    pub session_ttl_secs: u64,
}

impl Config {
    /// Config for tests: in-memory database, no seed data.
    pub fn test_default() -> Self {
        Self {
            database_path: IN_MEMORY_DATABASE.to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            seed_file: None,
            weak_words_limit: 10,
            review_batch_limit: 20,
            session_ttl_secs: 3600,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let seed_file = match env::var("WORDNET_SEED_FILE") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(path.trim().to_string()),
            Err(_) => Some("data/default_words.json".to_string()),
        };

        Ok(Self {
            database_path: env::var("WORDNET_DATABASE").unwrap_or_else(|_| "wordnet.db".to_string()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            seed_file,
            weak_words_limit: parse_var("WEAK_WORDS_LIMIT", 10)?,
            review_batch_limit: parse_var("REVIEW_BATCH_LIMIT", 20)?,
            session_ttl_secs: parse_var("SESSION_TTL_SECS", 3600)?,
        })
    }

    /// Session idle timeout in milliseconds.
    pub fn session_ttl_millis(&self) -> i64 {
        i64::try_from(self.session_ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }

    /// Whether the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }
}

/// Read a numeric variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("WORDNET_DATABASE", ":memory:");
        env::set_var("WEAK_WORDS_LIMIT", "5");
        env::set_var("WORDNET_SEED_FILE", "");

        let config = Config::from_env().expect("Config should load");

        assert!(config.is_in_memory());
        assert_eq!(config.weak_words_limit, 5);
        assert_eq!(config.review_batch_limit, 20);
        assert_eq!(config.session_ttl_millis(), 3_600_000);
        assert!(config.seed_file.is_none());

        env::remove_var("WEAK_WORDS_LIMIT");
        env::remove_var("WORDNET_SEED_FILE");
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("WORDNET_TEST_BAD_NUMBER", "ten");
        let err = parse_var::<u32>("WORDNET_TEST_BAD_NUMBER", 1).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("WORDNET_TEST_BAD_NUMBER", _)));
        env::remove_var("WORDNET_TEST_BAD_NUMBER");
    }
}
