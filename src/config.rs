//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets as environment variables through secret
//! bindings, so everything is read from the environment once at startup.

use crate::models::MajorCatalog;
use std::env;

const DEFAULT_MAJORS: &str = "design,engineering,product,operation";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// Main camp site, linked from the "already submitted" modal
    pub main_site_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Majors a camper can apply to
    pub majors: MajorCatalog,
    /// Analytics HTTP endpoint (Segment compatible)
    pub analytics_endpoint: String,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Analytics write key; the HTTP sink is disabled when unset
    pub analytics_write_key: Option<String>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            main_site_url: "https://camp.example.com".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            majors: MajorCatalog::from_csv(DEFAULT_MAJORS),
            analytics_endpoint: "https://api.segment.io/v1".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            analytics_write_key: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let majors = MajorCatalog::from_csv(
            &env::var("CAMP_MAJORS").unwrap_or_else(|_| DEFAULT_MAJORS.to_string()),
        );
        if majors.majors().is_empty() {
            return Err(ConfigError::Invalid("CAMP_MAJORS", "no majors listed"));
        }

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            main_site_url: env::var("MAIN_SITE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            majors,
            analytics_endpoint: env::var("ANALYTICS_ENDPOINT")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.segment.io/v1".to_string()),

            jwt_signing_key,
            analytics_write_key: env::var("ANALYTICS_WRITE_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("CAMP_MAJORS", "design, engineering");
        env::set_var("ANALYTICS_WRITE_KEY", "  ");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.majors.majors(), ["design", "engineering"]);
        assert_eq!(config.analytics_write_key, None);
        assert_eq!(config.port, 8080);
    }
}
