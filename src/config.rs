// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Default bound on in-flight deletions during a cascade.
pub const DEFAULT_MAX_CONCURRENT_DELETES: usize = 50;

/// Which document store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloud Firestore (or the emulator when FIRESTORE_EMULATOR_HOST is set)
    Firestore,
    /// Process-local store; data is lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store backend selection
    pub store_backend: StoreBackend,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Upper bound on concurrent deletions per cascade phase
    pub max_concurrent_deletes: usize,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            max_concurrent_deletes: DEFAULT_MAX_CONCURRENT_DELETES,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::Firestore,
        };

        let gcp_project_id = match (env::var("GCP_PROJECT_ID"), store_backend) {
            (Ok(id), _) => id.trim().to_string(),
            (Err(_), StoreBackend::Memory) => "local-dev".to_string(),
            // The emulator accepts any project id
            (Err(_), StoreBackend::Firestore) if env::var("FIRESTORE_EMULATOR_HOST").is_ok() => {
                "local-dev".to_string()
            }
            (Err(_), StoreBackend::Firestore) => return Err(ConfigError::Missing("GCP_PROJECT_ID")),
        };

        let max_concurrent_deletes = match env::var("MAX_CONCURRENT_DELETES") {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ConfigError::Invalid("MAX_CONCURRENT_DELETES", value)),
            },
            Err(_) => DEFAULT_MAX_CONCURRENT_DELETES,
        };

        Ok(Self {
            store_backend,
            gcp_project_id,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            max_concurrent_deletes,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
