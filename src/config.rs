use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_OUTPUT_PATH: &str = "data/snackshack.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "missing required environment variable(s): {}. \
         Create a .env file with these variables or set them in your environment",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
}

/// Raw values as they come out of the environment. Everything optional so
/// that missing keys can be reported together.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    signup_id: Option<String>,
    api_key: Option<String>,
    test_date: Option<String>,
    debug: Option<String>,
    output_path: Option<String>,
}

/// Process configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub signup_id: String,
    pub api_key: String,
    /// Replaces the wall-clock "today" when set.
    pub today_override: Option<String>,
    pub verbose: bool,
    pub output_path: PathBuf,
}

/// Flag values from the command line; each one wins over its env counterpart.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub date: Option<String>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Load `.env` (if any), then the process environment.
    pub fn load(overrides: Overrides) -> Result<Self> {
        // A missing .env is normal in CI and cron.
        let _ = dotenvy::dotenv();

        let raw: RawSettings = ::config::Config::builder()
            .add_source(::config::Environment::default().try_parsing(false))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(Self::from_raw(raw, overrides)?)
    }

    fn from_raw(raw: RawSettings, overrides: Overrides) -> Result<Self, ConfigError> {
        let signup_id = non_blank(raw.signup_id);
        let api_key = non_blank(raw.api_key);

        let (signup_id, api_key) = match (signup_id, api_key) {
            (Some(s), Some(k)) => (s, k),
            (s, k) => {
                let mut missing = Vec::new();
                if s.is_none() {
                    missing.push("SIGNUP_ID");
                }
                if k.is_none() {
                    missing.push("API_KEY");
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        Ok(Self {
            signup_id,
            api_key,
            today_override: overrides.date.or_else(|| non_blank(raw.test_date)),
            verbose: overrides.verbose || non_blank(raw.debug).is_some(),
            output_path: overrides
                .output
                .or_else(|| non_blank(raw.output_path).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
