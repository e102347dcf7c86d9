//! Environment-driven configuration for the transcoder.

use serde::{Deserialize, Serialize};

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Transcoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeConfig {
    /// Log level filter, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Endpoint the marshalled KMS request is addressed to.
    pub kms_endpoint: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: LogFormat::Text,
            kms_endpoint: "https://kms.us-east-1.amazonaws.com".to_owned(),
        }
    }
}

impl TranscodeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            config.log_format = LogFormat::parse(&v);
        }
        if let Some(v) = lookup("KMS_ENDPOINT") {
            config.kms_endpoint = v;
        }

        config
    }
}
