use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_OBJECT: &str = "model-weights-tr.yaml";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOG_FILTER: &str = "translate_service=debug,tower_http=debug";

/// Process settings, read from the environment at startup.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Where the configuration artifact lives.
    #[serde(default)]
    pub model_weights: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Object name used when `model_weights` is a bare bucket name.
    pub config_object: String,
    #[serde(default)]
    pub gcs_access_token: Option<String>,
    pub host: String,
    pub port: u16,
}

fn default_settings() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("openai_base_url", DEFAULT_OPENAI_BASE_URL)?
        .set_default("config_object", DEFAULT_CONFIG_OBJECT)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// Same as [`Settings::from_env`] but reads from the given map instead of
    /// the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let settings: Settings = default_settings()
            .and_then(|builder| builder.add_source(env).build())
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::unavailable(format!("invalid settings: {e}")))?;

        settings.storage_location()?;
        settings.api_key()?;
        Ok(settings)
    }

    pub fn storage_location(&self) -> Result<&str, ConfigError> {
        non_empty(self.model_weights.as_deref())
            .ok_or_else(|| ConfigError::unavailable("MODEL_WEIGHTS environment variable not set"))
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.openai_api_key.as_deref())
            .ok_or_else(|| ConfigError::unavailable("OPENAI_API_KEY environment variable not set"))
    }

    pub fn gcs_access_token(&self) -> Option<&str> {
        non_empty(self.gcs_access_token.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("model_weights", &self.model_weights)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("config_object", &self.config_object)
            .field("gcs_access_token", &self.gcs_access_token.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let settings = Settings::from_map(vars(&[
            ("MODEL_WEIGHTS", "translation-bucket"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .expect("settings");

        assert_eq!(settings.storage_location().unwrap(), "translation-bucket");
        assert_eq!(settings.api_key().unwrap(), "sk-test");
        assert_eq!(settings.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.config_object, DEFAULT_CONFIG_OBJECT);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert!(settings.gcs_access_token().is_none());
    }

    #[test]
    fn overrides_are_read() {
        let settings = Settings::from_map(vars(&[
            ("MODEL_WEIGHTS", "gs://bucket/prompts.yaml"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1"),
            ("PORT", "9090"),
            ("GCS_ACCESS_TOKEN", "ya29.token"),
        ]))
        .expect("settings");

        assert_eq!(settings.port, 9090);
        assert_eq!(settings.openai_base_url, "http://localhost:9000/v1");
        assert_eq!(settings.gcs_access_token(), Some("ya29.token"));
    }

    #[test]
    fn numeric_looking_values_are_kept_verbatim() {
        let settings = Settings::from_map(vars(&[
            ("MODEL_WEIGHTS", "012345"),
            ("OPENAI_API_KEY", "007"),
            ("GCS_ACCESS_TOKEN", "true"),
        ]))
        .expect("settings");

        assert_eq!(settings.storage_location().unwrap(), "012345");
        assert_eq!(settings.api_key().unwrap(), "007");
        assert_eq!(settings.gcs_access_token(), Some("true"));
    }

    #[test]
    fn missing_storage_location_is_fatal() {
        let err = Settings::from_map(vars(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(err.to_string().contains("MODEL_WEIGHTS"));
    }

    #[test]
    fn blank_api_key_is_fatal() {
        let err = Settings::from_map(vars(&[
            ("MODEL_WEIGHTS", "translation-bucket"),
            ("OPENAI_API_KEY", "  "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = Settings::from_map(vars(&[
            ("MODEL_WEIGHTS", "translation-bucket"),
            ("OPENAI_API_KEY", "sk-very-secret"),
        ]))
        .expect("settings");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
