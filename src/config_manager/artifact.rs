use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::config_manager::utils::{strip_bom, substitute_env_vars};
use crate::error::ConfigError;
use crate::translate::prompt::{INSTRUCTIONS_PLACEHOLDER, TEXT_PLACEHOLDER};

/// Serialization format of the configuration artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
}

impl ArtifactFormat {
    /// JSON for `.json` / `.jsonld` names, YAML otherwise.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".json") || lower.ends_with(".jsonld") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// On-disk shape of the artifact.
#[derive(Debug, Deserialize)]
struct ArtifactDocument {
    #[serde(alias = "system_prompt_template")]
    prompt_template: String,
    #[serde(alias = "schema")]
    response_schema: Value,
    #[serde(alias = "model")]
    model_name: String,
}

/// Prompt template, response schema and model name, loaded once at startup
/// and shared read-only by every request.
pub struct Configuration {
    prompt_template: String,
    validator: Validator,
    model_name: String,
}

impl Configuration {
    pub fn new(
        prompt_template: impl Into<String>,
        response_schema: Value,
        model_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let prompt_template = prompt_template.into();
        let model_name = model_name.into();

        if model_name.trim().is_empty() {
            return Err(ConfigError::unavailable("artifact has an empty model_name"));
        }
        if !response_schema.is_object() {
            return Err(ConfigError::unavailable("response_schema must be a mapping"));
        }
        for placeholder in [TEXT_PLACEHOLDER, INSTRUCTIONS_PLACEHOLDER] {
            if !prompt_template.contains(placeholder) {
                warn!("Prompt template does not contain {}", placeholder);
            }
        }

        let validator = jsonschema::validator_for(&response_schema)
            .map_err(|e| ConfigError::unavailable(format!("failed to compile response_schema: {e}")))?;

        Ok(Self {
            prompt_template,
            validator,
            model_name,
        })
    }

    /// Parse an artifact document. The content is only ever parsed as data.
    ///
    /// `${VAR}` references are expanded in `model_name` only; the prompt
    /// template is sent to the model, so it is kept verbatim.
    pub fn parse(content: &str, format: ArtifactFormat) -> Result<Self, ConfigError> {
        let content = strip_bom(content);
        let document: ArtifactDocument = match format {
            ArtifactFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::unavailable(format!("invalid JSON artifact: {e}")))?,
            ArtifactFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::unavailable(format!("invalid YAML artifact: {e}")))?,
        };

        Self::new(
            document.prompt_template,
            document.response_schema,
            substitute_env_vars(&document.model_name),
        )
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("prompt_template", &self.prompt_template)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}
