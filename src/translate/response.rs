use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config_manager::Configuration;
use crate::error::TranslateError;

/// Model output that passed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedResponse(Value);

/// Parse the raw model reply as JSON.
pub fn parse_reply(raw: &str) -> Result<Value, TranslateError> {
    Ok(serde_json::from_str(raw)?)
}

/// Models sometimes return the translation object itself instead of wrapping
/// it. An object with `content` but no `translation` is wrapped as
/// `{"translation": <object>}`. Anything else is returned as is.
pub fn normalize(payload: Value) -> Value {
    match payload {
        Value::Object(fields) if !fields.contains_key("translation") && fields.contains_key("content") => {
            debug!("Wrapping bare content payload under 'translation'");
            let mut wrapped = Map::with_capacity(1);
            wrapped.insert("translation".to_string(), Value::Object(fields));
            Value::Object(wrapped)
        }
        other => other,
    }
}

/// Check a payload against the configured response schema, collecting every
/// violation.
pub fn validate(config: &Configuration, payload: Value) -> Result<ValidatedResponse, TranslateError> {
    let errors: Vec<String> = config
        .validator()
        .iter_errors(&payload)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{path}: {e}")
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(ValidatedResponse(payload))
    } else {
        Err(TranslateError::SchemaValidation { errors })
    }
}
