use serde_json::Value;

use crate::error::{TranslateError, MISSING_TEXT};

/// Body of `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub instructions: String,
}

impl TranslationRequest {
    /// Check the shape of a raw request body.
    ///
    /// `text` must be present and a string; an empty string is accepted.
    /// `instructions` is optional and defaults to the empty string.
    pub fn from_body(body: &[u8]) -> Result<Self, TranslateError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| TranslateError::bad_request(MISSING_TEXT))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let Some(fields) = value.as_object() else {
            return Err(TranslateError::bad_request(MISSING_TEXT));
        };

        let text = match fields.get("text") {
            None | Some(Value::Null) => return Err(TranslateError::bad_request(MISSING_TEXT)),
            Some(Value::String(text)) => text.clone(),
            Some(_) => return Err(TranslateError::bad_request("'text' must be a string")),
        };

        let instructions = match fields.get("instructions") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(instructions)) => instructions.clone(),
            Some(_) => return Err(TranslateError::bad_request("'instructions' must be a string")),
        };

        Ok(Self { text, instructions })
    }
}
