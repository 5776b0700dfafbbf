//! HTTP service that translates text through an OpenAI chat model.
//!
//! On startup the service loads a configuration artifact (prompt template,
//! response JSON Schema and model name). Each `POST /translate` request fills
//! the template, calls the model once, and returns the model's JSON reply
//! after validating it against the schema.

pub mod config;
pub mod config_manager;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod routes;
pub mod state;
pub mod translate;
