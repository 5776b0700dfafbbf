//! Loading of the configuration artifact: prompt template, response schema
//! and model name.
//!
//! The artifact source is authoritative. Its content is trusted as
//! configuration but is only ever parsed as YAML or JSON, never executed.
//! Environment references (`${VAR}`) are expanded in `model_name` alone, so
//! process secrets never reach the prompt sent to the model.

pub mod artifact;
pub mod location;
pub mod utils;

pub use artifact::{ArtifactFormat, Configuration};
pub use location::{ArtifactFetcher, ArtifactLocation};
