use std::sync::Arc;

use crate::config_manager::Configuration;
use crate::llm::ChatModel;

/// Shared by every request. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub model: Arc<dyn ChatModel>,
}

impl AppState {
    pub fn new(config: Configuration, model: Arc<dyn ChatModel>) -> Self {
        Self {
            config: Arc::new(config),
            model,
        }
    }
}
