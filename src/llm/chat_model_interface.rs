use async_trait::async_trait;
use thiserror::Error;

/// Failure of the external chat-completion call. Callers do not distinguish
/// between the variants; the message is what gets reported.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode completion: {0}")]
    Decode(String),

    #[error("completion contained no message content")]
    EmptyResponse,
}

/// A stateless chat model: one system prompt, one user message, one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a single completion with `system` then `user` as the only two
    /// messages and return the raw reply text.
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String, UpstreamError>;

    fn model_name(&self) -> &str;
}
