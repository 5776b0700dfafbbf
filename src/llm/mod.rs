pub mod chat_model_interface;
pub mod openai_compatible_llm;

pub use chat_model_interface::*;
pub use openai_compatible_llm::*;
