pub mod interface;
pub mod prompt;
pub mod response;

pub use interface::*;
pub use prompt::build_prompt;
pub use response::ValidatedResponse;
