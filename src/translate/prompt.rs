use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const TEXT_PLACEHOLDER: &str = "{text}";
pub const INSTRUCTIONS_PLACEHOLDER: &str = "{instructions}";

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?:text|instructions)\}").expect("valid regex"));

/// Fill the prompt template with the request text and instructions.
///
/// Substitution is literal and done in a single left-to-right pass over the
/// template: substituted values are never rescanned, so placeholder tokens
/// inside the user's text are kept verbatim. Nothing is escaped.
pub fn build_prompt(template: &str, text: &str, instructions: &str) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures| {
            if &caps[0] == TEXT_PLACEHOLDER {
                text.to_string()
            } else {
                instructions.to_string()
            }
        })
        .into_owned()
}
