//! LLM completion port.
//!
//! Used by the action extractor and by ingredient analysis. Replies are
//! free text; [`extract_json`] finds the JSON object a prompt asked for.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Client for large language model text completion.
///
/// Implementations wrap specific providers (OpenAI, Anthropic) and handle
/// authentication and response parsing. They must be `Send + Sync` so one
/// client can serve concurrent requests.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Return the provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    ///
    /// `system` sets the assistant's instructions; `prompt` is the user turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is invalid.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Locate the JSON object in a model reply.
///
/// Accepts a fenced ```json block or falls back to the outermost braces.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the reply holds no object.
pub fn extract_json(text: &str) -> Result<&str> {
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        let end = text[start..]
            .find("```")
            .map_or(text.len(), |i| start + i);
        return Ok(text[start..end].trim());
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(Error::Parse("No JSON object found in response".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json() {
        let text = "Sure!\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(extract_json(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extracts_bare_object() {
        let text = "Here you go: {\"a\": {\"b\": 2}} thanks";
        assert_eq!(extract_json(text).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn no_object_is_parse_error() {
        assert!(matches!(extract_json("no json here"), Err(Error::Parse(_))));
        assert!(matches!(extract_json("} backwards {"), Err(Error::Parse(_))));
    }
}
