//! Test doubles for LLM-backed code.

/// Mock LLM for testing.
#[cfg(test)]
pub mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::{Error, Result};
    use crate::port::outbound::llm::Llm;

    /// Returns a canned reply and remembers the last prompt.
    pub struct MockLlm {
        response: Option<String>,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockLlm {
        pub fn new(response: impl Into<String>) -> Self {
            Self {
                response: Some(response.into()),
                last_prompt: Mutex::new(None),
            }
        }

        /// A mock whose every call fails with a connection error.
        pub fn failing() -> Self {
            Self {
                response: None,
                last_prompt: Mutex::new(None),
            }
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Llm for MockLlm {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.response
                .clone()
                .ok_or_else(|| Error::Connection("mock LLM unavailable".into()))
        }
    }
}

#[cfg(test)]
mod internal_tests {
    use super::tests::MockLlm;
    use crate::port::outbound::llm::Llm;

    #[tokio::test]
    async fn mock_llm_returns_response() {
        let llm = MockLlm::new(r#"{"actions": []}"#);
        let result = llm.complete("system", "test").await.unwrap();
        assert_eq!(result, r#"{"actions": []}"#);
        assert_eq!(llm.last_prompt().as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        assert!(MockLlm::failing().complete("", "test").await.is_err());
    }
}
