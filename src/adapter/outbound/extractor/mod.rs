//! Action extractor adapters.

pub mod llm;

pub use llm::LlmActionExtractor;
