//! Outbound adapters (driven side).

pub mod extractor;
pub mod llm;
pub mod predictor;
pub mod sqlite;
