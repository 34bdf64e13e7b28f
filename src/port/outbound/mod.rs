//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the ledger and
//! demand stores, LLM completion, action extraction and demand prediction.

pub mod demand;
pub mod extractor;
pub mod ledger;
pub mod llm;
pub mod predictor;
