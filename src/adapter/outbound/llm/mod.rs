//! LLM adapter modules.
//!
//! Provides implementations of the [`Llm`](crate::port::outbound::llm::Llm) trait
//! for Anthropic Claude and OpenAI.

pub mod anthropic;
#[cfg(test)]
pub mod client;
pub mod openai;
