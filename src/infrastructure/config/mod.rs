//! Infrastructure configuration modules.

pub mod analytics;
pub mod assistant;
pub mod llm;
pub mod logging;
pub mod predictor;
pub mod settings;

pub use settings::Config;
