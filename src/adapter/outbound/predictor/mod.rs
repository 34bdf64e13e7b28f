//! Demand predictor adapters.

pub mod http;

pub use http::HttpPredictor;
