//! Scripted demand predictors.

use async_trait::async_trait;
use pantry::domain::DemandFeatures;
use pantry::error::{Error, Result};
use pantry::port::outbound::predictor::DemandPredictor;

/// Predictor that always answers with the same order count.
pub struct FixedOrders(pub i64);

#[async_trait]
impl DemandPredictor for FixedOrders {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn predict(&self, _features: &DemandFeatures) -> Result<i64> {
        Ok(self.0)
    }
}

/// Predictor that is always down.
pub struct Unreachable;

#[async_trait]
impl DemandPredictor for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn predict(&self, _features: &DemandFeatures) -> Result<i64> {
        Err(Error::Upstream("connection refused".into()))
    }
}
