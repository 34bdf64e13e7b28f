//! Demand prediction port.

use async_trait::async_trait;

use crate::domain::DemandFeatures;
use crate::error::Result;

/// Opaque order-count predictor.
#[async_trait]
pub trait DemandPredictor: Send + Sync {
    /// Return the predictor name for logging.
    fn name(&self) -> &'static str;

    /// Predict the number of orders for a feature vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unreachable or its answer is
    /// unusable. Callers treat this as recoverable.
    async fn predict(&self, features: &DemandFeatures) -> Result<i64>;
}
