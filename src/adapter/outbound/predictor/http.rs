//! HTTP client for a remote demand prediction model.
//!
//! The model service receives the feature vector as a JSON object and
//! answers with the predicted order count.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::DemandFeatures;
use crate::error::{Error, Result};
use crate::port::outbound::predictor::DemandPredictor;

/// Calls a prediction endpoint over HTTP.
#[derive(Debug)]
pub struct HttpPredictor {
    client: Client,
    url: String,
}

impl HttpPredictor {
    /// Create a predictor posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[derive(Deserialize)]
struct Response {
    #[serde(alias = "predictedOrders")]
    predicted_orders: f64,
}

impl Response {
    fn orders(&self) -> Result<i64> {
        let rounded = self.predicted_orders.round();
        if !rounded.is_finite() || rounded < 0.0 || rounded > i64::MAX as f64 {
            return Err(Error::Upstream(format!(
                "predictor returned unusable order count {}",
                self.predicted_orders
            )));
        }
        Ok(rounded as i64)
    }
}

#[async_trait]
impl DemandPredictor for HttpPredictor {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn predict(&self, features: &DemandFeatures) -> Result<i64> {
        let response = self
            .client
            .post(&self.url)
            .json(features)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;
        response.orders()
    }
}
