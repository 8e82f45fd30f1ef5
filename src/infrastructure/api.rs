//! HTTP implementation of the decision-service port.

use crate::domain::errors::ApiError;
use crate::domain::ports::DecisionService;
use crate::domain::types::{ModelMetric, ModelMetricsResponse, PredictionRequest, PredictionResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the remote decision service. One attempt per call: failures
/// are surfaced to the caller, never retried or masked.
pub struct HttpDecisionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDecisionService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Normalize a response: non-2xx becomes `ApiError::Status` carrying the
    /// body text (or the reason phrase when the body is empty); a 2xx body
    /// that does not decode is `ApiError::Malformed`.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed {
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl DecisionService for HttpDecisionService {
    async fn health(&self) -> Result<(), ApiError> {
        let _body: serde_json::Value = self.get_json("/api/health").await?;
        Ok(())
    }

    async fn list_tickers(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/api/tickers").await
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        let url = format!("{}/api/predict", self.base_url);
        debug!("POST {} ({} {} {})", url, request.ticker, request.date, request.model_name);
        let response = self.client.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn model_metrics(&self) -> Result<Vec<ModelMetric>, ApiError> {
        let envelope: ModelMetricsResponse = self.get_json("/api/model-metrics").await?;
        Ok(envelope.metrics)
    }
}
