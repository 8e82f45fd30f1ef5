use crate::domain::errors::ApiError;
use crate::domain::types::{ModelMetric, PredictionRequest, PredictionResult};
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// One-shot connectivity probe against the service.
    async fn health(&self) -> Result<(), ApiError>;

    /// The selectable ticker universe, sorted by the service.
    async fn list_tickers(&self) -> Result<Vec<String>, ApiError>;

    /// A single BUY/HOLD/SELL decision for one (ticker, date, model) triple.
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError>;

    /// The pre-computed offline evaluation table. An empty list means no
    /// evaluation has been run yet and is not an error.
    async fn model_metrics(&self) -> Result<Vec<ModelMetric>, ApiError>;
}
