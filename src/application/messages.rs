use crate::domain::errors::ApiError;
use crate::domain::types::{ModelId, ModelMetric, PredictionRequest, PredictionResult};

/// Work orders from the desk to the request worker. Prediction and
/// comparison commands carry the generation captured at dispatch time; the
/// matching event echoes it back so the desk can discard superseded
/// responses.
#[derive(Debug)]
pub enum DeskCommand {
    CheckHealth,
    LoadTickers,
    LoadMetrics,
    Predict {
        generation: u64,
        request: PredictionRequest,
    },
    Compare {
        generation: u64,
        ticker: String,
        date: String,
        exclude: ModelId,
    },
}

/// Completions delivered back to the desk, plus log lines destined for the
/// activity feed. All variants are applied on the UI thread, one at a time.
#[derive(Debug)]
pub enum DeskEvent {
    Log(String),
    Health(Result<(), ApiError>),
    Tickers(Result<Vec<String>, ApiError>),
    Metrics(Result<Vec<ModelMetric>, ApiError>),
    Prediction {
        generation: u64,
        outcome: Result<PredictionResult, ApiError>,
    },
    Comparison {
        generation: u64,
        outcome: Result<Vec<PredictionResult>, ApiError>,
    },
}
