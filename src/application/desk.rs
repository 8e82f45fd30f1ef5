use crate::application::client::ServiceClient;
use crate::application::messages::{DeskCommand, DeskEvent};
use crate::application::operation::OperationState;
use crate::domain::types::{ModelId, ModelMetric, PredictionRequest, PredictionResult};
use tracing::debug;

pub const VALIDATION_MESSAGE: &str =
    "Please select a valid ticker and date before requesting a decision.";
pub const COMPARISON_FAILED_MESSAGE: &str =
    "Comparison failed. One or more models did not return a decision.";

/// Reachability of the decision service, probed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Connecting,
    Online,
    Offline,
}

/// The prediction desk: every piece of state the rendering layer reads.
///
/// All mutation happens on the UI thread, either in a user input handler or
/// in `apply` while pumping completion events, so no reader ever observes a
/// half-updated desk. Prediction and comparison each keep a generation
/// counter; a completion commits only if its captured generation is still
/// current, so a slow, superseded response can never overwrite a newer one.
pub struct PredictionDesk {
    client: ServiceClient,

    // Selection inputs
    pub selected_ticker: String,
    pub date_input: String,
    pub selected_model: ModelId,

    // Operation slots
    pub tickers: OperationState<Vec<String>>,
    pub prediction: OperationState<PredictionResult>,
    pub comparison: OperationState<Vec<PredictionResult>>,
    pub metrics: OperationState<Vec<ModelMetric>>,
    pub service_status: ServiceStatus,

    // Activity feed (log lines from the tracing bridge)
    pub activity: Vec<String>,

    predict_generation: u64,
    compare_generation: u64,
}

impl PredictionDesk {
    /// Builds the desk and enqueues the one-shot session-start loads.
    pub fn new(client: ServiceClient) -> Self {
        let mut desk = Self {
            client,
            selected_ticker: String::new(),
            date_input: "2019-12-20".to_string(),
            selected_model: ModelId::RandomForest,
            tickers: OperationState::Idle,
            prediction: OperationState::Idle,
            comparison: OperationState::Idle,
            metrics: OperationState::Idle,
            service_status: ServiceStatus::Connecting,
            activity: Vec::new(),
            predict_generation: 0,
            compare_generation: 0,
        };

        let _ = desk.client.send(DeskCommand::CheckHealth);
        desk.tickers = OperationState::Pending;
        let _ = desk.client.send(DeskCommand::LoadTickers);
        desk.metrics = OperationState::Pending;
        let _ = desk.client.send(DeskCommand::LoadMetrics);

        desk
    }

    /// Request a decision for the current (ticker, date, model) selection.
    ///
    /// Starting a new primary prediction always ends any comparison session
    /// first, and supersedes tracking of any in-flight prediction. An empty
    /// ticker or date fails immediately without touching the network.
    pub fn predict(&mut self) {
        self.compare_generation += 1;
        self.comparison = OperationState::Idle;
        self.predict_generation += 1;

        if self.selected_ticker.is_empty() || self.date_input.is_empty() {
            self.prediction = OperationState::Failed(VALIDATION_MESSAGE.to_string());
            return;
        }

        let request = PredictionRequest {
            ticker: self.selected_ticker.clone(),
            date: self.date_input.clone(),
            model_name: self.selected_model,
        };

        self.prediction = OperationState::Pending;
        if let Err(e) = self.client.send(DeskCommand::Predict {
            generation: self.predict_generation,
            request,
        }) {
            self.prediction = OperationState::Failed(e.to_string());
        }
    }

    /// Start a comparison session: one request per model other than
    /// `exclude`, for the primary result's ticker and date, as an atomic
    /// all-or-nothing batch. A missing primary context means there is
    /// nothing to compare, so this is a no-op until a primary result exists.
    pub fn compare(&mut self, ticker: &str, date: &str, exclude: ModelId) {
        if ticker.is_empty() || date.is_empty() || self.prediction.data().is_none() {
            return;
        }

        self.compare_generation += 1;
        self.comparison = OperationState::Pending;
        if let Err(e) = self.client.send(DeskCommand::Compare {
            generation: self.compare_generation,
            ticker: ticker.to_string(),
            date: date.to_string(),
            exclude,
        }) {
            debug!("Comparison dispatch failed: {}", e);
            self.comparison = OperationState::Failed(COMPARISON_FAILED_MESSAGE.to_string());
        }
    }

    /// End the comparison session. Outstanding requests are not aborted;
    /// bumping the generation guarantees their responses are discarded on
    /// arrival. Idempotent.
    pub fn stop_comparing(&mut self) {
        self.compare_generation += 1;
        self.comparison = OperationState::Idle;
    }

    /// A comparison session is active while the batch is in flight or its
    /// result set is on display.
    pub fn comparing(&self) -> bool {
        matches!(
            self.comparison,
            OperationState::Pending | OperationState::Resolved(_)
        )
    }

    /// Drain pending completions and log lines. Called once per frame.
    pub fn pump(&mut self) {
        while let Some(event) = self.client.poll_next() {
            self.apply(event);
        }

        // Keep the feed manageable
        if self.activity.len() > 1000 {
            self.activity.drain(0..100);
        }
    }

    /// Apply one completion event. Superseded prediction and comparison
    /// responses are silently discarded here.
    pub fn apply(&mut self, event: DeskEvent) {
        match event {
            DeskEvent::Log(line) => {
                self.activity.push(line);
            }
            DeskEvent::Health(outcome) => {
                self.service_status = match outcome {
                    Ok(()) => ServiceStatus::Online,
                    Err(_) => ServiceStatus::Offline,
                };
            }
            DeskEvent::Tickers(outcome) => {
                self.tickers = match outcome {
                    Ok(tickers) => OperationState::Resolved(tickers),
                    Err(e) => OperationState::Failed(e.to_string()),
                };
            }
            DeskEvent::Metrics(outcome) => {
                self.metrics = match outcome {
                    Ok(metrics) => OperationState::Resolved(metrics),
                    Err(e) => OperationState::Failed(e.to_string()),
                };
            }
            DeskEvent::Prediction {
                generation,
                outcome,
            } => {
                if generation != self.predict_generation {
                    debug!(
                        "Discarding superseded prediction response (generation {} != {})",
                        generation, self.predict_generation
                    );
                    return;
                }
                self.prediction = match outcome {
                    Ok(result) => OperationState::Resolved(result),
                    Err(e) => OperationState::Failed(e.to_string()),
                };
            }
            DeskEvent::Comparison {
                generation,
                outcome,
            } => {
                if generation != self.compare_generation {
                    debug!(
                        "Discarding superseded comparison batch (generation {} != {})",
                        generation, self.compare_generation
                    );
                    return;
                }
                self.comparison = match outcome {
                    Ok(set) => OperationState::Resolved(set),
                    // The batch fails as a whole; the cause is logged by the
                    // worker, the user sees one generic message.
                    Err(_) => OperationState::Failed(COMPARISON_FAILED_MESSAGE.to_string()),
                };
            }
        }
    }
}
