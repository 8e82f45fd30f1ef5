//! State-machine properties of the prediction desk, driven by injecting
//! completion events directly. No network, no runtime: the desk is plain
//! single-threaded state.

use quantdesk::application::client::ServiceClient;
use quantdesk::application::desk::{
    COMPARISON_FAILED_MESSAGE, PredictionDesk, VALIDATION_MESSAGE,
};
use quantdesk::application::messages::{DeskCommand, DeskEvent};
use quantdesk::application::operation::OperationState;
use quantdesk::domain::errors::ApiError;
use quantdesk::domain::types::{Decision, ModelId, PredictionResult};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

struct Harness {
    desk: PredictionDesk,
    cmd_rx: mpsc::Receiver<DeskCommand>,
    event_tx: crossbeam_channel::Sender<DeskEvent>,
    // Held so the desk polls an empty log channel, not a disconnected one.
    _log_tx: crossbeam_channel::Sender<String>,
}

impl Harness {
    fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (log_tx, log_rx) = crossbeam_channel::unbounded();

        let desk = PredictionDesk::new(ServiceClient::new(cmd_tx, event_rx, log_rx));
        let mut harness = Self {
            desk,
            cmd_rx,
            event_tx,
            _log_tx: log_tx,
        };
        harness.drain_startup_commands();
        harness
    }

    /// The desk enqueues health/tickers/metrics loads in its constructor.
    fn drain_startup_commands(&mut self) {
        for _ in 0..3 {
            self.cmd_rx
                .try_recv()
                .expect("expected a session-start command");
        }
        assert!(self.cmd_rx.try_recv().is_err());
    }

    fn next_predict_command(&mut self) -> (u64, ModelId) {
        match self.cmd_rx.try_recv().expect("expected a predict command") {
            DeskCommand::Predict {
                generation,
                request,
            } => (generation, request.model_name),
            other => panic!("expected Predict, got {:?}", other),
        }
    }

    fn next_compare_command(&mut self) -> (u64, ModelId) {
        match self.cmd_rx.try_recv().expect("expected a compare command") {
            DeskCommand::Compare {
                generation,
                exclude,
                ..
            } => (generation, exclude),
            other => panic!("expected Compare, got {:?}", other),
        }
    }

    fn deliver(&mut self, event: DeskEvent) {
        self.event_tx.send(event).unwrap();
        self.desk.pump();
    }

    fn select(&mut self, ticker: &str, date: &str, model: ModelId) {
        self.desk.selected_ticker = ticker.to_string();
        self.desk.date_input = date.to_string();
        self.desk.selected_model = model;
    }

    /// Runs a predict to completion so comparison tests start from a
    /// resolved primary result.
    fn resolve_primary(&mut self, model: ModelId) -> PredictionResult {
        self.select("AAPL", "2019-12-20", model);
        self.desk.predict();
        let (generation, _) = self.next_predict_command();
        let result = sample_result("AAPL", "2019-12-20", model, Decision::Buy);
        self.deliver(DeskEvent::Prediction {
            generation,
            outcome: Ok(result.clone()),
        });
        result
    }
}

fn sample_result(ticker: &str, date: &str, model: ModelId, decision: Decision) -> PredictionResult {
    let probabilities = BTreeMap::from([
        ("BUY".to_string(), 0.7),
        ("HOLD".to_string(), 0.2),
        ("SELL".to_string(), 0.1),
    ]);
    PredictionResult {
        ticker: ticker.to_string(),
        date: date.to_string(),
        model_name: model,
        decision,
        probabilities,
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

#[test]
fn successful_predict_resolves_primary() {
    let mut h = Harness::new();
    h.select("AAPL", "2019-12-20", ModelId::RandomForest);

    h.desk.predict();
    assert!(h.desk.prediction.busy());
    assert!(h.desk.prediction.error().is_none());

    let (generation, model) = h.next_predict_command();
    assert_eq!(model, ModelId::RandomForest);

    let result = sample_result("AAPL", "2019-12-20", model, Decision::Buy);
    h.deliver(DeskEvent::Prediction {
        generation,
        outcome: Ok(result.clone()),
    });

    assert!(!h.desk.prediction.busy());
    assert_eq!(h.desk.prediction.data(), Some(&result));
    assert!(h.desk.prediction.error().is_none());
}

#[test]
fn failed_predict_surfaces_server_message() {
    let mut h = Harness::new();
    h.select("AAPL", "2021-07-04", ModelId::Logreg);

    h.desk.predict();
    let (generation, _) = h.next_predict_command();
    h.deliver(DeskEvent::Prediction {
        generation,
        outcome: Err(ApiError::Status {
            status: 404,
            message: "No data for that ticker/date (might be a weekend/holiday).".to_string(),
        }),
    });

    assert!(!h.desk.prediction.busy());
    assert!(h.desk.prediction.data().is_none());
    let message = h.desk.prediction.error().unwrap();
    assert!(message.starts_with("HTTP 404:"));
    assert!(message.contains("weekend/holiday"));
}

#[test]
fn stale_prediction_response_is_discarded() {
    let mut h = Harness::new();
    h.select("AAPL", "2019-12-20", ModelId::RandomForest);
    h.desk.predict();
    let (gen_a, _) = h.next_predict_command();

    // Second request before the first resolves.
    h.desk.selected_model = ModelId::QuantumVqc;
    h.desk.predict();
    let (gen_b, _) = h.next_predict_command();
    assert_ne!(gen_a, gen_b);

    // B resolves first and commits.
    let result_b = sample_result("AAPL", "2019-12-20", ModelId::QuantumVqc, Decision::Sell);
    h.deliver(DeskEvent::Prediction {
        generation: gen_b,
        outcome: Ok(result_b.clone()),
    });

    // A's slow response arrives afterwards and must not overwrite B.
    let result_a = sample_result("AAPL", "2019-12-20", ModelId::RandomForest, Decision::Buy);
    h.deliver(DeskEvent::Prediction {
        generation: gen_a,
        outcome: Ok(result_a),
    });

    assert_eq!(h.desk.prediction.data(), Some(&result_b));
}

#[test]
fn validation_failure_never_reaches_transport() {
    let mut h = Harness::new();
    h.select("", "2019-12-20", ModelId::RandomForest);

    h.desk.predict();

    assert!(!h.desk.prediction.busy());
    assert_eq!(h.desk.prediction.error(), Some(VALIDATION_MESSAGE));
    assert!(h.cmd_rx.try_recv().is_err());
}

#[test]
fn validation_failure_supersedes_in_flight_request() {
    let mut h = Harness::new();
    h.select("AAPL", "2019-12-20", ModelId::RandomForest);
    h.desk.predict();
    let (gen_a, _) = h.next_predict_command();

    h.desk.selected_ticker.clear();
    h.desk.predict();
    assert_eq!(h.desk.prediction.error(), Some(VALIDATION_MESSAGE));

    // The older in-flight response may not overwrite the validation failure.
    let result = sample_result("AAPL", "2019-12-20", ModelId::RandomForest, Decision::Buy);
    h.deliver(DeskEvent::Prediction {
        generation: gen_a,
        outcome: Ok(result),
    });
    assert_eq!(h.desk.prediction.error(), Some(VALIDATION_MESSAGE));
}

#[test]
fn comparison_batch_failure_ends_session() {
    let mut h = Harness::new();
    let primary = h.resolve_primary(ModelId::RandomForest);

    h.desk
        .compare(&primary.ticker, &primary.date, primary.model_name);
    assert!(h.desk.comparing());
    assert!(h.desk.comparison.busy());

    let (generation, exclude) = h.next_compare_command();
    assert_eq!(exclude, ModelId::RandomForest);

    // One model failing fails the whole batch, however many succeeded.
    h.deliver(DeskEvent::Comparison {
        generation,
        outcome: Err(server_error()),
    });

    assert!(!h.desk.comparing());
    assert!(h.desk.comparison.data().is_none());
    assert_eq!(h.desk.comparison.error(), Some(COMPARISON_FAILED_MESSAGE));
}

#[test]
fn comparison_success_keeps_session_active() {
    let mut h = Harness::new();
    let primary = h.resolve_primary(ModelId::RandomForest);

    h.desk
        .compare(&primary.ticker, &primary.date, primary.model_name);
    let (generation, exclude) = h.next_compare_command();

    let set: Vec<PredictionResult> = ModelId::ALL
        .into_iter()
        .filter(|m| *m != exclude)
        .map(|m| sample_result("AAPL", "2019-12-20", m, Decision::Hold))
        .collect();
    h.deliver(DeskEvent::Comparison {
        generation,
        outcome: Ok(set.clone()),
    });

    assert!(h.desk.comparing());
    assert_eq!(h.desk.comparison.data(), Some(&set));
}

#[test]
fn new_predict_clears_active_comparison() {
    let mut h = Harness::new();
    let primary = h.resolve_primary(ModelId::RandomForest);
    h.desk
        .compare(&primary.ticker, &primary.date, primary.model_name);
    let (generation, _) = h.next_compare_command();
    let set: Vec<PredictionResult> = vec![sample_result(
        "AAPL",
        "2019-12-20",
        ModelId::Logreg,
        Decision::Hold,
    )];
    h.deliver(DeskEvent::Comparison {
        generation,
        outcome: Ok(set),
    });
    assert!(h.desk.comparing());

    h.desk.predict();

    assert!(!h.desk.comparing());
    assert_eq!(h.desk.comparison, OperationState::Idle);
}

#[test]
fn comparison_resolving_after_new_predict_is_discarded() {
    let mut h = Harness::new();
    let primary = h.resolve_primary(ModelId::RandomForest);
    h.desk
        .compare(&primary.ticker, &primary.date, primary.model_name);
    let (stale_generation, _) = h.next_compare_command();

    // New primary prediction invalidates the in-flight batch.
    h.desk.predict();
    let _ = h.next_predict_command();

    let set = vec![sample_result(
        "AAPL",
        "2019-12-20",
        ModelId::Logreg,
        Decision::Hold,
    )];
    h.deliver(DeskEvent::Comparison {
        generation: stale_generation,
        outcome: Ok(set),
    });

    assert!(!h.desk.comparing());
    assert_eq!(h.desk.comparison, OperationState::Idle);
}

#[test]
fn stop_comparing_is_idempotent_and_discards_late_batch() {
    let mut h = Harness::new();
    let primary = h.resolve_primary(ModelId::RandomForest);
    h.desk
        .compare(&primary.ticker, &primary.date, primary.model_name);
    let (generation, _) = h.next_compare_command();

    h.desk.stop_comparing();
    assert!(!h.desk.comparing());
    assert_eq!(h.desk.comparison, OperationState::Idle);

    h.desk.stop_comparing();
    assert!(!h.desk.comparing());
    assert_eq!(h.desk.comparison, OperationState::Idle);

    // Responses already in flight are ignored on arrival after stop.
    let set = vec![sample_result(
        "AAPL",
        "2019-12-20",
        ModelId::Logreg,
        Decision::Hold,
    )];
    h.deliver(DeskEvent::Comparison {
        generation,
        outcome: Ok(set),
    });
    assert_eq!(h.desk.comparison, OperationState::Idle);
}

#[test]
fn compare_without_primary_context_is_noop() {
    let mut h = Harness::new();

    h.desk.compare("AAPL", "2019-12-20", ModelId::RandomForest);
    assert!(!h.desk.comparing());
    assert!(h.cmd_rx.try_recv().is_err());

    let primary = h.resolve_primary(ModelId::RandomForest);
    h.desk.compare("", &primary.date, primary.model_name);
    assert!(!h.desk.comparing());
    assert!(h.cmd_rx.try_recv().is_err());
}

#[test]
fn ticker_directory_failure_leaves_empty_selection() {
    let mut h = Harness::new();

    h.deliver(DeskEvent::Tickers(Err(server_error())));

    assert!(h.desk.tickers.data().is_none());
    assert!(h.desk.tickers.error().unwrap().starts_with("HTTP 500:"));
}

#[test]
fn empty_metrics_is_a_valid_state_not_an_error() {
    let mut h = Harness::new();

    h.deliver(DeskEvent::Metrics(Ok(Vec::new())));

    assert_eq!(h.desk.metrics.data(), Some(&Vec::new()));
    assert!(h.desk.metrics.error().is_none());
}
