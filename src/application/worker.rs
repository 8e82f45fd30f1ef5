//! Background request worker.
//!
//! Receives commands from the desk, performs the HTTP calls through the
//! `DecisionService` port and reports completions back over the event
//! channel. Each command runs in its own task so a slow request never delays
//! a newer one; the desk's generation check decides which completion wins.

use crate::application::messages::{DeskCommand, DeskEvent};
use crate::domain::ports::DecisionService;
use crate::domain::types::{ModelId, PredictionRequest};
use crossbeam_channel::Sender;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn run_worker(
    service: Arc<dyn DecisionService>,
    mut cmd_rx: mpsc::Receiver<DeskCommand>,
    event_tx: Sender<DeskEvent>,
) {
    while let Some(command) = cmd_rx.recv().await {
        let service = service.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            handle_command(service, event_tx, command).await;
        });
    }
    debug!("Command channel closed, request worker exiting.");
}

async fn handle_command(
    service: Arc<dyn DecisionService>,
    event_tx: Sender<DeskEvent>,
    command: DeskCommand,
) {
    match command {
        DeskCommand::CheckHealth => {
            let outcome = service.health().await;
            if let Err(e) = &outcome {
                warn!("Decision service unreachable: {}", e);
            }
            let _ = event_tx.send(DeskEvent::Health(outcome));
        }
        DeskCommand::LoadTickers => {
            let outcome = service.list_tickers().await;
            match &outcome {
                Ok(tickers) => info!("Loaded {} tickers.", tickers.len()),
                Err(e) => warn!("Ticker directory load failed: {}", e),
            }
            let _ = event_tx.send(DeskEvent::Tickers(outcome));
        }
        DeskCommand::LoadMetrics => {
            let outcome = service.model_metrics().await;
            if let Err(e) = &outcome {
                warn!("Model metrics load failed: {}", e);
            }
            let _ = event_tx.send(DeskEvent::Metrics(outcome));
        }
        DeskCommand::Predict {
            generation,
            request,
        } => {
            info!(
                "Requesting {} decision for {} on {}",
                request.model_name, request.ticker, request.date
            );
            let outcome = service.predict(&request).await;
            if let Err(e) = &outcome {
                warn!("Prediction failed: {}", e);
            }
            let _ = event_tx.send(DeskEvent::Prediction {
                generation,
                outcome,
            });
        }
        DeskCommand::Compare {
            generation,
            ticker,
            date,
            exclude,
        } => {
            let candidates: Vec<ModelId> = ModelId::ALL
                .into_iter()
                .filter(|model| *model != exclude)
                .collect();
            info!(
                "Comparing {} models for {} on {}",
                candidates.len(),
                ticker,
                date
            );

            // All N requests run concurrently and all settle before the
            // batch resolves; collecting afterwards keeps candidate order
            // and turns any single failure into a failure of the whole set.
            let settled = join_all(candidates.into_iter().map(|model| {
                let service = service.clone();
                let request = PredictionRequest {
                    ticker: ticker.clone(),
                    date: date.clone(),
                    model_name: model,
                };
                async move { service.predict(&request).await }
            }))
            .await;

            let outcome = settled.into_iter().collect::<Result<Vec<_>, _>>();
            if let Err(e) = &outcome {
                warn!("Comparison batch failed: {}", e);
            }
            let _ = event_tx.send(DeskEvent::Comparison {
                generation,
                outcome,
            });
        }
    }
}
