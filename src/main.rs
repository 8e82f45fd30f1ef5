use quantdesk::application::client::ServiceClient;
use quantdesk::application::desk::PredictionDesk;
use quantdesk::application::worker::run_worker;
use quantdesk::config::Config;
use quantdesk::domain::ports::DecisionService;
use quantdesk::infrastructure::HttpDecisionService;

use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends formatted log lines to the UI activity feed
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let line = String::from_utf8_lossy(buf).trim_end().to_string();
        if !line.is_empty() {
            let _ = self.sender.try_send(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load env (before reading any configuration)
    dotenvy::dotenv().ok();

    // 1. Logging (stdout + activity feed)
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Initializing QuantDesk...");

    let config = Config::from_env();
    info!("Decision service at {}", config.api_base_url);

    // 2. Channels between the desk and the request worker
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::channel(64);
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    // 3. Background Tokio runtime hosting the worker
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build Tokio runtime");

        rt.block_on(async move {
            info!("Background runtime started.");
            let service: Arc<dyn DecisionService> =
                Arc::new(HttpDecisionService::new(config.api_base_url));
            run_worker(service, cmd_rx, event_tx).await;
        });
    });

    // 4. Desk (enqueues the session-start loads) and UI
    let client = ServiceClient::new(cmd_tx, event_rx, log_rx);
    let desk = PredictionDesk::new(client);

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_title("QuantDesk"),
        ..Default::default()
    };

    eframe::run_native(
        "QuantDesk",
        native_options,
        Box::new(|_cc| Ok(Box::new(desk))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
