use crate::application::messages::{DeskCommand, DeskEvent};
use anyhow::Result;
use crossbeam_channel::Receiver;
use tokio::sync::mpsc;

/// A client interface for the background request worker.
/// Abstracts away channel management and provides a clean API for the desk.
pub struct ServiceClient {
    cmd_tx: mpsc::Sender<DeskCommand>,
    event_rx: Receiver<DeskEvent>,
    log_rx: Receiver<String>,
}

impl ServiceClient {
    pub fn new(
        cmd_tx: mpsc::Sender<DeskCommand>,
        event_rx: Receiver<DeskEvent>,
        log_rx: Receiver<String>,
    ) -> Self {
        Self {
            cmd_tx,
            event_rx,
            log_rx,
        }
    }

    /// Poll for the next available event from any channel.
    /// Non-blocking; checks channels in priority order.
    pub fn poll_next(&mut self) -> Option<DeskEvent> {
        // 1. Log lines (high volume, simple strings)
        if let Ok(line) = self.log_rx.try_recv() {
            return Some(DeskEvent::Log(line));
        }

        // 2. Request completions
        if let Ok(event) = self.event_rx.try_recv() {
            return Some(event);
        }

        None
    }

    pub fn send(&self, command: DeskCommand) -> Result<()> {
        self.cmd_tx
            .try_send(command)
            .map_err(|e| anyhow::anyhow!("Failed to queue service command: {}", e))
    }
}
