pub mod metrics_panel;
pub mod ui;
