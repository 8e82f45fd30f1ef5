// Desk-to-worker bridge
pub mod client;
pub mod messages;

// Presentation state and reconciliation
pub mod desk;
pub mod operation;

// Background request worker
pub mod worker;
