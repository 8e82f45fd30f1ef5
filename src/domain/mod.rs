// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Core prediction domain
pub mod types;
