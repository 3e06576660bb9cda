//! Application handlers.
//!
//! Command handlers that validate input and orchestrate calls through ports.

pub mod assistant;
