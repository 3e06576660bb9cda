//! Assistant Proxy - HTTP front for the OpenAI Assistants API
//!
//! This crate hides the upstream API key from clients, relays thread, message
//! and run calls, and resolves asynchronous runs to their assistant reply by
//! polling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
