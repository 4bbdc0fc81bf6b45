//! Lambda-oriented adapters and handlers for the meeting-summary mailer.
//!
//! This crate owns runtime integration details (Lambda handlers, HTTP
//! clients for the record store, mail providers, secondary webhook and
//! summary model, configuration and logging) and exposes a single runtime
//! module boundary for the domain primitives.

pub mod adapters;
pub mod clients;
pub mod config;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
