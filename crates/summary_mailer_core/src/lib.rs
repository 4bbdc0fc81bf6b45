//! Shared meeting-summary mailer domain primitives.
//!
//! This crate owns the record model, notification rendering, the processing
//! error taxonomy and the response contracts. It intentionally excludes
//! HTTP clients and Lambda runtime concerns.

pub mod contract;
pub mod intake;
pub mod record;
pub mod render;
