//! # Controller
//!
//! Core controller modules for the email operator.
//!
//! - `reconciler`: Core reconciliation logic
//! - `server`: HTTP server for metrics and health checks

pub mod reconciler;
pub mod server;
