//! # Runtime
//!
//! Operator runtime: initialization, the controller watch loop and the error policy.

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, InitializationResult};
pub use watch_loop::run_controllers;
