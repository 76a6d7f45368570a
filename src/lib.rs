//! Email Operator Library
//!
//! Core functionality of the email operator: the `EmailSenderConfig` and
//! `Email` resources, their reconcilers and the provider dispatch layer.
//! Tests live next to the code they cover.
//!
//! ## Quick Start
//!
//! ```rust
//! use email_operator::prelude::*;
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
