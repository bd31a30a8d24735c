//! Black-box conformance harness for the Lost & Found HTTP API.
//!
//! [`auth::AuthHandshake`] turns credentials into a cookie-backed
//! [`auth::Session`]; [`runner::ConformanceRunner`] drives the fixed
//! register → login → upload → create → list → get → update → delete
//! sequence and collects a [`report::RunReport`].

pub mod auth;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod report;
pub mod runner;
pub mod transport;

#[cfg(test)]
mod testing;

mod model_tests;

pub use auth::{AuthHandshake, HandshakeTrace, Session};
pub use config::HarnessConfig;
pub use error::{AuthError, CheckError, ConfigError, TransportError};
pub use report::{RunReport, Stage, TestResult};
pub use runner::ConformanceRunner;
pub use transport::{Connector, HttpConnector, Transport};
