//! Shared utilities for the Market Whisperer workspace
//!
//! Currently only logging setup; the client library itself never installs a
//! subscriber.

pub mod logging;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
