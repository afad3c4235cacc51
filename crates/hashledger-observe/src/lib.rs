//! # Hashledger Observe - Observability Layer
//!
//! Structured logging setup and span helpers shared by the binary and the
//! dispatch layer.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};
