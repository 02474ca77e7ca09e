//! Infrastructure adapters and runtime bootstrap.

pub mod datasets;
pub mod error;
pub mod http;
pub mod telemetry;
