//! Common types and utilities for the Coinwash projects.

pub mod config;
pub mod database;
pub mod error;
pub mod machine;

pub use ::anyhow;
pub use ::serde;
pub use ::serde_json;
pub use ::time;
pub use ::tokio;
pub use ::tracing;
pub use ::tracing_subscriber;
