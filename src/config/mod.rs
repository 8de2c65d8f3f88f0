//! Configuration loading and layering.
//!
//! Handles `.kinesis-endpoint.toml` loading, environment variable
//! resolution, and turns the result into component-level endpoint defaults.

pub mod loader;

pub use loader::{
    Config, ConfigError, ConfigLayer, ConsumerConfig, ConsumerLayer, CredentialsConfig, ProxyConfig,
    ProxyLayer,
};
