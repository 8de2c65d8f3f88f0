//! App-wide constants.
//!
//! Centralises the tool name, URI scheme, config paths and environment
//! variable names so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "kinesis-endpoint";

/// Crate version, as reported by `kinesis-endpoint version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// URI scheme accepted by [`crate::endpoint::EndpointUri`].
pub const URI_SCHEME: &str = "aws-kinesis";

/// Local config filename (e.g. `.kinesis-endpoint.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".kinesis-endpoint.toml";

/// Directory name under `~/.config/` for the global config.
pub const CONFIG_DIR: &str = "kinesis-endpoint";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_ACCESS_KEY: &str = "KINESIS_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "KINESIS_SECRET_KEY";
pub const ENV_REGION: &str = "KINESIS_REGION";
pub const ENV_ITERATOR_TYPE: &str = "KINESIS_ITERATOR_TYPE";

/// Standard AWS variables, consulted when the tool-specific ones are unset.
pub const ENV_AWS_ACCESS_KEY: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_AWS_SECRET_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_AWS_REGION: &str = "AWS_REGION";

/// Log filter directive for the binary (same syntax as `RUST_LOG`).
pub const ENV_LOG: &str = "KINESIS_ENDPOINT_LOG";
