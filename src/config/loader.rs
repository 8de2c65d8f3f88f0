//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. Endpoint URI parameters (applied later by the resolver)
//! 2. Environment variables
//! 3. An explicit `--config` file
//! 4. `.kinesis-endpoint.toml` in the working directory
//! 5. `~/.config/kinesis-endpoint/config.toml` (global defaults)
//! 6. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::env::Env;
use crate::models::{IteratorType, KinesisConfiguration, ProxyProtocol, ShardClosedStrategy};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key} in {path}: {reason}")]
    InvalidValue {
        path: PathBuf,
        key: &'static str,
        reason: String,
    },
}

/// Top-level configuration: the component-level endpoint defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialsConfig,
    pub consumer: ConsumerConfig,
    pub proxy: ProxyConfig,
}

/// Static AWS credentials and region shared by all endpoints.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key", &self.access_key.as_ref().map(|_| "[REDACTED]"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .finish()
    }
}

/// Consumer defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    pub iterator_type: IteratorType,
    pub max_results_per_request: u32,
    pub shard_closed: ShardClosedStrategy,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            iterator_type: IteratorType::default(),
            max_results_per_request: 1,
            shard_closed: ShardClosedStrategy::default(),
        }
    }
}

/// Proxy used when building clients from credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: ProxyProtocol,
}

/// A single config file as written. Only the keys it sets are `Some`, so a
/// file can override a lower layer with a value equal to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub credentials: CredentialsConfig,
    pub consumer: ConsumerLayer,
    pub proxy: ProxyLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsumerLayer {
    pub iterator_type: Option<IteratorType>,
    pub max_results_per_request: Option<u32>,
    pub shard_closed: Option<ShardClosedStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProxyLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<ProxyProtocol>,
}

impl ConfigLayer {
    fn validate(self, path: &Path) -> Result<Self, ConfigError> {
        if self.consumer.max_results_per_request == Some(0) {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                key: "consumer.max_results_per_request",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the global config, the config in `work_dir`, then `explicit`
    /// (which must exist), then applies environment variable overrides.
    pub fn load(
        work_dir: Option<&Path>,
        explicit: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 5: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 4: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 3: explicit file
        if let Some(path) = explicit {
            let chosen = Self::load_file(path)?;
            config.merge(chosen);
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a single config file without merging it into anything.
    pub fn load_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
        debug!(path = %path.display(), "loading config file");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        layer.validate(path)
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// The component-level defaults every endpoint starts from.
    pub fn component_defaults(&self) -> KinesisConfiguration {
        let mut max_results_per_request = self.consumer.max_results_per_request;
        if max_results_per_request == 0 {
            warn!("consumer.max_results_per_request is 0, using 1");
            max_results_per_request = 1;
        }
        KinesisConfiguration {
            access_key: self.credentials.access_key.clone(),
            secret_key: self.credentials.secret_key.clone(),
            region: self.credentials.region.clone(),
            iterator_type: self.consumer.iterator_type,
            max_results_per_request,
            shard_closed: self.consumer.shard_closed,
            proxy_host: self.proxy.host.clone(),
            proxy_port: self.proxy.port,
            proxy_protocol: self.proxy.protocol,
            ..KinesisConfiguration::default()
        }
    }

    /// Merge a file layer into this config; every key the layer sets wins.
    fn merge(&mut self, other: ConfigLayer) {
        // Credentials
        if other.credentials.access_key.is_some() {
            self.credentials.access_key = other.credentials.access_key;
        }
        if other.credentials.secret_key.is_some() {
            self.credentials.secret_key = other.credentials.secret_key;
        }
        if other.credentials.region.is_some() {
            self.credentials.region = other.credentials.region;
        }

        // Consumer
        if let Some(iterator_type) = other.consumer.iterator_type {
            self.consumer.iterator_type = iterator_type;
        }
        if let Some(max) = other.consumer.max_results_per_request {
            self.consumer.max_results_per_request = max;
        }
        if let Some(shard_closed) = other.consumer.shard_closed {
            self.consumer.shard_closed = shard_closed;
        }

        // Proxy
        if other.proxy.host.is_some() {
            self.proxy.host = other.proxy.host;
        }
        if other.proxy.port.is_some() {
            self.proxy.port = other.proxy.port;
        }
        if let Some(protocol) = other.proxy.protocol {
            self.proxy.protocol = protocol;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        use crate::constants::*;

        if let Some(val) = env.first_of(&[ENV_ACCESS_KEY, ENV_AWS_ACCESS_KEY]) {
            self.credentials.access_key = Some(val);
        }
        if let Some(val) = env.first_of(&[ENV_SECRET_KEY, ENV_AWS_SECRET_KEY]) {
            self.credentials.secret_key = Some(val);
        }
        if let Some(val) = env.first_of(&[ENV_REGION, ENV_AWS_REGION]) {
            self.credentials.region = Some(val);
        }
        if let Some(val) = env.var(ENV_ITERATOR_TYPE) {
            match val.parse::<IteratorType>() {
                Ok(iterator_type) => self.consumer.iterator_type = iterator_type,
                Err(_) => warn!("ignoring invalid {ENV_ITERATOR_TYPE} value: {val}"),
            }
        }
    }
}
