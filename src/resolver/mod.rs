//! Endpoint configuration resolution.
//!
//! Merges component defaults, per-endpoint parameters and the registry's
//! client into one validated [`KinesisConfiguration`]. Defaults are never
//! modified: every call works on its own clone.

pub mod options;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{ClientRegistry, RegistryMatch};
use crate::models::{KinesisConfiguration, Parameters};

/// Errors during configuration resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("a Kinesis client or both accessKey and secretKey must be specified")]
    MissingCredentials,

    #[error("stream name must not be empty")]
    MissingStreamName,

    #[error("unsupported option: {key}")]
    UnsupportedOption { key: String },

    #[error("invalid value '{value}' for option {key}: {reason}")]
    InvalidOptionValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Resolve the configuration for one endpoint.
///
/// `params` are applied over a clone of `defaults`; credentials and region
/// left blank fall back to `defaults`; the registry's client is installed
/// only when exactly one is registered. Fails without returning any
/// partially-built configuration.
pub fn resolve<R>(
    defaults: &KinesisConfiguration,
    stream_name: &str,
    params: &Parameters,
    registry: &R,
) -> Result<KinesisConfiguration, ResolveError>
where
    R: ClientRegistry + ?Sized,
{
    let mut config = defaults.clone();
    config.stream_name = stream_name.to_string();

    apply_parameters(&mut config, params)?;

    fall_back(&mut config.access_key, &defaults.access_key);
    fall_back(&mut config.secret_key, &defaults.secret_key);
    fall_back(&mut config.region, &defaults.region);

    match registry.select() {
        RegistryMatch::Unique(client) => {
            debug!(stream = stream_name, client = client.id(), "using registered Kinesis client");
            config.client = Some(client);
        }
        RegistryMatch::Ambiguous(count) => {
            warn!(
                stream = stream_name,
                count, "multiple Kinesis clients registered; not selecting any"
            );
        }
        RegistryMatch::None => {}
    }

    validate(&config)?;
    debug!(
        stream = stream_name,
        region = config.region.as_deref().unwrap_or("-"),
        client = config.client.is_some(),
        "resolved endpoint configuration"
    );
    Ok(config)
}

/// Apply every parameter through the option schema. Unknown keys are rejected.
pub fn apply_parameters(
    config: &mut KinesisConfiguration,
    params: &Parameters,
) -> Result<(), ResolveError> {
    for (key, value) in params {
        let option = options::lookup(key).ok_or_else(|| ResolveError::UnsupportedOption {
            key: key.clone(),
        })?;
        option
            .apply(config, value)
            .map_err(|reason| ResolveError::InvalidOptionValue {
                key: key.clone(),
                value: if option.secret {
                    "[REDACTED]".to_string()
                } else {
                    display_value(value)
                },
                reason,
            })?;
    }
    Ok(())
}

/// Check the invariants a configuration must hold before an endpoint owns it.
pub fn validate(config: &KinesisConfiguration) -> Result<(), ResolveError> {
    if config.stream_name.trim().is_empty() {
        return Err(ResolveError::MissingStreamName);
    }
    if !config.is_usable() {
        return Err(ResolveError::MissingCredentials);
    }
    Ok(())
}

fn fall_back(slot: &mut Option<String>, default: &Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = default.clone().filter(|v| !v.is_empty());
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolver bound to one set of component defaults and one registry.
///
/// Defaults are shared read-only; [`ConfigurationResolver::with_defaults`]
/// produces an updated resolver without disturbing handles to the old
/// defaults.
#[derive(Clone)]
pub struct ConfigurationResolver {
    defaults: Arc<KinesisConfiguration>,
    registry: Arc<dyn ClientRegistry>,
}

impl ConfigurationResolver {
    pub fn new(defaults: KinesisConfiguration, registry: impl ClientRegistry + 'static) -> Self {
        Self {
            defaults: Arc::new(defaults),
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(
        defaults: Arc<KinesisConfiguration>,
        registry: Arc<dyn ClientRegistry>,
    ) -> Self {
        Self { defaults, registry }
    }

    pub fn defaults(&self) -> &KinesisConfiguration {
        &self.defaults
    }

    pub fn shared_defaults(&self) -> Arc<KinesisConfiguration> {
        Arc::clone(&self.defaults)
    }

    /// Edit the defaults copy-on-write.
    pub fn with_defaults(mut self, edit: impl FnOnce(&mut KinesisConfiguration)) -> Self {
        edit(Arc::make_mut(&mut self.defaults));
        self
    }

    pub fn resolve(
        &self,
        stream_name: &str,
        params: &Parameters,
    ) -> Result<KinesisConfiguration, ResolveError> {
        resolve(&self.defaults, stream_name, params, self.registry.as_ref())
    }
}

impl std::fmt::Debug for ConfigurationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationResolver")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientHandle, NamedClient, StaticRegistry};
    use crate::models::IteratorType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn no_clients() -> StaticRegistry {
        StaticRegistry::default()
    }

    #[test]
    fn credentials_from_params() {
        let defaults = KinesisConfiguration::default();
        let p = params(&[("accessKey", json!("AK")), ("secretKey", json!("SK"))]);

        let config = resolve(&defaults, "orders", &p, &no_clients()).unwrap();

        assert_eq!(
            config,
            KinesisConfiguration {
                stream_name: "orders".into(),
                access_key: Some("AK".into()),
                secret_key: Some("SK".into()),
                ..KinesisConfiguration::default()
            }
        );
    }

    #[test]
    fn registry_client_without_credentials() {
        let client = ClientHandle::new(NamedClient::new("clientX"));
        let registry = StaticRegistry::new([client.clone()]);

        let config = resolve(
            &KinesisConfiguration::default(),
            "orders",
            &Parameters::new(),
            &registry,
        )
        .unwrap();

        assert_eq!(config.client, Some(client));
        assert_eq!(config.access_key, None);
        assert_eq!(config.secret_key, None);
    }

    #[test]
    fn nothing_supplied_is_missing_credentials() {
        let err = resolve(
            &KinesisConfiguration::default(),
            "orders",
            &Parameters::new(),
            &no_clients(),
        )
        .unwrap_err();
        assert_eq!(err, ResolveError::MissingCredentials);
    }

    #[test]
    fn half_credential_pair_is_missing_credentials() {
        let p = params(&[("accessKey", json!("AK"))]);
        let defaults = KinesisConfiguration::default();
        let err = resolve(&defaults, "orders", &p, &no_clients()).unwrap_err();
        assert_eq!(err, ResolveError::MissingCredentials);
    }

    #[test]
    fn ambiguous_registry_selects_nothing() {
        let registry = StaticRegistry::new([
            ClientHandle::new(NamedClient::new("a")),
            ClientHandle::new(NamedClient::new("b")),
        ]);
        let p = params(&[("accessKey", json!("AK")), ("secretKey", json!("SK"))]);

        let config = resolve(&KinesisConfiguration::default(), "orders", &p, &registry).unwrap();
        assert_eq!(config.client, None);

        let err = resolve(
            &KinesisConfiguration::default(),
            "orders",
            &Parameters::new(),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, ResolveError::MissingCredentials);
    }

    #[test]
    fn registry_client_replaces_default_client() {
        let old = ClientHandle::new(NamedClient::new("old"));
        let new = ClientHandle::new(NamedClient::new("new"));
        let defaults = KinesisConfiguration {
            client: Some(old),
            ..KinesisConfiguration::default()
        };
        let registry = StaticRegistry::new([new.clone()]);

        let config = resolve(&defaults, "orders", &Parameters::new(), &registry).unwrap();
        assert_eq!(config.client, Some(new));
    }

    #[test]
    fn default_client_survives_empty_registry() {
        let component_client = ClientHandle::new(NamedClient::new("component"));
        let defaults = KinesisConfiguration {
            client: Some(component_client.clone()),
            ..KinesisConfiguration::default()
        };

        let config = resolve(&defaults, "orders", &Parameters::new(), &no_clients()).unwrap();
        assert_eq!(config.client, Some(component_client));
    }

    #[test]
    fn blank_params_fall_back_to_defaults() {
        let defaults = KinesisConfiguration {
            access_key: Some("DEFAULT_AK".into()),
            secret_key: Some("DEFAULT_SK".into()),
            region: Some("us-east-1".into()),
            ..KinesisConfiguration::default()
        };
        let p = params(&[("accessKey", json!("")), ("region", json!(null))]);

        let config = resolve(&defaults, "orders", &p, &no_clients()).unwrap();
        assert_eq!(config.access_key.as_deref(), Some("DEFAULT_AK"));
        assert_eq!(config.secret_key.as_deref(), Some("DEFAULT_SK"));
        assert_eq!(config.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn params_override_defaults() {
        let defaults = KinesisConfiguration {
            access_key: Some("DEFAULT_AK".into()),
            secret_key: Some("DEFAULT_SK".into()),
            region: Some("us-east-1".into()),
            ..KinesisConfiguration::default()
        };
        let p = params(&[("region", json!("eu-central-1")), ("iteratorType", json!("LATEST"))]);

        let config = resolve(&defaults, "orders", &p, &no_clients()).unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.iterator_type, IteratorType::Latest);
        assert_eq!(config.access_key.as_deref(), Some("DEFAULT_AK"));
    }

    #[test]
    fn empty_default_strings_normalize_to_none() {
        let defaults = KinesisConfiguration {
            region: Some(String::new()),
            ..KinesisConfiguration::default()
        };
        let p = params(&[("accessKey", json!("AK")), ("secretKey", json!("SK"))]);

        let config = resolve(&defaults, "orders", &p, &no_clients()).unwrap();
        assert_eq!(config.region, None);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let p = params(&[
            ("accessKey", json!("AK")),
            ("secretKey", json!("SK")),
            ("compression", json!("gzip")),
        ]);
        let defaults = KinesisConfiguration::default();
        let err = resolve(&defaults, "orders", &p, &no_clients()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedOption {
                key: "compression".into()
            }
        );
    }

    #[test]
    fn invalid_option_value_is_reported() {
        let p = params(&[("maxResultsPerRequest", json!("lots"))]);
        let defaults = KinesisConfiguration::default();
        let err = resolve(&defaults, "orders", &p, &no_clients()).unwrap_err();
        match err {
            ResolveError::InvalidOptionValue { key, value, .. } => {
                assert_eq!(key, "maxResultsPerRequest");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_secret_value_is_redacted() {
        let p = params(&[("secretKey", json!({"nested": "hunter2"}))]);
        let defaults = KinesisConfiguration::default();
        let err = resolve(&defaults, "orders", &p, &no_clients()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("[REDACTED]"));
        assert!(!message.contains("hunter2"));
    }

    #[test]
    fn empty_stream_name_is_rejected() {
        let p = params(&[("accessKey", json!("AK")), ("secretKey", json!("SK"))]);
        let err = resolve(&KinesisConfiguration::default(), "  ", &p, &no_clients()).unwrap_err();
        assert_eq!(err, ResolveError::MissingStreamName);
    }

    #[test]
    fn defaults_are_not_modified() {
        let defaults = KinesisConfiguration::default();
        let snapshot = defaults.clone();
        let p = params(&[("accessKey", json!("AK")), ("secretKey", json!("SK"))]);

        resolve(&defaults, "orders", &p, &no_clients()).unwrap();
        assert_eq!(defaults, snapshot);
    }

    #[test]
    fn resolver_with_defaults_is_copy_on_write() {
        let resolver = ConfigurationResolver::new(KinesisConfiguration::default(), no_clients());
        let before = resolver.shared_defaults();

        let updated = resolver.with_defaults(|d| {
            d.access_key = Some("AK".into());
            d.secret_key = Some("SK".into());
        });

        assert_eq!(before.access_key, None);
        assert_eq!(updated.defaults().access_key.as_deref(), Some("AK"));
        let config = updated.resolve("orders", &Parameters::new()).unwrap();
        assert_eq!(config.stream_name, "orders");
    }
}
