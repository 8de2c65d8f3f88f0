//! Endpoint URIs, the Kinesis component, and the endpoints it builds.
//!
//! An endpoint URI has the form `aws-kinesis:<stream>?key=value&...`
//! (`aws-kinesis://<stream>?...` is accepted too). The query becomes the
//! untyped [`Parameters`] handed to the resolver; wrapping a value in
//! `RAW(...)` keeps it byte-for-byte, which matters for secret keys that
//! contain `+` or `%`.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::form_urlencoded;

use crate::client::ClientRegistry;
use crate::config::Config;
use crate::constants::URI_SCHEME;
use crate::models::{KinesisConfiguration, Parameters};
use crate::resolver::{ConfigurationResolver, ResolveError};

/// Errors while parsing an endpoint URI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("endpoint URI '{0}' is missing the scheme delimiter")]
    MissingScheme(String),

    #[error("unsupported endpoint scheme '{found}', expected '{expected}'")]
    WrongScheme { expected: String, found: String },

    #[error("parameter '{0}' is given more than once")]
    DuplicateParameter(String),
}

/// Errors while building an endpoint.
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("invalid endpoint URI: {0}")]
    Uri(#[from] UriError),

    #[error("invalid endpoint configuration: {0}")]
    Resolve(#[from] ResolveError),
}

/// A parsed `aws-kinesis:` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointUri {
    pub stream_name: String,
    pub parameters: Parameters,
    pub original: String,
}

impl EndpointUri {
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let (scheme, rest) = uri
            .split_once(':')
            .ok_or_else(|| UriError::MissingScheme(uri.to_string()))?;
        if !scheme.eq_ignore_ascii_case(URI_SCHEME) {
            return Err(UriError::WrongScheme {
                expected: URI_SCHEME.to_string(),
                found: scheme.to_string(),
            });
        }

        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        // A path `+` is literal; only query values use form encoding.
        let stream_name = decode(&path.trim_matches('/').replace('+', "%2B"));

        let mut parameters = Parameters::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = decode_pair(pair);
            if parameters.contains_key(&key) {
                return Err(UriError::DuplicateParameter(key));
            }
            parameters.insert(key, Value::String(value));
        }

        Ok(Self {
            stream_name,
            parameters,
            original: uri.to_string(),
        })
    }
}

fn decode_pair(pair: &str) -> (String, String) {
    let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
    let key = decode(raw_key);
    let value = match raw_value
        .strip_prefix("RAW(")
        .and_then(|v| v.strip_suffix(')'))
    {
        Some(literal) => literal.to_string(),
        None => decode(raw_value),
    };
    (key, value)
}

fn decode(component: &str) -> String {
    form_urlencoded::parse(format!("v={component}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Builds Kinesis endpoints from URIs against shared component defaults.
#[derive(Debug, Clone)]
pub struct KinesisComponent {
    resolver: ConfigurationResolver,
}

impl KinesisComponent {
    pub fn new(defaults: KinesisConfiguration, registry: impl ClientRegistry + 'static) -> Self {
        Self {
            resolver: ConfigurationResolver::new(defaults, registry),
        }
    }

    /// Component whose defaults come from a loaded [`Config`].
    pub fn from_config(config: &Config, registry: Arc<dyn ClientRegistry>) -> Self {
        Self {
            resolver: ConfigurationResolver::from_shared(
                Arc::new(config.component_defaults()),
                registry,
            ),
        }
    }

    pub fn defaults(&self) -> &KinesisConfiguration {
        self.resolver.defaults()
    }

    pub fn with_access_key(self, access_key: impl Into<String>) -> Self {
        let access_key = access_key.into();
        self.edit_defaults(|d| d.access_key = Some(access_key))
    }

    pub fn with_secret_key(self, secret_key: impl Into<String>) -> Self {
        let secret_key = secret_key.into();
        self.edit_defaults(|d| d.secret_key = Some(secret_key))
    }

    pub fn with_region(self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.edit_defaults(|d| d.region = Some(region))
    }

    fn edit_defaults(self, edit: impl FnOnce(&mut KinesisConfiguration)) -> Self {
        Self {
            resolver: self.resolver.with_defaults(edit),
        }
    }

    /// Parse `uri` and resolve the endpoint's configuration.
    pub fn create_endpoint(&self, uri: &str) -> Result<KinesisEndpoint, EndpointError> {
        let parsed = EndpointUri::parse(uri)?;
        debug!(
            stream = parsed.stream_name.as_str(),
            parameters = parsed.parameters.len(),
            "creating Kinesis endpoint"
        );
        let configuration = self
            .resolver
            .resolve(&parsed.stream_name, &parsed.parameters)?;
        Ok(KinesisEndpoint {
            uri: parsed.original,
            configuration,
        })
    }
}

/// An endpoint and the configuration it exclusively owns.
#[derive(Debug)]
pub struct KinesisEndpoint {
    uri: String,
    configuration: KinesisConfiguration,
}

impl KinesisEndpoint {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn configuration(&self) -> &KinesisConfiguration {
        &self.configuration
    }

    pub fn into_configuration(self) -> KinesisConfiguration {
        self.configuration
    }
}
