//! The resolved per-endpoint Kinesis configuration.

use serde::{Serialize, Serializer};

use super::{IteratorType, ProxyProtocol, ShardClosedStrategy};
use crate::client::ClientHandle;

/// Configuration owned by a single Kinesis endpoint.
///
/// Component-level defaults use the same type with an empty
/// `stream_name`; [`crate::resolver::resolve`] clones them per endpoint.
/// Credentials are redacted in both `Debug` and `Serialize` output.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisConfiguration {
    pub stream_name: String,
    #[serde(serialize_with = "redact")]
    pub access_key: Option<String>,
    #[serde(serialize_with = "redact")]
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub client: Option<ClientHandle>,
    pub iterator_type: IteratorType,
    pub max_results_per_request: u32,
    pub shard_id: Option<String>,
    pub sequence_number: Option<String>,
    pub shard_closed: ShardClosedStrategy,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_protocol: ProxyProtocol,
}

impl Default for KinesisConfiguration {
    fn default() -> Self {
        Self {
            stream_name: String::new(),
            access_key: None,
            secret_key: None,
            region: None,
            client: None,
            iterator_type: IteratorType::default(),
            max_results_per_request: 1,
            shard_id: None,
            sequence_number: None,
            shard_closed: ShardClosedStrategy::default(),
            proxy_host: None,
            proxy_port: None,
            proxy_protocol: ProxyProtocol::default(),
        }
    }
}

impl std::fmt::Debug for KinesisConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinesisConfiguration")
            .field("stream_name", &self.stream_name)
            .field("access_key", &self.access_key.as_ref().map(|_| "[REDACTED]"))
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("client", &self.client)
            .field("iterator_type", &self.iterator_type)
            .field("max_results_per_request", &self.max_results_per_request)
            .field("shard_id", &self.shard_id)
            .field("sequence_number", &self.sequence_number)
            .field("shard_closed", &self.shard_closed)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("proxy_protocol", &self.proxy_protocol)
            .finish()
    }
}

impl KinesisConfiguration {
    /// Both halves of the static credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }

    /// A usable client exists, either pre-built or constructible from credentials.
    pub fn is_usable(&self) -> bool {
        self.client.is_some() || self.has_credentials()
    }
}

fn redact<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => serializer.serialize_some("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}
