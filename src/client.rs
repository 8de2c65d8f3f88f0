//! Kinesis client capability and registry lookup.
//!
//! Provides the seam between configuration resolution and whatever
//! constructs real service clients. Resolution only ever needs to
//! identify and hold a client, never to call it.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A pre-built client capable of performing Kinesis stream operations.
pub trait KinesisClient: Send + Sync {
    /// Stable identifier used in diagnostics and rendered output.
    fn id(&self) -> &str;

    /// Region the client was built for, if known.
    fn region(&self) -> Option<&str> {
        None
    }
}

/// Shared, immutable reference to a registered [`KinesisClient`].
///
/// Two handles are equal when they point at the same client instance.
#[derive(Clone)]
pub struct ClientHandle(Arc<dyn KinesisClient>);

impl ClientHandle {
    pub fn new(client: impl KinesisClient + 'static) -> Self {
        Self(Arc::new(client))
    }

    pub fn from_arc(client: Arc<dyn KinesisClient>) -> Self {
        Self(client)
    }

    pub fn id(&self) -> &str {
        self.0.id()
    }

    pub fn region(&self) -> Option<&str> {
        self.0.region()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for ClientHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ClientHandle {}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClientHandle").field(&self.id()).finish()
    }
}

impl Serialize for ClientHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Outcome of asking a registry for the single Kinesis client to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryMatch {
    /// Nothing registered.
    None,
    /// Exactly one client registered.
    Unique(ClientHandle),
    /// More than one distinct client registered; none is selected.
    Ambiguous(usize),
}

impl RegistryMatch {
    /// Apply the "exactly one match wins" rule to a candidate list.
    ///
    /// Candidates are a set: the same instance registered twice counts once.
    pub fn from_candidates(candidates: Vec<ClientHandle>) -> Self {
        let mut distinct: Vec<ClientHandle> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !distinct.contains(&candidate) {
                distinct.push(candidate);
            }
        }
        match distinct.len() {
            0 => RegistryMatch::None,
            1 => RegistryMatch::Unique(distinct.remove(0)),
            n => RegistryMatch::Ambiguous(n),
        }
    }

    pub fn into_unique(self) -> Option<ClientHandle> {
        match self {
            RegistryMatch::Unique(handle) => Some(handle),
            RegistryMatch::None | RegistryMatch::Ambiguous(_) => None,
        }
    }
}

/// Discovery of pre-registered Kinesis clients.
///
/// Lookups are expected to be cheap and free of side effects; a resolver
/// may call `find_clients` once per endpoint it builds.
pub trait ClientRegistry: Send + Sync {
    /// Every registered client of the Kinesis capability.
    fn find_clients(&self) -> Vec<ClientHandle>;

    fn select(&self) -> RegistryMatch {
        RegistryMatch::from_candidates(self.find_clients())
    }
}

impl<F> ClientRegistry for F
where
    F: Fn() -> Vec<ClientHandle> + Send + Sync,
{
    fn find_clients(&self) -> Vec<ClientHandle> {
        self()
    }
}

/// In-memory registry holding a fixed list of clients.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    clients: Vec<ClientHandle>,
}

impl StaticRegistry {
    pub fn new(clients: impl IntoIterator<Item = ClientHandle>) -> Self {
        Self {
            clients: clients.into_iter().collect(),
        }
    }

    pub fn register(&mut self, client: ClientHandle) {
        self.clients.push(client);
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientRegistry for StaticRegistry {
    fn find_clients(&self) -> Vec<ClientHandle> {
        self.clients.clone()
    }
}

/// A client known only by name, for registries populated from the CLI
/// or from tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedClient {
    id: String,
    region: Option<String>,
}

impl NamedClient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

impl KinesisClient for NamedClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}
