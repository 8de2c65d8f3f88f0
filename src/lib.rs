//! kinesis-endpoint: Kinesis endpoint configuration resolver (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod client;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod env;
pub mod models;
pub mod resolver;
pub mod verify;

pub use client::{ClientHandle, ClientRegistry, KinesisClient, RegistryMatch, StaticRegistry};
pub use endpoint::{EndpointUri, KinesisComponent, KinesisEndpoint};
pub use models::{KinesisConfiguration, Parameters};
pub use resolver::{ConfigurationResolver, ResolveError, resolve};
