//! Shared types used across all modules.
//!
//! Defines the resolved endpoint configuration, the enumerated option
//! values it carries, and the untyped parameter mapping handed in by
//! callers. Other modules import from here rather than reaching into
//! each other's internals.

pub mod configuration;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use configuration::KinesisConfiguration;

/// Untyped endpoint parameters, keyed by option name.
///
/// Insertion order is preserved so errors always name the first
/// offending key the caller supplied.
pub type Parameters = IndexMap<String, serde_json::Value>;

/// Where a consumer starts reading a shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IteratorType {
    AtSequenceNumber,
    AfterSequenceNumber,
    #[default]
    TrimHorizon,
    Latest,
    AtTimestamp,
}

impl IteratorType {
    pub const NAMES: &'static [&'static str] = &[
        "AT_SEQUENCE_NUMBER",
        "AFTER_SEQUENCE_NUMBER",
        "TRIM_HORIZON",
        "LATEST",
        "AT_TIMESTAMP",
    ];

    /// Whether this iterator type needs a `sequenceNumber` to position itself.
    pub fn requires_sequence_number(self) -> bool {
        matches!(
            self,
            IteratorType::AtSequenceNumber | IteratorType::AfterSequenceNumber
        )
    }
}

impl fmt::Display for IteratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IteratorType::AtSequenceNumber => write!(f, "AT_SEQUENCE_NUMBER"),
            IteratorType::AfterSequenceNumber => write!(f, "AFTER_SEQUENCE_NUMBER"),
            IteratorType::TrimHorizon => write!(f, "TRIM_HORIZON"),
            IteratorType::Latest => write!(f, "LATEST"),
            IteratorType::AtTimestamp => write!(f, "AT_TIMESTAMP"),
        }
    }
}

impl std::str::FromStr for IteratorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AT_SEQUENCE_NUMBER" => Ok(IteratorType::AtSequenceNumber),
            "AFTER_SEQUENCE_NUMBER" => Ok(IteratorType::AfterSequenceNumber),
            "TRIM_HORIZON" => Ok(IteratorType::TrimHorizon),
            "LATEST" => Ok(IteratorType::Latest),
            "AT_TIMESTAMP" => Ok(IteratorType::AtTimestamp),
            other => Err(format!(
                "unsupported iterator type: '{other}'. Supported: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// What a consumer does when it reaches the end of a closed shard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardClosedStrategy {
    /// Log and move on.
    #[default]
    Ignore,
    /// Raise an error on the consumer.
    Fail,
    /// Move on without logging.
    Silent,
}

impl ShardClosedStrategy {
    pub const NAMES: &'static [&'static str] = &["ignore", "fail", "silent"];
}

impl fmt::Display for ShardClosedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardClosedStrategy::Ignore => write!(f, "ignore"),
            ShardClosedStrategy::Fail => write!(f, "fail"),
            ShardClosedStrategy::Silent => write!(f, "silent"),
        }
    }
}

impl std::str::FromStr for ShardClosedStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(ShardClosedStrategy::Ignore),
            "fail" => Ok(ShardClosedStrategy::Fail),
            "silent" => Ok(ShardClosedStrategy::Silent),
            other => Err(format!(
                "unsupported shard-closed strategy: '{other}'. Supported: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Protocol used to reach the configured proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyProtocol {
    Http,
    #[default]
    Https,
}

impl ProxyProtocol {
    pub const NAMES: &'static [&'static str] = &["HTTP", "HTTPS"];
}

impl fmt::Display for ProxyProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyProtocol::Http => write!(f, "HTTP"),
            ProxyProtocol::Https => write!(f, "HTTPS"),
        }
    }
}

impl std::str::FromStr for ProxyProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HTTP" => Ok(ProxyProtocol::Http),
            "HTTPS" => Ok(ProxyProtocol::Https),
            other => Err(format!(
                "unsupported proxy protocol: '{other}'. Supported: HTTP, HTTPS"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterator_type_display_matches_names() {
        let all = [
            IteratorType::AtSequenceNumber,
            IteratorType::AfterSequenceNumber,
            IteratorType::TrimHorizon,
            IteratorType::Latest,
            IteratorType::AtTimestamp,
        ];
        let rendered: Vec<String> = all.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, IteratorType::NAMES);
    }

    #[test]
    fn iterator_type_from_str_case_insensitive() {
        assert_eq!(
            "latest".parse::<IteratorType>().unwrap(),
            IteratorType::Latest
        );
        assert_eq!(
            " Trim_Horizon ".parse::<IteratorType>().unwrap(),
            IteratorType::TrimHorizon
        );
    }

    #[test]
    fn iterator_type_from_str_invalid() {
        let err = "OLDEST".parse::<IteratorType>().unwrap_err();
        assert!(err.contains("unsupported iterator type"));
        assert!(err.contains("OLDEST"));
    }

    #[test]
    fn iterator_type_sequence_requirement() {
        assert!(IteratorType::AtSequenceNumber.requires_sequence_number());
        assert!(IteratorType::AfterSequenceNumber.requires_sequence_number());
        assert!(!IteratorType::Latest.requires_sequence_number());
    }

    #[test]
    fn shard_closed_round_trips_through_str() {
        for name in ShardClosedStrategy::NAMES {
            let parsed: ShardClosedStrategy = name.parse().unwrap();
            assert_eq!(parsed.to_string(), *name);
        }
        assert!("explode".parse::<ShardClosedStrategy>().is_err());
    }

    #[test]
    fn proxy_protocol_parsing() {
        assert_eq!("http".parse::<ProxyProtocol>().unwrap(), ProxyProtocol::Http);
        assert_eq!("HTTPS".parse::<ProxyProtocol>().unwrap(), ProxyProtocol::Https);
        assert!("ftp".parse::<ProxyProtocol>().is_err());
    }

    #[test]
    fn enum_defaults() {
        assert_eq!(IteratorType::default(), IteratorType::TrimHorizon);
        assert_eq!(ShardClosedStrategy::default(), ShardClosedStrategy::Ignore);
        assert_eq!(ProxyProtocol::default(), ProxyProtocol::Https);
    }

    #[test]
    fn enums_deserialize_from_config_spelling() {
        #[derive(Deserialize)]
        struct Probe {
            iterator: IteratorType,
            closed: ShardClosedStrategy,
            protocol: ProxyProtocol,
        }
        let probe: Probe = toml::from_str(
            "iterator = \"AT_TIMESTAMP\"\nclosed = \"fail\"\nprotocol = \"HTTP\"\n",
        )
        .unwrap();
        assert_eq!(probe.iterator, IteratorType::AtTimestamp);
        assert_eq!(probe.closed, ShardClosedStrategy::Fail);
        assert_eq!(probe.protocol, ProxyProtocol::Http);
    }
}
