//! Option schema: the supported endpoint parameters and how each one is
//! applied to a [`KinesisConfiguration`].
//!
//! Values arrive untyped. Strings are coerced to the option's type so that
//! URI parameters (always strings) and programmatic parameters (numbers,
//! booleans) go through the same path.

use serde_json::Value;

use crate::models::{IteratorType, KinesisConfiguration, ProxyProtocol, ShardClosedStrategy};

/// Value shape an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Enum(&'static [&'static str]),
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::String => write!(f, "string"),
            OptionKind::Integer => write!(f, "integer"),
            OptionKind::Enum(values) => write!(f, "one of {}", values.join("|")),
        }
    }
}

type Apply = fn(&mut KinesisConfiguration, &Value) -> Result<(), String>;

/// A single supported endpoint option.
pub struct OptionSpec {
    /// Parameter key, as written in an endpoint URI.
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    /// Values must never appear in logs or error messages.
    pub secret: bool,
    apply: Apply,
}

impl OptionSpec {
    /// Coerce `value` and store it on `config`.
    pub fn apply(&self, config: &mut KinesisConfiguration, value: &Value) -> Result<(), String> {
        (self.apply)(config, value)
    }
}

impl std::fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("secret", &self.secret)
            .finish()
    }
}

/// Every option an endpoint accepts.
pub static OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "accessKey",
        description: "Amazon AWS access key",
        kind: OptionKind::String,
        secret: true,
        apply: |config, value| {
            config.access_key = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "secretKey",
        description: "Amazon AWS secret key",
        kind: OptionKind::String,
        secret: true,
        apply: |config, value| {
            config.secret_key = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "region",
        description: "AWS region the Kinesis client connects to",
        kind: OptionKind::String,
        secret: false,
        apply: |config, value| {
            config.region = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "iteratorType",
        description: "Where to start reading a shard",
        kind: OptionKind::Enum(IteratorType::NAMES),
        secret: false,
        apply: |config, value| {
            if let Some(v) = parsed(value)? {
                config.iterator_type = v;
            }
            Ok(())
        },
    },
    OptionSpec {
        name: "maxResultsPerRequest",
        description: "Maximum number of records fetched per request",
        kind: OptionKind::Integer,
        secret: false,
        apply: |config, value| {
            if let Some(max) = integer::<u32>(value)? {
                if max == 0 {
                    return Err("must be at least 1".to_string());
                }
                config.max_results_per_request = max;
            }
            Ok(())
        },
    },
    OptionSpec {
        name: "shardId",
        description: "Shard to consume from",
        kind: OptionKind::String,
        secret: false,
        apply: |config, value| {
            config.shard_id = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "sequenceNumber",
        description: "Sequence number used by the AT/AFTER_SEQUENCE_NUMBER iterator types",
        kind: OptionKind::String,
        secret: false,
        apply: |config, value| {
            config.sequence_number = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "shardClosed",
        description: "Behaviour when a closed shard is reached",
        kind: OptionKind::Enum(ShardClosedStrategy::NAMES),
        secret: false,
        apply: |config, value| {
            if let Some(v) = parsed(value)? {
                config.shard_closed = v;
            }
            Ok(())
        },
    },
    OptionSpec {
        name: "proxyHost",
        description: "Proxy host used when building the client",
        kind: OptionKind::String,
        secret: false,
        apply: |config, value| {
            config.proxy_host = string(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "proxyPort",
        description: "Proxy port used when building the client",
        kind: OptionKind::Integer,
        secret: false,
        apply: |config, value| {
            config.proxy_port = integer::<u16>(value)?;
            Ok(())
        },
    },
    OptionSpec {
        name: "proxyProtocol",
        description: "Protocol used to reach the proxy",
        kind: OptionKind::Enum(ProxyProtocol::NAMES),
        secret: false,
        apply: |config, value| {
            if let Some(v) = parsed(value)? {
                config.proxy_protocol = v;
            }
            Ok(())
        },
    },
];

/// Look up an option by its exact (case-sensitive) parameter name.
pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|option| option.name == name)
}

/// Coerce to an optional string. `null` means "not set".
fn string(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err("expected a string".to_string()),
    }
}

/// Coerce to an optional unsigned integer; blank strings mean "not set".
fn integer<T>(value: &Value) -> Result<Option<T>, String>
where
    T: TryFrom<u64>,
{
    let raw = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| "expected a non-negative integer".to_string())?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| "expected a non-negative integer".to_string())?,
        _ => return Err("expected a non-negative integer".to_string()),
    };
    T::try_from(raw)
        .map(Some)
        .map_err(|_| format!("{raw} is out of range"))
}

/// Coerce via `FromStr`; blank strings mean "not set".
fn parsed<T>(value: &Value) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    match string(value)? {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn applied(name: &str, value: Value) -> Result<KinesisConfiguration, String> {
        let mut config = KinesisConfiguration::default();
        lookup(name)
            .expect("known option")
            .apply(&mut config, &value)?;
        Ok(config)
    }

    #[test]
    fn option_names_are_unique() {
        let mut names: Vec<&str> = OPTIONS.iter().map(|o| o.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OPTIONS.len());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("accessKey").is_some());
        assert!(lookup("accesskey").is_none());
        assert!(lookup("bogus").is_none());
    }

    #[test]
    fn only_credentials_are_secret() {
        let secrets: Vec<&str> = OPTIONS
            .iter()
            .filter(|o| o.secret)
            .map(|o| o.name)
            .collect();
        assert_eq!(secrets, vec!["accessKey", "secretKey"]);
    }

    #[test]
    fn string_options_accept_scalars() {
        let config = applied("region", json!("eu-west-1")).unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(applied("shardId", json!(7)).unwrap().shard_id.as_deref(), Some("7"));
        assert_eq!(applied("region", Value::Null).unwrap().region, None);
        assert!(applied("region", json!(["a"])).is_err());
    }

    #[test]
    fn integer_options_coerce_strings_and_numbers() {
        let from_string = applied("maxResultsPerRequest", json!("25")).unwrap();
        assert_eq!(from_string.max_results_per_request, 25);
        let from_number = applied("maxResultsPerRequest", json!(5)).unwrap();
        assert_eq!(from_number.max_results_per_request, 5);
        assert_eq!(applied("proxyPort", json!("3128")).unwrap().proxy_port, Some(3128));
    }

    #[test]
    fn integer_options_reject_bad_values() {
        assert!(applied("maxResultsPerRequest", json!("ten")).is_err());
        assert!(applied("maxResultsPerRequest", json!(-1)).is_err());
        assert!(applied("maxResultsPerRequest", json!(0)).unwrap_err().contains("at least 1"));
        assert!(applied("proxyPort", json!(70000)).unwrap_err().contains("out of range"));
        assert!(applied("proxyPort", json!(true)).is_err());
    }

    #[test]
    fn blank_integer_keeps_default() {
        let config = applied("maxResultsPerRequest", json!("")).unwrap();
        assert_eq!(config.max_results_per_request, 1);
    }

    #[test]
    fn enum_options_parse() {
        let iterator = applied("iteratorType", json!("LATEST")).unwrap();
        assert_eq!(iterator.iterator_type, IteratorType::Latest);
        let shard_closed = applied("shardClosed", json!("fail")).unwrap();
        assert_eq!(shard_closed.shard_closed, ShardClosedStrategy::Fail);
        let protocol = applied("proxyProtocol", json!("http")).unwrap();
        assert_eq!(protocol.proxy_protocol, ProxyProtocol::Http);
        assert!(applied("iteratorType", json!("NOPE")).unwrap_err().contains("NOPE"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(OptionKind::Integer.to_string(), "integer");
        assert_eq!(OptionKind::Enum(&["a", "b"]).to_string(), "one of a|b");
    }
}
