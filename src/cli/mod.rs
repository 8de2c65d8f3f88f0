//! CLI command definitions, logging setup and text rendering.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use kinesis_endpoint::KinesisConfiguration;
use kinesis_endpoint::constants;
use kinesis_endpoint::resolver::options::OPTIONS;
use kinesis_endpoint::verify::VerificationResult;

/// Install the stderr log subscriber.
///
/// `KINESIS_ENDPOINT_LOG` always takes precedence; otherwise `--verbose`
/// selects DEBUG and the default is WARN.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_env(constants::ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Render a resolved configuration as aligned `key: value` lines.
pub fn render_configuration(config: &KinesisConfiguration) -> String {
    fn opt(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| "-".to_string())
    }
    fn secret(value: &Option<String>) -> String {
        value.as_ref().map_or("-", |_| "[REDACTED]").to_string()
    }

    let rows = [
        ("stream", config.stream_name.clone()),
        ("access key", secret(&config.access_key)),
        ("secret key", secret(&config.secret_key)),
        ("region", opt(&config.region)),
        (
            "client",
            config
                .client
                .as_ref()
                .map_or_else(|| "-".to_string(), |c| c.id().to_string()),
        ),
        ("iterator type", config.iterator_type.to_string()),
        ("max results", config.max_results_per_request.to_string()),
        ("shard id", opt(&config.shard_id)),
        ("sequence number", opt(&config.sequence_number)),
        ("shard closed", config.shard_closed.to_string()),
        ("proxy host", opt(&config.proxy_host)),
        (
            "proxy port",
            config.proxy_port.map_or_else(|| "-".to_string(), |p| p.to_string()),
        ),
        ("proxy protocol", config.proxy_protocol.to_string()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{:>16}  {}\n", format!("{label}:").dimmed(), value));
    }
    out
}

/// Render a verification report.
pub fn render_verification(result: &VerificationResult) -> String {
    if result.is_ok() {
        return format!("{}\n", "✓ parameters OK".green().bold());
    }
    let mut out = format!(
        "{}\n",
        format!("✗ {} problem(s) found", result.errors.len()).red().bold()
    );
    for error in &result.errors {
        out.push_str(&format!(
            "  {} {}\n",
            format!("[{}]", error.code).yellow(),
            error.description
        ));
    }
    out
}

/// Render the option schema as a table.
pub fn render_options() -> String {
    let mut out = String::new();
    for option in OPTIONS {
        out.push_str(&format!(
            "{:<22} {:<24} {}\n",
            option.name.bold(),
            option.kind.to_string(),
            option.description.dimmed()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesis_endpoint::verify::verify_parameters;
    use kinesis_endpoint::Parameters;

    #[test]
    fn configuration_render_redacts_credentials() {
        colored::control::set_override(false);
        let config = KinesisConfiguration {
            stream_name: "orders".into(),
            access_key: Some("AKIAVISIBLE".into()),
            secret_key: Some("shh".into()),
            ..KinesisConfiguration::default()
        };
        let rendered = render_configuration(&config);
        assert!(rendered.contains("orders"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("AKIAVISIBLE"));
        assert!(rendered.contains("TRIM_HORIZON"));
    }

    #[test]
    fn verification_render_lists_problems() {
        colored::control::set_override(false);
        let rendered = render_verification(&verify_parameters(&Parameters::new()));
        assert!(rendered.contains("3 problem(s) found"));
        assert!(rendered.contains("[MISSING_PARAMETER] accessKey should be set"));
    }

    #[test]
    fn options_render_lists_every_option() {
        let rendered = render_options();
        for option in OPTIONS {
            assert!(rendered.contains(option.name));
        }
    }
}
