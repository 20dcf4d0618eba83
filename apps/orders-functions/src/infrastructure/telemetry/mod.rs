//! Logging Setup
//!
//! Installs the global `tracing` subscriber for a function process.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `orders_functions=info`)
//! - `LOG_FORMAT`: `json` | `text` (default: json)
//!
//! Function logs are collected by the platform, so ANSI colouring is off.

use tracing_subscriber::EnvFilter;

use super::config::{LogFormat, TelemetrySettings};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "orders_functions=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the subscriber.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(settings: &TelemetrySettings) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(true);

    let installed = match settings.format {
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_refused() {
        let settings = TelemetrySettings::default();
        let _ = init(&settings);
        assert!(!init(&settings));
    }

    #[test]
    fn default_directive_parses() {
        assert!(DEFAULT_DIRECTIVE.parse::<tracing_subscriber::filter::Directive>().is_ok());
    }
}
