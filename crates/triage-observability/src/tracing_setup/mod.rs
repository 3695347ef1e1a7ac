//! Tracing setup: structured logging, span definitions, event helpers.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

use triage_core::config::ObservabilityConfig;

/// Environment variable consulted for the log filter.
pub const LOG_ENV_VAR: &str = "TRIAGE_LOG";

/// Install the global subscriber with default observability settings.
/// Returns false if one was already installed.
pub fn init_tracing() -> bool {
    init_tracing_from_config(&ObservabilityConfig::default())
}

/// Install the global subscriber from config. `TRIAGE_LOG`, when set and
/// parseable, wins over `log_filter`.
pub fn init_tracing_from_config(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    install(filter, config.json)
}

/// Install with an explicit filter, ignoring `TRIAGE_LOG` (tests, embedding).
pub fn init_tracing_with_filter(filter: &str, json: bool) -> bool {
    install(EnvFilter::new(filter), json)
}

fn install(filter: EnvFilter, json: bool) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder
            .json()
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init()
            .is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
