//! Tracing initialization for the command-line binary.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Env var holding a filter directive, e.g. `RECESSION_SIM_LOG=recession_sim=debug`.
pub const LOG_ENV_VAR: &str = "RECESSION_SIM_LOG";

static INIT: Once = Once::new();

/// Default filter for a CLI verbosity level.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "recession_sim=warn",
        1 => "recession_sim=info",
        _ => "recession_sim=debug",
    }
}

/// Install the global subscriber. Later calls are no-ops.
///
/// `RECESSION_SIM_LOG` wins over `verbosity` when it holds a valid filter.
/// Output goes to stderr so reports on stdout stay machine-readable.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbosity >= 2),
            )
            .with(filter)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "recession_sim=warn");
        assert_eq!(default_directive(1), "recession_sim=info");
        assert_eq!(default_directive(2), "recession_sim=debug");
        assert_eq!(default_directive(9), "recession_sim=debug");
    }
}
