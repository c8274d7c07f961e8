use crate::config::{LogFormat, LoggingConfig};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Later calls are no-ops.
pub fn setup_logging(config: &LoggingConfig) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match config.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
        };

        if let Err(e) = result {
            eprintln!("logging already initialised: {e}");
        }
    });
}

#[macro_export]
macro_rules! log_upstream {
    ($level:ident, $endpoint:expr, $($arg:tt)*) => {
        tracing::$level!(
            target: "upstream",
            endpoint = $endpoint,
            $($arg)*
        );
    };
}
