//! Tracing initialisation and structured events.

pub mod events;

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

pub const LOG_FORMAT_ENV: &str = "LEGALEASE_LOG_FORMAT";

/// Installs the global subscriber. Filtering follows `RUST_LOG` (default
/// `info`); `LEGALEASE_LOG_FORMAT=json` switches to one JSON object per line.
/// Output goes to stderr so CLI results on stdout stay parseable.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|value| value.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let fmt_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };
    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {err}");
    }
}
