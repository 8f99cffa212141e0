//! Tracing subscriber setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When `directory` is set, a
/// daily rolling file receives the same events; the returned guard must be
/// held for the lifetime of the process or buffered lines are lost.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let json = config.format.eq_ignore_ascii_case("json");
    let (plain_layer, json_layer) = if json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "ems-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn default_directives(level: &str) -> String {
    format!("ems_server={},tower_http=debug,sqlx=warn", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives("info"), "ems_server=info,tower_http=debug,sqlx=warn");
    }
}
