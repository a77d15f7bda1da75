//! Tracing subscriber setup.

use anyhow::{Context, Result, anyhow};
use platewatch_core::config::LoggingConfig;
use platewatch_infrastructure::{PlateWatchPaths, ServiceType};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; drop it last.
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then the config file.
/// With file logging on, output goes to a daily-rolling file in the logs
/// directory so it does not interleave with the REPL. The directory is only
/// resolved in that case.
pub fn init(
    config: &LoggingConfig,
    level_override: Option<&str>,
    paths: &PlateWatchPaths,
) -> Result<LoggingGuard> {
    let filter = build_filter(config, level_override)?;

    if !config.file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("Failed to install logger: {}", e))?;
        return Ok(LoggingGuard { _worker: None });
    }

    let logs_dir = paths.get_path(ServiceType::Logs)?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {:?}", logs_dir))?;
    let appender = tracing_appender::rolling::daily(&logs_dir, "platewatch.log");
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    Ok(LoggingGuard {
        _worker: Some(worker),
    })
}

fn build_filter(config: &LoggingConfig, level_override: Option<&str>) -> Result<EnvFilter> {
    match level_override {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))
        }
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .with_context(|| format!("Invalid log level '{}' in config", config.level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = LoggingConfig::default();
        let filter = build_filter(&config, Some("debug")).unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let config = LoggingConfig::default();
        assert!(build_filter(&config, Some("platewatch=loud")).is_err());
    }
}
