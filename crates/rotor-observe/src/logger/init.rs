use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = build_filter(&cfg.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match cfg.format {
        LoggerFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(local_timer()),
            )
            .try_init(),
        LoggerFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_current_span(true)
                    .with_timer(local_timer()),
            )
            .try_init(),
        LoggerFormat::Journald => return install_journald(registry),
    };
    installed.map_err(init_error)?;

    tracing::debug!(target: "rotor.observe", format = ?cfg.format, level = %cfg.level, "logger installed");
    Ok(())
}

pub(crate) fn build_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|_| LoggerError::InvalidLogLevel(level.to_string()))
}

/// RFC 3339 timestamps in the local offset, UTC when it cannot be determined.
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn init_error(e: TryInitError) -> LoggerError {
    let msg = e.to_string();
    if msg.contains("global default") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::InitializationFailed(msg)
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn install_journald<S>(registry: S) -> Result<(), LoggerError>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync + 'static,
{
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?;
    registry.with(journald).try_init().map_err(init_error)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn install_journald<S>(_registry: S) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("rotor_core=debug,warn").is_ok());
    }

    #[test]
    fn filter_rejects_garbage() {
        assert!(matches!(
            build_filter("rotor_core=loud"),
            Err(LoggerError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn second_install_fails() {
        let cfg = LoggerConfig {
            use_color: false,
            ..LoggerConfig::default()
        };
        // the first call may race with other tests; only the second outcome matters
        let _ = install(&cfg);
        let json = LoggerConfig::new(LoggerFormat::Json, "debug");
        assert!(matches!(
            install(&json),
            Err(LoggerError::AlreadyInitialized) | Err(LoggerError::InitializationFailed(_))
        ));
    }

    #[test]
    fn bad_level_is_reported_before_install() {
        let cfg = LoggerConfig::new(LoggerFormat::Text, "rotor_core=loud");
        assert!(matches!(install(&cfg), Err(LoggerError::InvalidLogLevel(_))));
    }
}
