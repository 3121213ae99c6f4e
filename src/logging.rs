//! Logging infrastructure
//!
//! Design: `tracing` for structured events, installed once through a
//! `tracing-subscriber` registry:
//! - `EnvFilter` (`RUST_LOG` wins over the configured level)
//! - console output, compact or JSON
//! - optional plain file output via `tracing-appender`
//!
//! The forwarders never log. Events come from the loader, the option setter
//! and the ABI self-check, each under its own `devaarg::` target so the
//! default `devaarg=<level>` directive covers all of them.

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{Config, ConfigError};

/// Target for library loading and symbol lookup
pub(crate) const TARGET_LIBRARY: &str = "devaarg::library";
/// Target for option setter calls
pub(crate) const TARGET_SETTER: &str = "devaarg::setter";
/// Target for the variadic ABI self-check
pub(crate) const TARGET_PROBES: &str = "devaarg::probes";

static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Keeps the file writer flushing for the life of the process
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level for this crate's targets
    pub level: Level,
    /// Also write to this file
    pub log_path: Option<String>,
    /// JSON console output instead of compact text
    pub json_format: bool,
    /// Emit span enter/close events
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Verbose config for debugging a binding
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            show_spans: true,
            ..Self::default()
        }
    }

    fn directive(&self) -> String {
        format!(
            "devaarg={}",
            self.level.as_str().to_lowercase()
        )
    }
}

/// Initialize logging from `devaarg.toml` and `DEVAARG_*` overrides
///
/// Fails without installing anything when the configuration is invalid.
pub fn init() -> Result<(), ConfigError> {
    let config = Config::discover()?.with_env_overrides()?;
    init_with_config(config.logging.to_log_config());
    Ok(())
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. Later calls, and calls made
/// after another global subscriber was set, are no-ops.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let console = (!config.json_format).then(|| {
            fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_span_events(span_events.clone())
                .with_target(true)
        });

        let json = config.json_format.then(|| {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(span_events.clone())
        });

        let file = config.log_path.as_deref().and_then(|path| {
            let path = Path::new(path);
            let file_name = path.file_name()?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);

            Some(fmt::layer().with_ansi(false).with_writer(writer))
        });

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(json)
            .with(file)
            .try_init();
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}
