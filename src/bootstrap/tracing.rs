//! Tracing configuration for file-save
//!
//! ## Behavior / 行为
//!
//! - `RUST_LOG` wins, then `[logging] filter`, then the build-profile defaults
//! - Console output goes to stderr so stdout stays free for results
//! - A non-blocking file layer writes to `[logging] log_dir`, or to the
//!   `logs` directory under the application data dir

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

use fsa_core::settings::LoggingSettings;
use fsa_platform::app_dirs::DirsAppDirsAdapter;

const LOG_FILE_NAME: &str = "file-save.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives
///
/// ## Behavior / 行为
/// - **Development**: debug for the workspace crates
/// - **Production**: info for the workspace crates, warn for everything else
/// - HTTP internals stay quiet in both
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        "warn".to_string(),
        format!("file_save={level}"),
        format!("file_save_lib={level}"),
        format!("fsa_app={level}"),
        format!("fsa_platform={level}"),
        format!("fsa_core={level}"),
        "hyper=off".to_string(),
        "reqwest=warn".to_string(),
    ]
}

fn build_env_filter(logging: &LoggingSettings) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    if let Some(configured) = logging.filter.as_deref() {
        match EnvFilter::try_new(configured) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("Ignoring invalid log filter {configured:?}: {err}"),
        }
    }
    EnvFilter::new(build_filter_directives(is_development()).join(","))
}

/// Initialize the global tracing subscriber.
///
/// Call once from `main`, after settings are loaded.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(logging: &LoggingSettings) -> anyhow::Result<()> {
    let env_filter = build_env_filter(logging);

    let stderr_writer = BoxMakeWriter::new(io::stderr);
    let file_writer = match resolve_log_dir(logging).as_deref().map(build_file_writer) {
        Some(Ok(writer)) => Some(writer),
        Some(Err(err)) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
        None => None,
    };

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// `[logging] log_dir` if set, otherwise `<data_dir>/logs`.
fn resolve_log_dir(logging: &LoggingSettings) -> Option<PathBuf> {
    logging.log_dir.clone().or_else(|| {
        DirsAppDirsAdapter::new()
            .get_app_dirs()
            .ok()
            .map(|dirs| dirs.logs_dir())
    })
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev = build_filter_directives(true);
        assert!(dev.contains(&"fsa_app=debug".to_string()));
        assert!(dev.contains(&"hyper=off".to_string()));

        let prod = build_filter_directives(false);
        assert!(prod.contains(&"fsa_app=info".to_string()));
        assert!(prod.contains(&"fsa_platform=info".to_string()));
        assert_eq!(prod[0], "warn");
    }

    #[test]
    fn test_configured_log_dir_wins() {
        let logging = LoggingSettings {
            filter: None,
            log_dir: Some(PathBuf::from("/var/log/file-save")),
        };
        assert_eq!(
            resolve_log_dir(&logging),
            Some(PathBuf::from("/var/log/file-save"))
        );
    }

    #[test]
    fn test_default_log_dir_is_under_app_data() {
        if let Some(dir) = resolve_log_dir(&LoggingSettings::default()) {
            assert!(dir.ends_with("logs"));
        }
    }

    #[test]
    fn test_build_file_writer_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");

        // the guard can only be set once per process
        let _ = build_file_writer(&logs);
        assert!(logs.is_dir());
    }
}
