//! Tracing setup shared by the suite's crates and integration tests.
//!
//! [`init_logging`] wires a rolling daily log file (and optionally
//! stderr) into the global `tracing` subscriber. The first caller wins;
//! later calls are no-ops that return the already-resolved log path, so
//! test binaries and helpers can all call it unconditionally.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Encoding of emitted log events.
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Component name; becomes the log file stem and the fallback
    /// directory name.
    pub app_name: &'static str,
    /// Explicit log directory. When `None`, `DOCEX_LOG_DIR` is
    /// consulted, then `~/.local/share/<app_name>`.
    pub dir: Option<PathBuf>,
    /// Also mirror events to stderr (useful under `cargo test`).
    pub mirror_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "docex",
            dir: None,
            mirror_stderr: false,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Install the global subscriber and return the current log file path.
///
/// Idempotent: only the first call installs anything.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(existing) = RESOLVED.get() {
        return Ok(existing.clone());
    }

    let dir = log_dir(config.app_name, config.dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_name = format!("{}.log", config.app_name);
    let dated = dir
        .join(Local::now().format("%Y-%m-%d").to_string())
        .join(&file_name);

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
    let _ = GUARD.set(guard);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let installed = match (config.format, config.mirror_stderr) {
        (LogFormat::Text, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init(),
        (LogFormat::Text, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Json, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        (LogFormat::Json, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = RESOLVED.set(dated.clone());
    Ok(dated)
}

fn log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let raw = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("DOCEX_LOG_DIR").ok().map(PathBuf::from));

    match raw {
        Some(path) => expand_home(&path),
        None => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home)
                .join(".local")
                .join("share")
                .join(app_name),
            Err(_) => PathBuf::from(".").join(app_name),
        },
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix("~/")) {
        Some(rest) => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(rest),
            Err(_) => path.to_path_buf(),
        },
        None => path.to_path_buf(),
    }
}
