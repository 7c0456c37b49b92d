//! Support code for the live integration tests.
//!
//! The tests need a deployed document-explorer instance and a running
//! WebDriver server, so each one starts by asking [`live_session`] for
//! a context and returns early when none is configured. Pointing the
//! suite at a deployment is one file away:
//!
//! ```text
//! DOCEX_CONFIG=docex.yaml cargo test -p docex-e2e
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use docex_common::observability::{LogConfig, LogFormat};
use docex_config::{ExplorerConfig, ExplorerConfigLoader};
use docex_driver::ExplorerSession;
use docex_flows::{Collections, Documents};
use tracing::info;

static TRACING: OnceLock<std::path::PathBuf> = OnceLock::new();

/// Route test logs to the shared rolling file and mirror them to
/// stderr. Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = TRACING.get_or_init(|| {
        let format = if std::env::var("DOCEX_LOG_FORMAT")
            .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false)
        {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        let config = LogConfig {
            app_name: "docex-e2e",
            mirror_stderr: true,
            format,
            default_filter: "debug",
            ..LogConfig::default()
        };
        docex_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// A logged-in browser session plus the configuration that built it.
pub struct LiveContext {
    pub session: ExplorerSession,
    pub config: ExplorerConfig,
}

impl LiveContext {
    pub fn collections(&self) -> Collections<'_> {
        Collections::new(&self.session, self.config.timeouts)
    }

    pub fn documents(&self) -> Documents<'_> {
        Documents::new(&self.session, self.config.timeouts)
    }

    /// Absolute path for a fixture; the file input needs one.
    pub fn fixture_path(&self, relative: &Path) -> PathBuf {
        std::fs::canonicalize(relative).unwrap_or_else(|_| relative.to_path_buf())
    }

    /// End the browser session. Called at the end of each test; a test
    /// that fails an assertion leaves the session to the WebDriver
    /// server's own cleanup.
    pub async fn close(self) {
        if let Err(err) = self.session.close().await {
            info!(target: "docex.e2e", error = %err, "session close failed");
        }
    }
}

/// Build a logged-in session from the configured deployment.
///
/// Returns `Ok(None)` (and says so on stderr) when no configuration
/// file exists, which is how the suite skips itself on machines
/// without a target deployment. A configuration that exists but is
/// broken, or a WebDriver server that cannot be reached, is an error:
/// the suite was asked to run and cannot.
pub async fn live_session() -> anyhow::Result<Option<LiveContext>> {
    init_test_tracing();

    let path = std::env::var("DOCEX_CONFIG").unwrap_or_else(|_| "docex.yaml".to_string());
    if !Path::new(&path).exists() {
        eprintln!("skipping live test: no config at {path} (set DOCEX_CONFIG to point at one)");
        return Ok(None);
    }

    let config = ExplorerConfigLoader::new()
        .with_file(&path)
        .load()
        .with_context(|| format!("loading explorer configuration from {path}"))?;
    config.validate().context("explorer configuration is unusable")?;

    let session = ExplorerSession::connect(&config.browser)
        .await
        .context("connecting to the webdriver server")?;
    session
        .login(&config.explorer_url(), &config.username, &config.password)
        .await
        .context("logging in to the document explorer")?;

    info!(target: "docex.e2e", base_url = %config.base_url, "live session ready");
    Ok(Some(LiveContext { session, config }))
}
