//! Typed configuration for the document-explorer suite.
//!
//! Settings come from a YAML file (`docex.yaml` by convention) merged
//! with `DOCEX_`-prefixed environment variables, and `${VAR}`
//! placeholders inside values are expanded recursively so credentials
//! can stay out of the file:
//!
//! ```yaml
//! base_url: "https://paperwork.example.com"
//! username: "qa-bot"
//! password: "${DOCEX_PASSWORD}"
//! browser:
//!   kind: firefox
//!   headless: true
//! ```
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;

const MAX_ENV_EXPANSION_PASSES: usize = 8;

/// Everything the suite needs to reach a live deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    /// Root URL of the target application, without a trailing path.
    pub base_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub fixtures: Fixtures,
}

impl ExplorerConfig {
    /// URL of the document-explorer area the login lands on.
    pub fn explorer_url(&self) -> String {
        format!("{}/document-explorer", self.base_url.trim_end_matches('/'))
    }

    /// Reject configurations that cannot possibly work before a browser
    /// session is spent on them.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        url::Url::parse(&self.base_url).map_err(|source| ConfigValidationError::BadBaseUrl {
            value: self.base_url.clone(),
            source,
        })?;
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigValidationError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("base_url {value:?} is not a valid URL")]
    BadBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("username and password must both be set")]
    MissingCredentials,
}

/// Which browser to drive. Firefox is the default; both expect an
/// already-running WebDriver server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Firefox,
    Chrome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_browser_kind")]
    pub kind: BrowserKind,
    /// Explicit WebDriver endpoint; when unset the conventional local
    /// port for the chosen browser is used.
    #[serde(default)]
    pub webdriver_url: Option<String>,
    #[serde(default)]
    pub headless: bool,
}

impl BrowserConfig {
    pub fn endpoint(&self) -> &str {
        match (&self.webdriver_url, self.kind) {
            (Some(url), _) => url.as_str(),
            (None, BrowserKind::Firefox) => "http://localhost:4444",
            (None, BrowserKind::Chrome) => "http://localhost:9515",
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: default_browser_kind(),
            webdriver_url: None,
            headless: false,
        }
    }
}

fn default_browser_kind() -> BrowserKind {
    BrowserKind::Firefox
}

/// Upper bounds for the polling helpers. These are ceilings, not
/// sleeps: waits return as soon as their condition holds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_element_secs")]
    pub element_secs: u64,
    #[serde(default = "default_table_secs")]
    pub table_secs: u64,
}

impl Timeouts {
    pub fn element(&self) -> Duration {
        Duration::from_secs(self.element_secs)
    }

    pub fn table(&self) -> Duration {
        Duration::from_secs(self.table_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_secs: default_element_secs(),
            table_secs: default_table_secs(),
        }
    }
}

fn default_element_secs() -> u64 {
    10
}

fn default_table_secs() -> u64 {
    15
}

/// Local payloads and well-known server-side names used by the suite.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixtures {
    /// A document the application accepts.
    #[serde(default = "default_pdf_fixture")]
    pub pdf: PathBuf,
    /// An archive the application must reject by type.
    #[serde(default = "default_archive_fixture")]
    pub archive: PathBuf,
    /// A document assumed to already exist in the target collection.
    #[serde(default = "default_known_document")]
    pub known_document: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            pdf: default_pdf_fixture(),
            archive: default_archive_fixture(),
            known_document: default_known_document(),
        }
    }
}

fn default_pdf_fixture() -> PathBuf {
    PathBuf::from("resources/claim.pdf")
}

fn default_archive_fixture() -> PathBuf {
    PathBuf::from("resources/invalid-type.tar.gz")
}

fn default_known_document() -> String {
    "ReferenceCardForMac.pdf".to_string()
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct ExplorerConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ExplorerConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a settings file; format is inferred from its suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet; handy for tests.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and produce the
    /// typed configuration.
    ///
    /// `DOCEX_`-prefixed environment variables are merged last so they
    /// override anything a file set; `DOCEX_BROWSER__KIND=chrome` maps
    /// to `browser.kind`.
    pub fn load(self) -> Result<ExplorerConfig, ConfigError> {
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix("DOCEX")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut raw: Value = merged.try_deserialize()?;
        expand_env(&mut raw);

        serde_json::from_value(raw).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

/// Expand `${VAR}` placeholders in every string of `value`, walking
/// arrays and objects. Expansion repeats until it reaches a fixed point
/// or the pass cap, so a variable may itself reference another one;
/// unresolvable names are left as-is.
fn expand_env(value: &mut Value) {
    match value {
        Value::String(s) if s.contains('$') => {
            let mut current = std::mem::take(s);
            for _ in 0..MAX_ENV_EXPANSION_PASSES {
                let next = match shellexpand::env(&current) {
                    Ok(expanded) => expanded.into_owned(),
                    Err(_) => break,
                };
                if next == current {
                    break;
                }
                current = next;
            }
            *s = current;
        }
        Value::Array(items) => items.iter_mut().for_each(expand_env),
        Value::Object(fields) => fields.values_mut().for_each(expand_env),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_plain_placeholder() {
        temp_env::with_var("DOCEX_TEST_SECRET", Some("hunter2"), || {
            let mut v = json!("pw-${DOCEX_TEST_SECRET}");
            expand_env(&mut v);
            assert_eq!(v, json!("pw-hunter2"));
        });
    }

    #[test]
    fn expands_nested_structures() {
        temp_env::with_var("DOCEX_TEST_HOST", Some("example.com"), || {
            let mut v = json!({
                "base_url": "https://${DOCEX_TEST_HOST}",
                "list": ["${DOCEX_TEST_HOST}", 1, null],
            });
            expand_env(&mut v);
            assert_eq!(
                v,
                json!({
                    "base_url": "https://example.com",
                    "list": ["example.com", 1, null],
                })
            );
        });
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars([("DOCEX_A", Some("${DOCEX_B}")), ("DOCEX_B", Some("${DOCEX_A}"))], || {
            let mut v = json!("x-${DOCEX_A}");
            expand_env(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x-"));
        });
    }

    #[test]
    fn unknown_placeholders_survive() {
        let mut v = json!("keep-${DOCEX_NOT_SET_ANYWHERE}");
        expand_env(&mut v);
        assert_eq!(v, json!("keep-${DOCEX_NOT_SET_ANYWHERE}"));
    }

    #[test]
    fn browser_endpoints_default_per_kind() {
        let firefox = BrowserConfig::default();
        assert_eq!(firefox.endpoint(), "http://localhost:4444");

        let chrome = BrowserConfig {
            kind: BrowserKind::Chrome,
            webdriver_url: None,
            headless: true,
        };
        assert_eq!(chrome.endpoint(), "http://localhost:9515");

        let pinned = BrowserConfig {
            kind: BrowserKind::Chrome,
            webdriver_url: Some("http://grid:4444/wd/hub".into()),
            headless: false,
        };
        assert_eq!(pinned.endpoint(), "http://grid:4444/wd/hub");
    }

    #[test]
    fn explorer_url_normalises_trailing_slash() {
        let cfg = ExplorerConfig {
            base_url: "https://app.example.com/".into(),
            username: "u".into(),
            password: "p".into(),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default(),
            fixtures: Fixtures::default(),
        };
        assert_eq!(cfg.explorer_url(), "https://app.example.com/document-explorer");
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_placeholder_urls() {
        let cfg = ExplorerConfig {
            base_url: "<ENTER_APP_URL>".into(),
            username: "u".into(),
            password: "p".into(),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default(),
            fixtures: Fixtures::default(),
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigValidationError::BadBaseUrl { .. })
        ));
    }
}
