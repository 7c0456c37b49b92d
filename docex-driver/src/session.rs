//! WebDriver session: connect, login, and element interaction.

use std::time::Duration;

use docex_common::ParsedTable;
use docex_config::{BrowserConfig, BrowserKind};
use fantoccini::actions::{InputSource, MouseActions, PointerAction};
use fantoccini::elements::Element;
use fantoccini::error::NewSessionError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info};
use webdriver::capabilities::Capabilities;

use crate::outcome::{DomError, DomResult};
use crate::table;
use crate::wait::{self, WaitCondition, WaitResult};

/// A live browser session against the document-explorer deployment.
///
/// Thin wrapper around a `fantoccini` client; all interaction goes
/// through methods that classify failures into [`DomError`].
pub struct ExplorerSession {
    client: Client,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not open a session against {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: NewSessionError,
    },
}

impl ExplorerSession {
    /// Connect to the WebDriver server named by `browser`.
    ///
    /// The server (geckodriver or chromedriver) must already be
    /// running; capabilities carry only the browser name and headless
    /// arguments.
    pub async fn connect(browser: &BrowserConfig) -> Result<Self, SessionError> {
        let endpoint = browser.endpoint().to_string();
        let client = ClientBuilder::native()
            .capabilities(capabilities(browser))
            .connect(&endpoint)
            .await
            .map_err(|source| SessionError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        info!(target: "docex.session", %endpoint, kind = ?browser.kind, "webdriver session opened");
        Ok(Self { client })
    }

    /// Log in through the application's form and land on the explorer.
    pub async fn login(&self, url: &str, username: &str, password: &str) -> DomResult<()> {
        debug!(target: "docex.session", %url, %username, "logging in");
        self.client.goto(url).await?;

        self.client
            .find(Locator::Id("username"))
            .await?
            .send_keys(username)
            .await?;
        self.client
            .find(Locator::Id("password"))
            .await?
            .send_keys(password)
            .await?;
        self.client.find(Locator::Id("kc-login")).await?.click().await?;
        Ok(())
    }

    /// See [`wait::wait_for`].
    pub async fn wait_for(
        &self,
        condition: WaitCondition,
        selector: &str,
        timeout: Duration,
    ) -> WaitResult {
        wait::wait_for(&self.client, condition, selector, timeout).await
    }

    /// See [`table::parse_table`].
    pub async fn parse_table(&self, selector: &str, timeout: Duration) -> ParsedTable {
        table::parse_table(&self.client, selector, timeout).await
    }

    pub async fn click(&self, element: &Element) -> DomResult<()> {
        element.clone().click().await.map_err(DomError::from)
    }

    pub async fn clear(&self, element: &Element) -> DomResult<()> {
        element.clear().await.map_err(DomError::from)
    }

    pub async fn type_into(&self, element: &Element, text: &str) -> DomResult<()> {
        element.send_keys(text).await.map_err(DomError::from)
    }

    pub async fn text_of(&self, element: &Element) -> DomResult<String> {
        element.text().await.map_err(DomError::from)
    }

    /// Pick an option of a `<select>` element by its value attribute.
    pub async fn select_value(&self, element: &Element, value: &str) -> DomResult<()> {
        element.select_by_value(value).await.map_err(DomError::from)
    }

    /// Move the pointer onto `element`, e.g. to reveal hover-only panels.
    pub async fn hover(&self, element: &Element) -> DomResult<()> {
        let hover = MouseActions::new("hover".to_string()).then(PointerAction::MoveToElement {
            element: element.clone(),
            duration: None,
            x: 0.0,
            y: 0.0,
        });
        self.client
            .perform_actions(hover)
            .await
            .map_err(DomError::from)
    }

    /// Scroll `element` into the viewport. Some header controls ignore
    /// clicks while rendered outside it.
    pub async fn scroll_into_view(&self, element: &Element) -> DomResult<()> {
        let handle = serde_json::to_value(element).map_err(fantoccini::error::CmdError::Json)?;
        self.client
            .execute("arguments[0].scrollIntoView({block: 'center'});", vec![handle])
            .await?;
        Ok(())
    }

    /// Reload the page to put the UI back into a known state.
    pub async fn refresh(&self) -> DomResult<()> {
        self.client.refresh().await.map_err(DomError::from)
    }

    /// End the browser session.
    pub async fn close(self) -> DomResult<()> {
        self.client.close().await.map_err(DomError::from)
    }
}

fn capabilities(browser: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    match browser.kind {
        BrowserKind::Firefox => {
            let mut args: Vec<&str> = Vec::new();
            if browser.headless {
                args.push("-headless");
            }
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        BrowserKind::Chrome => {
            let mut args: Vec<&str> = Vec::new();
            if browser.headless {
                args.push("--headless");
                args.push("--disable-gpu");
            }
            caps.insert("browserName".to_string(), json!("chrome"));
            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firefox_capabilities_carry_headless_flag() {
        let caps = capabilities(&BrowserConfig {
            kind: BrowserKind::Firefox,
            webdriver_url: None,
            headless: true,
        });
        assert_eq!(caps["browserName"], json!("firefox"));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
    }

    #[test]
    fn chrome_capabilities_default_to_headed() {
        let caps = capabilities(&BrowserConfig {
            kind: BrowserKind::Chrome,
            webdriver_url: None,
            headless: false,
        });
        assert_eq!(caps["goog:chromeOptions"]["args"], json!([]));
    }
}
