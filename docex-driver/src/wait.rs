//! Bounded polling for asynchronous UI state.
//!
//! The application renders tables, dialogs, and status widgets some
//! time after the interaction that causes them. Instead of fixed
//! sleeps, every wait here polls a condition at a short interval up to
//! a caller-chosen ceiling and reports absence as a value, never as an
//! error.

use std::time::Duration;

use fantoccini::{elements::Element, Client, Locator};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::outcome::DomResult;

/// How often conditions are re-checked while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// What must hold for a wait to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// The element exists in the DOM.
    Present,
    /// The element exists, is displayed, and is enabled.
    Clickable,
}

/// A located handle, or the fact that the ceiling elapsed first.
pub enum WaitResult {
    Found(Element),
    Absent,
}

impl WaitResult {
    pub fn into_element(self) -> Option<Element> {
        match self {
            WaitResult::Found(element) => Some(element),
            WaitResult::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, WaitResult::Absent)
    }
}

/// Poll until `condition` holds for `selector` or `timeout` elapses.
///
/// Transient probe failures (the element re-rendering mid-check) are
/// logged and retried; they do not end the wait early.
pub async fn wait_for(
    client: &Client,
    condition: WaitCondition,
    selector: &str,
    timeout: Duration,
) -> WaitResult {
    let deadline = Instant::now() + timeout;

    loop {
        match probe(client, condition, selector).await {
            Ok(Some(element)) => return WaitResult::Found(element),
            Ok(None) => {}
            Err(err) => {
                debug!(target: "docex.wait", %selector, error = %err, "probe failed, retrying");
            }
        }

        if Instant::now() + POLL_INTERVAL > deadline {
            break;
        }
        sleep(POLL_INTERVAL).await;
    }

    debug!(
        target: "docex.wait",
        %selector,
        ?condition,
        timeout_ms = timeout.as_millis() as u64,
        "condition not met before timeout"
    );
    WaitResult::Absent
}

async fn probe(
    client: &Client,
    condition: WaitCondition,
    selector: &str,
) -> DomResult<Option<Element>> {
    let element = match client.find(Locator::Css(selector)).await {
        Ok(element) => element,
        Err(err) if err.is_no_such_element() => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    match condition {
        WaitCondition::Present => Ok(Some(element)),
        WaitCondition::Clickable => {
            let ready = element.is_displayed().await? && element.is_enabled().await?;
            Ok(ready.then_some(element))
        }
    }
}
