//! Typed outcomes for DOM interaction.
//!
//! Every driver call that touches the page returns [`DomResult`] so the
//! workflow layer can decide per call whether an absent or blocked
//! element is fatal, instead of one shared log-and-continue policy.

use fantoccini::error::CmdError;
use fantoccini::error::ErrorStatus;

pub type DomResult<T> = Result<T, DomError>;

/// Classification of a failed DOM interaction.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The element is not (or no longer) present in the DOM.
    #[error("element not present in the DOM")]
    NotFound,
    /// The held reference points at a node the page has replaced.
    #[error("element reference went stale")]
    Stale,
    /// Another element would receive the click.
    #[error("click intercepted by an overlapping element")]
    Blocked,
    /// The element exists but cannot be driven (hidden, disabled).
    #[error("element is not interactable")]
    NotInteractable,
    /// The driver gave up waiting.
    #[error("timed out waiting on the webdriver")]
    Timeout,
    /// Anything the suite has no special handling for.
    #[error("webdriver command failed: {0}")]
    Driver(#[source] CmdError),
}

impl DomError {
    /// Failures that mean "the feature is not on screen" rather than a
    /// broken interaction.
    pub fn is_absence(&self) -> bool {
        matches!(self, DomError::NotFound | DomError::Timeout)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, DomError::Stale)
    }
}

impl From<CmdError> for DomError {
    fn from(err: CmdError) -> Self {
        let classified = match &err {
            CmdError::WaitTimeout => Some(DomError::Timeout),
            CmdError::Standard(wire) => match wire.error {
                ErrorStatus::NoSuchElement => Some(DomError::NotFound),
                ErrorStatus::StaleElementReference => Some(DomError::Stale),
                ErrorStatus::ElementClickIntercepted => Some(DomError::Blocked),
                ErrorStatus::ElementNotInteractable => Some(DomError::NotInteractable),
                ErrorStatus::Timeout | ErrorStatus::ScriptTimeout => Some(DomError::Timeout),
                _ => None,
            },
            _ => None,
        };

        classified.unwrap_or(DomError::Driver(err))
    }
}
