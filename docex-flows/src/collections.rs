//! Collection workflows: create, search, sort.

use docex_common::SortOrder;
use docex_config::Timeouts;
use docex_driver::{ExplorerSession, WaitCondition};
use tracing::{debug, info, warn};

use crate::ui::CollectionsUi;
use crate::FlowError;

/// Number of header clicks to reach each sort state from the default.
/// The header cycles default → ascending → descending → default.
const SORT_CYCLE: usize = 3;

/// Collection operations against a live session.
pub struct Collections<'a> {
    session: &'a ExplorerSession,
    ui: CollectionsUi,
    timeouts: Timeouts,
}

impl<'a> Collections<'a> {
    pub fn new(session: &'a ExplorerSession, timeouts: Timeouts) -> Self {
        Self {
            session,
            ui: CollectionsUi::default(),
            timeouts,
        }
    }

    /// Create a collection named `name` through the dialog.
    ///
    /// The dialog is driven by element availability: create button →
    /// name box → submit → optional error box. Whatever happens, the
    /// flow leaves the UI back in its idle state (the dialog cancelled
    /// or already closed); no dialog leaks into the next operation.
    /// When the dialog surfaces an error and `expected_error` is set,
    /// a text mismatch is the one failure that propagates.
    pub async fn create(&self, name: &str, expected_error: Option<&str>) -> Result<(), FlowError> {
        info!(target: "docex.collections", %name, "creating collection");

        let Some(create) = self
            .session
            .wait_for(WaitCondition::Clickable, self.ui.create_button, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.collections", "create button unavailable, skipping create");
            return Ok(());
        };
        if let Err(err) = self.session.click(&create).await {
            warn!(target: "docex.collections", error = %err, "create button click failed");
            return Ok(());
        }

        let Some(name_box) = self
            .session
            .wait_for(WaitCondition::Present, self.ui.name_text_box, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.collections", "create dialog never opened");
            return Ok(());
        };
        if let Err(err) = self.session.type_into(&name_box, name).await {
            warn!(target: "docex.collections", error = %err, "could not type collection name");
        }

        match self
            .session
            .wait_for(
                WaitCondition::Clickable,
                self.ui.create_submit_button,
                self.timeouts.element(),
            )
            .await
            .into_element()
        {
            Some(submit) => {
                if let Err(err) = self.session.click(&submit).await {
                    warn!(target: "docex.collections", error = %err, "submit click failed");
                }
            }
            None => warn!(target: "docex.collections", "submit button unavailable"),
        }

        self.settle_dialog(expected_error).await
    }

    /// Post-submit half of the create state machine: if an error box
    /// appears the dialog is still open and must be cancelled; if none
    /// appears within the ceiling the dialog already closed and the
    /// create is treated as accepted.
    async fn settle_dialog(&self, expected_error: Option<&str>) -> Result<(), FlowError> {
        let error_box = self
            .session
            .wait_for(
                WaitCondition::Present,
                self.ui.create_error_text,
                self.timeouts.element(),
            )
            .await
            .into_element();

        let Some(error_box) = error_box else {
            if expected_error.is_some() {
                warn!(
                    target: "docex.collections",
                    "expected a dialog error but none appeared; create went through"
                );
            } else {
                debug!(target: "docex.collections", "no error box, create accepted");
            }
            return Ok(());
        };

        let actual = match self.session.text_of(&error_box).await {
            Ok(text) => text,
            Err(err) => {
                warn!(target: "docex.collections", error = %err, "could not read dialog error");
                String::new()
            }
        };
        info!(target: "docex.collections", error_text = %actual, "create dialog reported an error");

        // Close the dialog before judging the text so a mismatch does
        // not leave it open for the next operation.
        match self
            .session
            .wait_for(WaitCondition::Present, self.ui.cancel_button, self.timeouts.element())
            .await
            .into_element()
        {
            Some(cancel) => {
                if let Err(err) = self.session.click(&cancel).await {
                    warn!(target: "docex.collections", error = %err, "cancel click failed");
                }
            }
            None => warn!(target: "docex.collections", "cancel button unavailable"),
        }

        match expected_error {
            Some(expected) if expected != actual => Err(FlowError::DialogErrorMismatch {
                expected: expected.to_string(),
                actual,
            }),
            _ => Ok(()),
        }
    }

    /// Filter the collection list by `name` and return the rendered
    /// collection names. A missing search bar degrades to an empty
    /// result.
    pub async fn search(&self, name: &str) -> Result<Vec<String>, FlowError> {
        info!(target: "docex.collections", %name, "searching collections");

        let Some(input) = self
            .session
            .wait_for(WaitCondition::Present, self.ui.search_input, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.collections", "search bar unavailable");
            return Ok(Vec::new());
        };

        if let Err(err) = self.session.clear(&input).await {
            debug!(target: "docex.collections", error = %err, "clearing search bar failed");
        }
        if let Err(err) = self.session.type_into(&input, name).await {
            warn!(target: "docex.collections", error = %err, "typing search term failed");
            return Ok(Vec::new());
        }

        let table = self
            .session
            .parse_table(self.ui.table, self.timeouts.table())
            .await;
        Ok(table.names(0)?)
    }

    /// Sort the collection list by name and return the observed order.
    ///
    /// The page size is raised to 100 first so one parse covers the
    /// whole list, and the sort header is clicked back to its default
    /// state afterwards regardless of what the parse produced.
    pub async fn sort(&self, order: SortOrder) -> Result<Vec<String>, FlowError> {
        info!(target: "docex.collections", %order, "sorting collections");
        self.set_page_size("100").await;

        let clicks = match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => 2,
            SortOrder::Default => 0,
        };
        self.click_sort_header(clicks).await;

        let table = self
            .session
            .parse_table(self.ui.table, self.timeouts.table())
            .await;

        // Restore the header to default before extracting, so a
        // malformed table cannot skip the cleanup.
        self.click_sort_header((SORT_CYCLE - clicks) % SORT_CYCLE).await;

        Ok(table.names(0)?)
    }

    async fn click_sort_header(&self, times: usize) {
        for attempt in 0..times {
            // Re-locate on every click: sorting re-renders the header.
            let Some(header) = self
                .session
                .wait_for(WaitCondition::Present, self.ui.sort_header, self.timeouts.element())
                .await
                .into_element()
            else {
                warn!(target: "docex.collections", attempt, "sort header unavailable");
                return;
            };
            if let Err(err) = self.session.scroll_into_view(&header).await {
                debug!(target: "docex.collections", error = %err, "scroll to sort header failed");
            }
            if let Err(err) = self.session.click(&header).await {
                warn!(target: "docex.collections", attempt, error = %err, "sort click failed");
                return;
            }
        }
    }

    async fn set_page_size(&self, size: &str) {
        match self
            .session
            .wait_for(
                WaitCondition::Present,
                self.ui.page_size_select,
                self.timeouts.element(),
            )
            .await
            .into_element()
        {
            Some(select) => {
                if let Err(err) = self.session.select_value(&select, size).await {
                    warn!(target: "docex.collections", error = %err, "changing page size failed");
                }
            }
            None => debug!(target: "docex.collections", "page size selector not present"),
        }
    }
}
