//! Document workflows: upload into a collection, search within one.

use std::path::Path;
use std::time::Duration;

use docex_common::{UploadOutcome, UPLOAD_SUCCESS_TEXT};
use docex_config::Timeouts;
use docex_driver::{DomError, ExplorerSession, WaitCondition};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::ui::{CollectionsUi, DocumentsUi};
use crate::FlowError;

/// Bounded poll for the upload status widget: 10 checks, 3s apart.
const UPLOAD_POLL_ATTEMPTS: usize = 10;
const UPLOAD_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Processing states the explorer exposes as document filters.
///
/// The filter controls exist in the UI but no flow drives them yet;
/// the vocabulary is typed here so a future filter flow has a seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Queued,
    Processing,
    Processed,
    Failed,
    Migrated,
    Validated,
    Reviewed,
    Rejected,
}

/// Document operations against a live session.
///
/// Both flows scope themselves to a collection first (search, then
/// click the first matching row) and unconditionally reload the page
/// when done, so a half-finished operation cannot bleed UI state into
/// the next one.
pub struct Documents<'a> {
    session: &'a ExplorerSession,
    ui: DocumentsUi,
    collections_ui: CollectionsUi,
    timeouts: Timeouts,
}

impl<'a> Documents<'a> {
    pub fn new(session: &'a ExplorerSession, timeouts: Timeouts) -> Self {
        Self {
            session,
            ui: DocumentsUi::default(),
            collections_ui: CollectionsUi::default(),
            timeouts,
        }
    }

    /// Upload `document` into `collection` and verify the reported
    /// outcome.
    ///
    /// Returns `Ok(Some(outcome))` when the status panel was read and
    /// matched the expectation (`expected_error`, or the success text
    /// when `None`). Returns `Ok(None)` when the upload never visibly
    /// started, i.e. the status widget did not appear; nothing was
    /// verified in that case and a warning is logged.
    pub async fn upload(
        &self,
        collection: &str,
        document: &Path,
        expected_error: Option<&str>,
    ) -> Result<Option<UploadOutcome>, FlowError> {
        info!(
            target: "docex.documents",
            %collection,
            document = %document.display(),
            "uploading document"
        );
        let result = self.upload_inner(collection, document, expected_error).await;
        self.reset_view().await;
        result
    }

    async fn upload_inner(
        &self,
        collection: &str,
        document: &Path,
        expected_error: Option<&str>,
    ) -> Result<Option<UploadOutcome>, FlowError> {
        self.select_collection(collection).await;

        let Some(upload_button) = self
            .session
            .wait_for(WaitCondition::Clickable, self.ui.upload_button, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.documents", "upload button unavailable");
            return Ok(None);
        };
        let Some(file_input) = self
            .session
            .wait_for(WaitCondition::Present, self.ui.file_input, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.documents", "file input unavailable");
            return Ok(None);
        };

        let path_text = document.display().to_string();
        if let Err(err) = self.session.type_into(&file_input, &path_text).await {
            warn!(target: "docex.documents", error = %err, "sending file path failed");
            return Ok(None);
        }
        if let Err(err) = self.session.click(&upload_button).await {
            warn!(target: "docex.documents", error = %err, "upload click failed");
            return Ok(None);
        }

        // The upload has started once the status widget renders. If it
        // never does, there is nothing to verify against and the
        // outcome stays unknown.
        if self
            .session
            .wait_for(WaitCondition::Present, self.ui.upload_status, self.timeouts.element())
            .await
            .is_absent()
        {
            warn!(
                target: "docex.documents",
                "upload status widget never appeared; outcome not verified"
            );
            return Ok(None);
        }

        let outcome = self.read_upload_outcome().await?;
        info!(target: "docex.documents", %outcome, "upload finished");

        let expected = expected_error.unwrap_or(UPLOAD_SUCCESS_TEXT);
        if outcome.as_text() != expected {
            return Err(FlowError::UploadOutcomeMismatch {
                expected: expected.to_string(),
                actual: outcome.as_text().to_string(),
            });
        }
        Ok(Some(outcome))
    }

    /// Poll the status widget until it reports the transfer finished,
    /// then hover it to reveal the floating panel and classify the
    /// panel's last line. The finished indicator is dismissed afterwards
    /// so it cannot satisfy the next upload's poll.
    async fn read_upload_outcome(&self) -> Result<UploadOutcome, FlowError> {
        let mut finished = false;
        for attempt in 0..UPLOAD_POLL_ATTEMPTS {
            // Re-locate each time: the widget re-renders as progress
            // updates and held references go stale.
            if let Some(status) = self
                .session
                .wait_for(WaitCondition::Present, self.ui.upload_status, UPLOAD_POLL_INTERVAL)
                .await
                .into_element()
            {
                match self.session.text_of(&status).await {
                    Ok(text) if text.contains(self.ui.finished_marker) => {
                        finished = true;
                        break;
                    }
                    Ok(text) => {
                        debug!(target: "docex.documents", attempt, status = %text, "upload in progress");
                    }
                    Err(err) => {
                        debug!(target: "docex.documents", attempt, error = %err, "status read failed");
                    }
                }
            }
            sleep(UPLOAD_POLL_INTERVAL).await;
        }
        if !finished {
            warn!(
                target: "docex.documents",
                "status widget still reports an unfinished upload; reading the panel anyway"
            );
        }

        let status = self
            .session
            .wait_for(WaitCondition::Present, self.ui.upload_status, self.timeouts.element())
            .await
            .into_element()
            .ok_or(DomError::NotFound)?;
        self.session.hover(&status).await?;

        let panel = self
            .session
            .wait_for(
                WaitCondition::Present,
                self.ui.upload_floating_panel,
                self.timeouts.element(),
            )
            .await
            .into_element()
            .ok_or(DomError::NotFound)?;
        let panel_text = self.session.text_of(&panel).await?;
        debug!(target: "docex.documents", %panel_text, "floating panel contents");

        match self
            .session
            .wait_for(WaitCondition::Present, self.ui.clear_finished, self.timeouts.element())
            .await
            .into_element()
        {
            Some(clear) => {
                if let Err(err) = self.session.click(&clear).await {
                    warn!(target: "docex.documents", error = %err, "dismissing finished upload failed");
                }
            }
            None => debug!(target: "docex.documents", "clear-finished control not present"),
        }

        Ok(UploadOutcome::from_panel_text(&panel_text))
    }

    /// Search `collection` for a document name and return the names
    /// column of the result table.
    pub async fn search(
        &self,
        collection: &str,
        document_name: &str,
    ) -> Result<Vec<String>, FlowError> {
        info!(target: "docex.documents", %collection, %document_name, "searching documents");
        let result = self.search_inner(collection, document_name).await;
        self.reset_view().await;
        result
    }

    async fn search_inner(
        &self,
        collection: &str,
        document_name: &str,
    ) -> Result<Vec<String>, FlowError> {
        self.select_collection(collection).await;

        let Some(input) = self
            .session
            .wait_for(WaitCondition::Present, self.ui.search_input, self.timeouts.element())
            .await
            .into_element()
        else {
            warn!(target: "docex.documents", "document search bar unavailable");
            return Ok(Vec::new());
        };

        if let Err(err) = self.session.clear(&input).await {
            debug!(target: "docex.documents", error = %err, "clearing document search failed");
        }
        if let Err(err) = self.session.type_into(&input, document_name).await {
            warn!(target: "docex.documents", error = %err, "typing document name failed");
            return Ok(Vec::new());
        }

        let table = self
            .session
            .parse_table(self.ui.table, self.timeouts.table())
            .await;
        Ok(table.names(self.ui.name_column)?)
    }

    /// Scope the document area to `collection`: filter the collection
    /// list by name and click the first matching row's first cell.
    /// Failures are logged and absorbed; the following step's waits
    /// will report the area as unavailable if this did not take.
    async fn select_collection(&self, collection: &str) {
        let Some(input) = self
            .session
            .wait_for(
                WaitCondition::Present,
                self.collections_ui.search_input,
                self.timeouts.element(),
            )
            .await
            .into_element()
        else {
            warn!(target: "docex.documents", "collection search bar unavailable");
            return;
        };

        if let Err(err) = self.session.clear(&input).await {
            debug!(target: "docex.documents", error = %err, "clearing collection search failed");
        }
        if let Err(err) = self.session.type_into(&input, collection).await {
            warn!(target: "docex.documents", error = %err, "typing collection name failed");
            return;
        }

        let first_cell = format!("{} tr td", self.collections_ui.table);
        match self
            .session
            .wait_for(WaitCondition::Clickable, &first_cell, self.timeouts.table())
            .await
            .into_element()
        {
            Some(cell) => {
                if let Err(err) = self.session.click(&cell).await {
                    warn!(target: "docex.documents", error = %err, "selecting collection row failed");
                }
            }
            None => warn!(target: "docex.documents", %collection, "no collection row to select"),
        }
    }

    /// Reload the page so the next operation starts from a known
    /// state, and wait for it to be interactive again.
    async fn reset_view(&self) {
        if let Err(err) = self.session.refresh().await {
            warn!(target: "docex.documents", error = %err, "page refresh failed");
        }
        let _ = self
            .session
            .wait_for(
                WaitCondition::Present,
                self.collections_ui.search_input,
                self.timeouts.element(),
            )
            .await;
    }
}
