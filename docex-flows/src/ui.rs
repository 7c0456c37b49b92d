//! Locators and fixed strings per UI area.
//!
//! These are contracts with the target application's markup: fixed CSS
//! selectors matched against its current DOM, brittle by construction,
//! to be updated whenever the application's templates change. Each UI
//! area is a plain value the flows hold by composition.

/// Selectors and messages for the collections area.
#[derive(Debug, Clone)]
pub struct CollectionsUi {
    pub create_button: &'static str,
    pub name_text_box: &'static str,
    pub create_submit_button: &'static str,
    pub create_error_text: &'static str,
    pub cancel_button: &'static str,
    pub search_input: &'static str,
    pub table: &'static str,
    pub sort_header: &'static str,
    pub page_size_select: &'static str,
    /// Error text the dialog shows for a duplicate collection name.
    pub create_error_message: &'static str,
}

impl Default for CollectionsUi {
    fn default() -> Self {
        Self {
            create_button: "button.picnicButtonSizeSmall.picnicButtonShapeRound.\
                picnicButtonColorGreen.picnicButtonContentIconOnly.picnicButton",
            name_text_box: ".picnicTextBox",
            create_submit_button: ".picnicDialogSizeWidthSmall > container:nth-child(2) > \
                platform-new-collection-dialog:nth-child(1) > footer:nth-child(3) > \
                buttons:nth-child(1) > button:nth-child(1)",
            create_error_text: ".picnicMessenger",
            cancel_button: ".picnicDialogSizeWidthSmall > container:nth-child(2) > \
                platform-new-collection-dialog:nth-child(1) > footer:nth-child(3) > \
                buttons:nth-child(1) > button:nth-child(2)",
            search_input: ".echoTableSelectable > header:nth-child(1) > \
                search:nth-child(1) > input:nth-child(1)",
            table: ".echoTableHeightFull > main:nth-child(2) > table:nth-child(1)",
            sort_header: ".tableHeaderIconSort",
            page_size_select: "select.ng-pristine",
            create_error_message: "Something went unexpectedly wrong. Try again. \
                If the problem persists contact your administrator.",
        }
    }
}

/// Selectors and messages for the documents area.
#[derive(Debug, Clone)]
pub struct DocumentsUi {
    pub upload_button: &'static str,
    pub file_input: &'static str,
    pub search_input: &'static str,
    pub table: &'static str,
    pub upload_status: &'static str,
    pub upload_floating_panel: &'static str,
    pub clear_finished: &'static str,
    /// Substring the status widget shows once the transfer is done.
    pub finished_marker: &'static str,
    /// Document names render in the second column of the table.
    pub name_column: usize,
}

impl Default for DocumentsUi {
    fn default() -> Self {
        Self {
            upload_button: "button.picnicButtonColorGreen:nth-child(1)",
            file_input: ".picnicGridColumn3 > heading:nth-child(1) > \
                echo-floating-expandable-uploader-standalone:nth-child(2) > input:nth-child(2)",
            search_input: "input.ng-pristine",
            table: ".picnicTableReactiveRows",
            upload_status: ".picnicGridColumn7 > chunk:nth-child(1)",
            upload_floating_panel: ".picnicFloatingExpandableMainGapsNo",
            clear_finished: ".picnicTextUnderline",
            finished_marker: "finished uploading",
            name_column: 1,
        }
    }
}
