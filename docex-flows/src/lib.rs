//! End-to-end workflows against the document-explorer UI.
//!
//! The flows compose the driver layer's waits and table reads into the
//! operations the suite asserts on: creating, searching, and sorting
//! collections, and uploading and searching documents. DOM hiccups
//! (missing elements, intercepted clicks) are logged and absorbed so a
//! half-rendered page degrades into an empty result; only business
//! assertions such as wrong dialog text or a wrong upload outcome
//! propagate out of a flow.
pub mod collections;
pub mod documents;
pub mod ui;

use docex_common::TableError;
use docex_driver::DomError;

pub use collections::Collections;
pub use documents::{DocumentState, Documents};
pub use ui::{CollectionsUi, DocumentsUi};

/// A workflow-level failure worth failing a test over.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The create dialog showed an error, but not the expected one.
    #[error("create dialog reported {actual:?}, expected {expected:?}")]
    DialogErrorMismatch { expected: String, actual: String },

    /// The upload status panel reported an unexpected verdict.
    #[error("upload finished with {actual:?}, expected {expected:?}")]
    UploadOutcomeMismatch { expected: String, actual: String },

    /// A parsed table did not have the assumed column shape.
    #[error(transparent)]
    Table(#[from] TableError),

    /// A DOM failure in a step that cannot degrade gracefully.
    #[error(transparent)]
    Dom(#[from] DomError),
}
