//! Shared data model for the document-explorer validation suite.
//!
//! Everything the browser-facing crates hand back to assertions lives
//! here: parsed table contents, sort orders, upload outcomes, and the
//! pure validation helpers the tests run against them. The crate is
//! intentionally lightweight so that driver and flow crates can depend
//! on it without pulling in WebDriver machinery.
//!
//! - [`ParsedTable`]: row-keyed extraction of a UI table's text
//! - [`SortOrder`] and [`validate_order`]: case-insensitive order checks
//! - [`UploadOutcome`]: classification of the upload status panel
//! - [`observability`]: tracing/logging initialisation
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod observability;

/// Exact text the status panel shows for a successful upload.
pub const UPLOAD_SUCCESS_TEXT: &str = "Succeeded";
/// Exact text the status panel shows when a file type is refused.
pub const UPLOAD_REJECTED_TYPE_TEXT: &str = "Rejected (because of type)";

/// Ordered mapping from a row's full rendered text to its column texts.
///
/// Row order reflects DOM order at parse time. Two rows that render
/// identical text collide: the later row's columns replace the earlier
/// row's, and the earlier insertion position is kept.
///
/// ```
/// use docex_common::ParsedTable;
///
/// let mut table = ParsedTable::new();
/// table.insert("alpha 3 docs".into(), vec!["alpha".into(), "3 docs".into()]);
/// table.insert("beta 1 doc".into(), vec!["beta".into(), "1 doc".into()]);
/// assert_eq!(table.names(0).unwrap(), vec!["alpha", "beta"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    rows: Vec<(String, Vec<String>)>,
}

impl ParsedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row. A duplicate key overwrites the columns in place.
    pub fn insert(&mut self, key: String, columns: Vec<String>) {
        match self.rows.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = columns,
            None => self.rows.push((key, columns)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows.iter().map(|(key, cols)| (key.as_str(), cols.as_slice()))
    }

    /// Extract the text at `column` from every row, in row order.
    ///
    /// A row with fewer than `column + 1` cells is an error, not a skip:
    /// the table the UI rendered does not have the shape the caller
    /// assumed, and silently dropping rows would hide that.
    pub fn names(&self, column: usize) -> Result<Vec<String>, TableError> {
        self.rows
            .iter()
            .map(|(key, cols)| {
                cols.get(column).cloned().ok_or_else(|| TableError::MissingColumn {
                    row: key.clone(),
                    found: cols.len(),
                    index: column,
                })
            })
            .collect()
    }
}

/// A parsed table did not have the shape an extraction assumed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row:?} has {found} columns, no column at index {index}")]
    MissingColumn { row: String, found: usize, index: usize },
}

/// Requested ordering for the collection/document list.
///
/// `Default` means the UI's unsorted state; validation is a no-op there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
    Default,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
            SortOrder::Default => "default",
        };
        f.write_str(name)
    }
}

/// A list claimed to be sorted was not.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("items not in {order} order: observed {observed:?}, expected {expected:?}")]
    OutOfOrder {
        order: SortOrder,
        observed: Vec<String>,
        expected: Vec<String>,
    },
}

/// Check that `items` is sorted case-insensitively in `order`.
///
/// The comparison lowercases every entry and checks element-wise
/// equality against a freshly sorted copy (reversed for descending).
/// [`SortOrder::Default`] always passes.
pub fn validate_order(items: &[String], order: SortOrder) -> Result<(), OrderError> {
    if order == SortOrder::Default {
        return Ok(());
    }

    let observed: Vec<String> = items.iter().map(|item| item.to_lowercase()).collect();
    let mut expected = observed.clone();
    expected.sort();
    if order == SortOrder::Descending {
        expected.reverse();
    }
    tracing::debug!(target: "docex.validate", ?observed, ?expected, %order, "order check");

    if observed == expected {
        Ok(())
    } else {
        Err(OrderError::OutOfOrder {
            order,
            observed,
            expected,
        })
    }
}

/// Whether `name` appears in a list of extracted names.
pub fn name_exists(name: &str, names: &[String]) -> bool {
    names.iter().any(|candidate| candidate == name)
}

/// Result of one upload attempt, read off the floating status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded,
    RejectedType,
    /// Any text the classifier does not recognise, kept verbatim.
    Other(String),
}

impl UploadOutcome {
    /// Classify the floating panel's text. The panel renders the file
    /// name and progress on earlier lines; the verdict is the last line.
    pub fn from_panel_text(panel: &str) -> Self {
        let last = panel.rsplit('\n').next().unwrap_or("");
        match last {
            UPLOAD_SUCCESS_TEXT => UploadOutcome::Succeeded,
            UPLOAD_REJECTED_TYPE_TEXT => UploadOutcome::RejectedType,
            other => UploadOutcome::Other(other.to_string()),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            UploadOutcome::Succeeded => UPLOAD_SUCCESS_TEXT,
            UploadOutcome::RejectedType => UPLOAD_REJECTED_TYPE_TEXT,
            UploadOutcome::Other(text) => text,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(rows: &[(&str, &[&str])]) -> ParsedTable {
        let mut table = ParsedTable::new();
        for (key, cols) in rows {
            table.insert(
                key.to_string(),
                cols.iter().map(|c| c.to_string()).collect(),
            );
        }
        table
    }

    #[test]
    fn names_preserves_row_order_and_length() {
        let table = table_of(&[
            ("zeta 9", &["zeta", "9"][..]),
            ("alpha 1", &["alpha", "1"][..]),
            ("mid 5", &["mid", "5"][..]),
        ]);
        let names = table.names(0).unwrap();
        assert_eq!(names.len(), table.len());
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.names(1).unwrap(), vec!["9", "1", "5"]);
    }

    #[test]
    fn names_errors_on_short_row() {
        let table = table_of(&[("full row", &["a", "b"][..]), ("short", &["a"][..])]);
        let err = table.names(1).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingColumn {
                row: "short".into(),
                found: 1,
                index: 1,
            }
        );
    }

    #[test]
    fn duplicate_key_overwrites_in_place() {
        let mut table = ParsedTable::new();
        table.insert("dup".into(), vec!["first".into()]);
        table.insert("other".into(), vec!["other".into()]);
        table.insert("dup".into(), vec!["second".into()]);

        assert_eq!(table.len(), 2);
        // The later row wins but keeps the earlier position.
        assert_eq!(table.names(0).unwrap(), vec!["second", "other"]);
    }

    #[test]
    fn validate_order_accepts_sorted_input() {
        let ascending: Vec<String> = vec!["Alpha".into(), "beta".into(), "Gamma".into()];
        validate_order(&ascending, SortOrder::Ascending).unwrap();

        let descending: Vec<String> = vec!["gamma".into(), "Beta".into(), "alpha".into()];
        validate_order(&descending, SortOrder::Descending).unwrap();
    }

    #[test]
    fn validate_order_rejects_misordered_input() {
        let items: Vec<String> = vec!["beta".into(), "alpha".into()];
        let err = validate_order(&items, SortOrder::Ascending).unwrap_err();
        match err {
            OrderError::OutOfOrder {
                order,
                observed,
                expected,
            } => {
                assert_eq!(order, SortOrder::Ascending);
                assert_eq!(observed, vec!["beta", "alpha"]);
                assert_eq!(expected, vec!["alpha", "beta"]);
            }
        }
    }

    #[test]
    fn validate_order_is_case_insensitive() {
        // Byte order would put "Zeta" before "alpha"; lowercase order must not.
        let items: Vec<String> = vec!["alpha".into(), "Zeta".into()];
        validate_order(&items, SortOrder::Ascending).unwrap();
    }

    #[test]
    fn default_order_never_fails() {
        let shuffled: Vec<String> = vec!["m".into(), "a".into(), "z".into()];
        validate_order(&shuffled, SortOrder::Default).unwrap();
    }

    #[test]
    fn name_lookup() {
        let names: Vec<String> = vec!["abhishek".into(), "test_collection".into()];
        assert!(name_exists("abhishek", &names));
        assert!(!name_exists("foobar", &names));
    }

    #[test]
    fn upload_outcome_reads_last_panel_line() {
        let panel = "claim.pdf\n100%\nSucceeded";
        assert_eq!(UploadOutcome::from_panel_text(panel), UploadOutcome::Succeeded);

        let rejected = "archive.tar.gz\nRejected (because of type)";
        assert_eq!(
            UploadOutcome::from_panel_text(rejected),
            UploadOutcome::RejectedType
        );

        let odd = "claim.pdf\nPending review";
        assert_eq!(
            UploadOutcome::from_panel_text(odd),
            UploadOutcome::Other("Pending review".into())
        );
    }

    #[test]
    fn upload_outcome_single_line_panel() {
        assert_eq!(
            UploadOutcome::from_panel_text("Succeeded"),
            UploadOutcome::Succeeded
        );
        assert_eq!(UploadOutcome::from_panel_text("").as_text(), "");
    }
}
