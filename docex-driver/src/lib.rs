//! Browser capability layer for the document-explorer suite.
//!
//! Wraps a `fantoccini` WebDriver client with the small set of
//! operations the workflows need: connect and log in, wait for
//! elements, read tables, and interact with handles while classifying
//! every failure into a typed outcome.
//!
//! - [`session::ExplorerSession`]: connect/login and element interaction
//! - [`wait`]: bounded poll-until-condition primitives
//! - [`table`]: UI table extraction into [`docex_common::ParsedTable`]
//! - [`outcome::DomError`]: the DOM failure taxonomy
pub mod outcome;
pub mod session;
pub mod table;
pub mod wait;

pub use outcome::{DomError, DomResult};
pub use session::ExplorerSession;
pub use wait::{WaitCondition, WaitResult};
