//! Extraction of UI tables into [`ParsedTable`] values.

use std::time::Duration;

use docex_common::ParsedTable;
use fantoccini::{Client, Locator};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::outcome::DomResult;
use crate::wait::{wait_for, WaitCondition, WaitResult, POLL_INTERVAL};

/// Read the table at `selector` into a row-keyed mapping.
///
/// The table is polled until it has rendered at least one row or
/// `timeout` elapses; an empty result is therefore only returned once
/// the ceiling is spent, which is what an empty search result looks
/// like. A table that never appears at all yields an empty mapping
/// immediately after the wait. The page replacing rows mid-read
/// (stale references) restarts the read within the same deadline.
pub async fn parse_table(client: &Client, selector: &str, timeout: Duration) -> ParsedTable {
    if let WaitResult::Absent = wait_for(client, WaitCondition::Present, selector, timeout).await {
        debug!(target: "docex.table", %selector, "table not present, returning empty contents");
        return ParsedTable::new();
    }

    let deadline = Instant::now() + timeout;
    let mut last_read = ParsedTable::new();

    loop {
        match read_rows(client, selector).await {
            Ok(parsed) if !parsed.is_empty() => return parsed,
            Ok(parsed) => last_read = parsed,
            Err(err) if err.is_stale() => {
                debug!(target: "docex.table", %selector, "table re-rendered mid-read, retrying");
            }
            Err(err) if err.is_absence() => {
                debug!(target: "docex.table", %selector, "table vanished mid-read, retrying");
            }
            Err(err) => {
                warn!(target: "docex.table", %selector, error = %err, "table read failed");
                return last_read;
            }
        }

        if Instant::now() + POLL_INTERVAL > deadline {
            debug!(target: "docex.table", %selector, "no rows rendered before timeout");
            return last_read;
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// One full pass over the table: rows top-to-bottom, cells
/// left-to-right, keyed by the row's full rendered text.
async fn read_rows(client: &Client, selector: &str) -> DomResult<ParsedTable> {
    let table = client.find(Locator::Css(selector)).await?;

    let mut parsed = ParsedTable::new();
    for row in table.find_all(Locator::Css("tr")).await? {
        let key = row.text().await?;
        let mut columns = Vec::new();
        for cell in row.find_all(Locator::Css("td")).await? {
            columns.push(cell.text().await?);
        }
        debug!(target: "docex.table", row = %key, cells = columns.len(), "parsed row");
        parsed.insert(key, columns);
    }
    Ok(parsed)
}
