//! Collection create/search/sort against a live deployment.
//!
//! These tests assume the deployment state the suite has always
//! assumed: a collection named `abhishek` exists, `test_collection`
//! does not, and `foobar` never will.

use anyhow::Result;
use docex_common::{name_exists, validate_order, SortOrder};
use docex_e2e::live_session;
use docex_flows::CollectionsUi;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn create_new_collection_then_search_finds_it() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let collections = ctx.collections();

    collections.create("test_collection", None).await?;
    let results = collections.search("test_collection").await?;

    assert!(
        name_exists("test_collection", &results),
        "created collection missing from search results: {results:?}"
    );
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn duplicate_create_surfaces_error_and_leaves_one_entry() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let collections = ctx.collections();

    let expected_error = CollectionsUi::default().create_error_message;
    collections.create("abhishek", Some(expected_error)).await?;

    // The dialog must have been cancelled, not submitted twice.
    let results = collections.search("abhishek").await?;
    let matches = results.iter().filter(|name| *name == "abhishek").count();
    assert_eq!(matches, 1, "expected exactly one entry, got {results:?}");
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn search_finds_existing_collection() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let results = ctx.collections().search("abhishek").await?;
    assert!(name_exists("abhishek", &results));
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn search_for_unknown_collection_finds_nothing() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let results = ctx.collections().search("foobar").await?;
    assert!(!name_exists("foobar", &results), "unexpected hit: {results:?}");
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn sort_ascending_orders_the_list() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let results = ctx.collections().sort(SortOrder::Ascending).await?;
    assert!(!results.is_empty(), "sort returned no collections");
    validate_order(&results, SortOrder::Ascending)?;
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn sort_descending_orders_the_list() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let results = ctx.collections().sort(SortOrder::Descending).await?;
    assert!(!results.is_empty(), "sort returned no collections");
    validate_order(&results, SortOrder::Descending)?;
    ctx.close().await;
    Ok(())
}
