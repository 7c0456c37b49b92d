//! Document upload/search against a live deployment.
//!
//! Uploads land in the pre-existing `abhishek` collection; the fixture
//! files come from the paths in the suite configuration.

use anyhow::Result;
use docex_common::{name_exists, UploadOutcome, UPLOAD_REJECTED_TYPE_TEXT};
use docex_e2e::live_session;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn upload_pdf_succeeds() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let fixture = ctx.fixture_path(&ctx.config.fixtures.pdf);
    if !fixture.exists() {
        eprintln!("skipping: pdf fixture missing at {}", fixture.display());
        ctx.close().await;
        return Ok(());
    }

    let outcome = ctx.documents().upload("abhishek", &fixture, None).await?;
    assert_eq!(
        outcome,
        Some(UploadOutcome::Succeeded),
        "upload outcome was not verified as a success"
    );
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn upload_archive_is_rejected_by_type() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let fixture = ctx.fixture_path(&ctx.config.fixtures.archive);
    if !fixture.exists() {
        eprintln!("skipping: archive fixture missing at {}", fixture.display());
        ctx.close().await;
        return Ok(());
    }

    let outcome = ctx
        .documents()
        .upload("abhishek", &fixture, Some(UPLOAD_REJECTED_TYPE_TEXT))
        .await?;
    assert_eq!(outcome, Some(UploadOutcome::RejectedType));
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn search_finds_existing_document() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let known = ctx.config.fixtures.known_document.clone();

    let results = ctx.documents().search("abhishek", &known).await?;
    assert!(
        name_exists(&known, &results),
        "known document missing from results: {results:?}"
    );
    ctx.close().await;
    Ok(())
}

#[tokio::test]
#[serial]
async fn search_for_unknown_document_finds_nothing() -> Result<()> {
    let Some(ctx) = live_session().await? else { return Ok(()) };
    let results = ctx.documents().search("abhishek", "foobar").await?;
    assert!(!name_exists("foobar", &results), "unexpected hit: {results:?}");
    ctx.close().await;
    Ok(())
}
