mod common;

use std::sync::Arc;
use std::time::Duration;

use jobpulse_core::config::IngestConfig;
use jobpulse_ingest::{CrawlStop, CrawlTick, FetchClient, IngestPipeline, PersistTick};
use jobpulse_scheduler::TickTask;
use jobpulse_store::{ListingStore, SqliteListingStore};
use serde_json::Value;

fn settings(base_url: &str) -> IngestConfig {
    IngestConfig {
        base_url: base_url.to_string(),
        limit_pages: false,
        ..IngestConfig::default()
    }
}

fn pipeline(settings: IngestConfig) -> (IngestPipeline, Arc<SqliteListingStore>) {
    let source = FetchClient::new(settings.base_url.clone(), Duration::from_secs(5)).unwrap();
    let store = Arc::new(SqliteListingStore::open_in_memory().unwrap());
    let pipeline = IngestPipeline::new(Arc::new(source), store.clone(), settings);
    (pipeline, store)
}

fn three_vacancies() -> Vec<Value> {
    vec![
        common::vacancy("https://jobs.test/one", "Rust Engineer", "Berlin"),
        common::vacancy("https://jobs.test/two", "Rust Engineer", "Hamburg"),
        common::vacancy("https://jobs.test/three", "Analyst", "Berlin"),
    ]
}

#[tokio::test]
async fn bootstrap_persists_the_whole_board() {
    let (base, board) = common::spawn_board(vec![three_vacancies()]).await;
    let (pipeline, store) = pipeline(settings(&base));

    let (crawl, swept) = pipeline.bootstrap().await;

    assert_eq!(crawl.appended, 3);
    assert_eq!(crawl.stop, CrawlStop::Exhausted);
    assert_eq!(board.hits(), vec![1, 2]);
    assert_eq!(swept.persisted, 3);
    assert!(pipeline.buffer().is_empty());

    let page = store.paginated(0, 20).unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.content.len(), 3);
    let ids: Vec<i64> = page.content.iter().map(|v| v.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);

    let mut urls: Vec<_> = page.content.iter().map(|v| v.listing.url.as_str()).collect();
    urls.sort_unstable();
    assert_eq!(
        urls,
        vec![
            "https://jobs.test/one",
            "https://jobs.test/three",
            "https://jobs.test/two"
        ]
    );
}

#[tokio::test]
async fn refresh_of_known_page_adds_nothing() {
    let (base, board) = common::spawn_board(vec![three_vacancies()]).await;
    let (pipeline, store) = pipeline(settings(&base));
    pipeline.bootstrap().await;

    assert_eq!(pipeline.crawl_tick().await, 3);
    assert_eq!(pipeline.buffer().len(), 3);
    assert_eq!(board.hits(), vec![1, 2, 1]);

    let report = pipeline.persist_tick();
    assert_eq!(report.drained, 3);
    assert_eq!(report.skipped_existing, 3);
    assert_eq!(report.persisted, 0);
    assert!(pipeline.buffer().is_empty());
    assert_eq!(store.existing_urls().unwrap().len(), 3);
    assert_eq!(store.paginated(0, 20).unwrap().total_elements, 3);
}

#[tokio::test]
async fn page_limit_bounds_the_bootstrap_crawl() {
    let pages = (0..5)
        .map(|p| vec![common::vacancy(&format!("https://jobs.test/p{p}"), "Dev", "Berlin")])
        .collect();
    let (base, board) = common::spawn_board(pages).await;
    let (pipeline, store) = pipeline(IngestConfig {
        max_pages: 2,
        limit_pages: true,
        ..settings(&base)
    });

    let (crawl, swept) = pipeline.bootstrap().await;

    assert_eq!(crawl.stop, CrawlStop::PageLimit);
    assert_eq!(board.hits(), vec![1, 2]);
    assert_eq!(swept.persisted, 2);
    assert_eq!(store.paginated(0, 20).unwrap().total_elements, 2);
}

#[tokio::test]
async fn ticks_drive_the_pipeline_through_the_scheduler_trait() {
    let (base, _board) = common::spawn_board(vec![three_vacancies()]).await;
    let (pipeline, store) = pipeline(settings(&base));
    let pipeline = Arc::new(pipeline);

    CrawlTick(Arc::clone(&pipeline)).run().await;
    assert_eq!(pipeline.buffer().len(), 3);

    PersistTick(Arc::clone(&pipeline)).run().await;
    assert!(pipeline.buffer().is_empty());
    assert_eq!(store.paginated(0, 20).unwrap().total_elements, 3);

    // the same page again is recognised as already stored
    CrawlTick(Arc::clone(&pipeline)).run().await;
    PersistTick(Arc::clone(&pipeline)).run().await;
    assert_eq!(store.paginated(0, 20).unwrap().total_elements, 3);
}

#[tokio::test]
async fn failing_upstream_leaves_store_untouched() {
    let base = common::spawn_fixed(axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let (pipeline, store) = pipeline(settings(&base));

    let (crawl, swept) = pipeline.bootstrap().await;
    assert_eq!(crawl.stop, CrawlStop::FetchFailed);
    assert_eq!(crawl.appended, 0);
    assert_eq!(swept.persisted, 0);

    assert_eq!(pipeline.crawl_tick().await, 0);
    assert!(store.existing_urls().unwrap().is_empty());
}
