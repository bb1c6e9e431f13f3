//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small rental portal and run the full
//! listing/detail traversal against it end-to-end.

use sewa_crawler::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use sewa_crawler::crawler::{run_crawl, Coordinator};
use sewa_crawler::output::{CsvSink, MemorySink, RecordSink};
use sewa_crawler::search::SearchParams;
use sewa_crawler::storage::{RunStatus, SqliteStorage, Storage};
use sewa_crawler::{ListingRecord, RunContext, SewaError, ValidationError};
use std::path::Path;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRST_PAGE: &str = "/condo-for-rent/malaysia/penang";
const SECOND_PAGE: &str = "/condo-for-rent/malaysia/penang/page/2";

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, output_dir: &Path, database: bool) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
        },
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            download_delay_ms: 0,
            request_timeout_secs: 5,
        },
        output: OutputConfig {
            csv_path: output_dir.join("rentals_raw.csv").display().to_string(),
            database_path: database.then(|| output_dir.join("rentals.db").display().to_string()),
        },
        ..Default::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

fn listing_page(cards: &[&str], next: Option<&str>) -> String {
    let cards: String = cards
        .iter()
        .map(|href| format!(r#"<div data-tk="unit-result"><a href="{}">Unit</a></div>"#, href))
        .collect();
    let next = next
        .map(|href| format!(r#"<nav><a aria-label="Next" href="{}">Next</a></nav>"#, href))
        .unwrap_or_default();
    format!("<html><body><div class=\"results\">{}</div>{}</body></html>", cards, next)
}

fn detail_page(id: &str, title: &str, bedrooms: u32) -> String {
    format!(
        r#"<html><body>
            <h1 class="unit-name">{title}</h1>
            <strong class="unit-id">{id}</strong>
            <span class="project-location"><a>Gurney</a> , <a>Penang</a></span>
            <div class="rent-price__price">RM 3,000</div>
            <div class="unit-info__item">{bedrooms} <small>Bedrooms</small></div>
            <div class="unit-info__item">2 <small>Bathrooms</small></div>
            <div><span>Property Type</span><span>Condo</span></div>
            <div id="gallery-detail-page-version-4"><img src="/img/{id}-1.jpg"><img src="/img/{id}-2.jpg"></div>
        </body></html>"#
    )
}

/// Mounts a two-page listing chain with two good details, one missing
/// detail and one offsite card
async fn mount_portal(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(listing_page(
            &["/property/u1", "https://offsite.example.com/u9", "/property/u2"],
            Some(SECOND_PAGE),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(SECOND_PAGE))
        .respond_with(html(listing_page(&["/property/u3"], None)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/property/u1"))
        .respond_with(html(detail_page("U1", "Gurney Suites", 3)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/property/u2"))
        .respond_with(html(detail_page("U2", "Straits Quay", 1)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/property/u3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn sorted(mut records: Vec<ListingRecord>) -> Vec<ListingRecord> {
    records.sort_by(|a, b| a.listing_id.cmp(&b.listing_id));
    records
}

#[tokio::test]
async fn test_full_crawl_follows_pagination_and_details() {
    let mock_server = MockServer::start().await;
    mount_portal(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), false);
    let seeds = SearchParams::new(Some("penang".into()), Some("condo".into()))
        .seed_urls(&base_url)
        .unwrap();

    let memory = MemorySink::new();
    let csv_path = dir.path().join("feed.csv");
    let sinks: Vec<Box<dyn RecordSink>> = vec![
        Box::new(memory.clone()),
        Box::new(CsvSink::create(&csv_path).unwrap()),
    ];

    let coordinator =
        Coordinator::new(&config, RunContext::new(&base_url), seeds, sinks).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.listing_pages, 2);
    assert_eq!(report.detail_pages, 2);
    assert_eq!(report.records_emitted, 2);
    assert_eq!(report.fetch_failures, 1, "the 404 detail page is dropped");
    assert_eq!(report.offsite_links, 1);
    assert_eq!(report.sink_failures, 0);

    let records = sorted(memory.records());
    assert_eq!(records.len(), 2);
    assert_eq!(memory.final_status(), Some(RunStatus::Completed));

    let first = &records[0];
    assert_eq!(first.listing_id, "U1");
    assert_eq!(first.title, "Gurney Suites");
    assert_eq!(first.url, format!("{}/property/u1", mock_server.uri()));
    assert_eq!(first.price, "RM 3,000");
    assert_eq!(first.location, "Gurney, Penang");
    assert_eq!(first.property_type, "Condo");
    assert_eq!(first.bedrooms, 3);
    assert_eq!(first.bathrooms, 2);
    assert_eq!(first.area, "");
    assert_eq!(
        first.images,
        format!(
            "{uri}/img/U1-1.jpg | {uri}/img/U1-2.jpg",
            uri = mock_server.uri()
        )
    );
    assert_eq!(records[1].listing_id, "U2");
    assert_eq!(records[1].bedrooms, 1);

    // Every record of a run carries the same timestamp
    assert_eq!(records[0].fetched_at, records[1].fetched_at);

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<ListingRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(sorted(rows), records);
}

#[tokio::test]
async fn test_run_crawl_writes_csv_and_database() {
    let mock_server = MockServer::start().await;
    mount_portal(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), true);
    let params = SearchParams::new(Some("Penang".into()), Some("Condo-For-Rent".into()));

    let report = run_crawl(&config, &params, "hash123").await.unwrap();
    assert_eq!(report.records_emitted, 2);

    let csv_rows = csv::Reader::from_path(&config.output.csv_path)
        .unwrap()
        .deserialize::<ListingRecord>()
        .count();
    assert_eq!(csv_rows, 2);

    let database_path = config.output.database_path.as_deref().unwrap();
    let storage = SqliteStorage::new(Path::new(database_path)).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "hash123");
    assert_eq!(storage.count_listings(run.id).unwrap(), 2);

    let stored = storage.listings_for_run(run.id).unwrap();
    assert!(stored.iter().all(|r| r.fetched_at == run.started_at));
}

#[tokio::test]
async fn test_invalid_region_fails_before_fetching() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(listing_page(&[], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), false);
    let params = SearchParams::new(Some("penang,atlantis,mars/base".into()), None);

    let err = run_crawl(&config, &params, "").await.unwrap_err();
    match err {
        SewaError::Validation(ValidationError::Regions { invalid, allowed }) => {
            assert_eq!(invalid, vec!["atlantis".to_string(), "mars/base".to_string()]);
            assert_eq!(allowed.len(), 16);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!Path::new(&config.output.csv_path).exists());
}

#[tokio::test]
async fn test_non_html_detail_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIRST_PAGE))
        .respond_with(html(listing_page(&["/property/u1", "/brochure.pdf"], None)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/property/u1"))
        .respond_with(html(detail_page("U1", "Gurney Suites", 3)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "application/pdf"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), false);
    let seeds = SearchParams::new(None, Some("condo".into()))
        .seed_urls(&base_url)
        .unwrap();

    let memory = MemorySink::new();
    let coordinator = Coordinator::new(
        &config,
        RunContext::new(&base_url),
        seeds,
        vec![Box::new(memory.clone())],
    )
    .unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.detail_pages, 1);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(memory.records().len(), 1);
}

#[tokio::test]
async fn test_shutdown_interrupts_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/penthouse-for-rent/malaysia/penang"))
        .respond_with(html(listing_page(&["/property/u1"], None)).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), false);
    let seeds = SearchParams::default().seed_urls(&base_url).unwrap();
    assert_eq!(seeds[0].path(), "/penthouse-for-rent/malaysia/penang");

    let memory = MemorySink::new();
    let coordinator = Coordinator::new(
        &config,
        RunContext::new(&base_url),
        seeds,
        vec![Box::new(memory.clone())],
    )
    .unwrap();

    let report = coordinator
        .run_until(tokio::time::sleep(Duration::from_millis(100)))
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert_eq!(report.listing_pages, 0);
    assert!(memory.records().is_empty());
    assert_eq!(memory.final_status(), Some(RunStatus::Interrupted));
}

#[tokio::test]
async fn test_each_seed_chain_ends_on_its_own_last_page() {
    let mock_server = MockServer::start().await;

    for (region, prefix) in [("penang", "p"), ("johor", "j")] {
        let first = format!("/condo-for-rent/malaysia/{}", region);
        let second = format!("{}/page/2", first);
        let first_card = format!("/property/{}1", prefix);
        let second_card = format!("/property/{}2", prefix);

        Mock::given(method("GET"))
            .and(path(first.as_str()))
            .respond_with(html(listing_page(&[first_card.as_str()], Some(second.as_str()))))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(second.as_str()))
            .respond_with(html(listing_page(&[second_card.as_str()], None)))
            .expect(1)
            .mount(&mock_server)
            .await;

        for (card, n) in [(&first_card, 1), (&second_card, 2)] {
            let id = format!("{}{}", prefix.to_uppercase(), n);
            Mock::given(method("GET"))
                .and(path(card.as_str()))
                .respond_with(html(detail_page(&id, "Unit", n)))
                .mount(&mock_server)
                .await;
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), false);
    let seeds = SearchParams::new(Some("penang,johor".into()), Some("condo".into()))
        .seed_urls(&base_url)
        .unwrap();
    assert_eq!(seeds.len(), 2);

    let memory = MemorySink::new();
    let coordinator = Coordinator::new(
        &config,
        RunContext::new(&base_url),
        seeds,
        vec![Box::new(memory.clone())],
    )
    .unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.listing_pages, 4);
    assert_eq!(report.pages_per_seed, vec![2, 2]);
    assert_eq!(report.detail_pages, 4);
    assert_eq!(report.fetch_failures, 0);

    let ids: Vec<String> = sorted(memory.records())
        .into_iter()
        .map(|r| r.listing_id)
        .collect();
    assert_eq!(ids, vec!["J1", "J2", "P1", "P2"]);
}

#[tokio::test]
async fn test_shutdown_during_download_delay() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(listing_page(&[], None)))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let mut config = create_test_config(&mock_server.uri(), dir.path(), false);
    config.crawler.download_delay_ms = 60_000;
    let seeds = SearchParams::new(Some("penang,johor".into()), Some("condo".into()))
        .seed_urls(&base_url)
        .unwrap();

    let memory = MemorySink::new();
    let coordinator = Coordinator::new(
        &config,
        RunContext::new(&base_url),
        seeds,
        vec![Box::new(memory.clone())],
    )
    .unwrap();

    // The second seed waits a minute for its slot; shutdown must not
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        coordinator.run_until(tokio::time::sleep(Duration::from_millis(200))),
    )
    .await
    .expect("shutdown was not observed during the delay")
    .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert_eq!(memory.final_status(), Some(RunStatus::Interrupted));
}
