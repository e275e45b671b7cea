//! Integration tests for the scraper
//!
//! These tests use wiremock to serve topic pages and run the real HTTP
//! fetcher through the full pagination cycle end-to-end.

use sozluk_ripple::config::{Config, OutputConfig, RetryConfig, ScraperConfig};
use sozluk_ripple::crawler::{
    scrape, FailureKind, HttpFetcher, NoopObserver, Paginator, ScrapeObserver,
};
use sozluk_ripple::output::{CsvOutput, ResultSink};
use sozluk_ripple::{FatalReason, RippleError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOPIC_PATH: &str = "/pena--31782";

/// Creates a test configuration that accepts the mock server's host
fn create_test_config(directory: &str) -> Config {
    Config {
        scraper: ScraperConfig {
            delay_ms: 0,
            allowed_hosts: vec!["127.0.0.1".to_string()],
            request_timeout_secs: 5,
        },
        retry: RetryConfig {
            base_delay_ms: 10, // Very short for testing
            transient_base_delay_ms: 10,
            max_delay_ms: 50,
            ..RetryConfig::default()
        },
        output: OutputConfig {
            directory: directory.to_string(),
        },
        ..Config::default()
    }
}

/// Renders a topic page with entries `first..first + count`
fn topic_page(first: u32, count: u32, page_count: u32) -> String {
    let items: String = (first..first + count)
        .map(|id| {
            format!(
                r#"<li data-id="{id}" data-author="yazar{a}" data-author-id="{a}" data-favorite-count="{id}">
                     <div class="content">entry {id}<br>second line</div>
                     <footer><a class="entry-date permalink" href="/entry/{id}">0{d}.03.2021 12:00</a></footer>
                   </li>"#,
                id = id,
                a = id % 3,
                d = 1 + id % 9
            )
        })
        .collect();

    format!(
        r#"<html><body><div id="topic">
             <h1 id="title" data-title="pena">pena</h1>
             <div class="pager" data-currentpage="1" data-pagecount="{page_count}"></div>
             <ul id="entry-item-list">{items}</ul>
           </div></body></html>"#
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Records the backoff delays chosen by the paginator
#[derive(Default)]
struct BackoffRecorder {
    delays: Mutex<Vec<(FailureKind, Duration)>>,
}

impl ScrapeObserver for BackoffRecorder {
    fn backoff(
        &self,
        _page: u32,
        _attempt: u32,
        kind: FailureKind,
        delay: Duration,
        _detail: &str,
    ) {
        self.delays.lock().unwrap().push((kind, delay));
    }
}

fn paginator(config: &Config) -> Paginator<HttpFetcher> {
    let fetcher = HttpFetcher::new(&config.scraper).expect("Failed to build client");
    Paginator::new(fetcher, config, Arc::new(NoopObserver))
}

fn topic_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), TOPIC_PATH)
}

#[tokio::test]
async fn test_full_scrape_and_csv_export() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path().to_str().unwrap());

    mount_page(&mock_server, 1, topic_page(1, 10, 3)).await;
    mount_page(&mock_server, 2, topic_page(11, 10, 3)).await;
    // Page 3 repeats two entries from page 2
    mount_page(&mock_server, 3, topic_page(19, 10, 3)).await;

    let results = paginator(&config)
        .scrape(&topic_url(&mock_server))
        .await
        .expect("Scrape should succeed");

    assert_eq!(results.len(), 28);
    assert_eq!(results.duplicates_dropped(), 2);
    assert_eq!(results.pages_scraped().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(results.warnings().is_empty());

    let first = &results.entries()[0];
    assert_eq!(first.entry_id, "1");
    assert_eq!(first.author, "yazar1");
    assert_eq!(first.content, "entry 1\nsecond line");
    assert_eq!(first.favorite_count, 1);
    assert_eq!(first.page_number, 1);

    let summary = results.summarize();
    assert_eq!(summary.total_entries, 28);
    assert_eq!(summary.unique_authors, 3);
    assert_eq!(summary.pages_scraped, 3);

    let written = CsvOutput::new(dir.path())
        .with_timestamp("20240101_120000")
        .persist(&results)
        .expect("CSV write should succeed");

    assert_eq!(
        written.data,
        dir.path().join("pena_3sayfa_20240101_120000.csv")
    );
    assert!(written.errors.is_none());

    let bytes = std::fs::read(&written.data).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 28);
    assert_eq!(&rows[27][0], "28");
    assert_eq!(&rows[27][6], "3");
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let mock_server = MockServer::start().await;
    let config = create_test_config("unused");

    mount_page(&mock_server, 1, topic_page(1, 5, 2)).await;

    // First two requests for page 2 are throttled; the earlier mount wins while it matches
    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 2, topic_page(6, 5, 2)).await;

    let observer = Arc::new(BackoffRecorder::default());
    let fetcher = HttpFetcher::new(&config.scraper).expect("Failed to build client");
    let results = Paginator::new(fetcher, &config, observer.clone())
        .scrape(&topic_url(&mock_server))
        .await
        .expect("Scrape should succeed");

    assert_eq!(results.len(), 10);
    assert!(results.warnings().is_empty());

    // The one second Retry-After outweighs the 10ms and 20ms backoffs but is capped at max-delay
    let delays = observer.delays.lock().unwrap().clone();
    assert_eq!(
        delays,
        vec![
            (FailureKind::RateLimited, Duration::from_millis(50)),
            (FailureKind::RateLimited, Duration::from_millis(50)),
        ]
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_missing_topic_is_fatal() {
    let mock_server = MockServer::start().await;
    let config = create_test_config("unused");

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let error = paginator(&config)
        .scrape(&topic_url(&mock_server))
        .await
        .expect_err("Scrape should abort");

    match error.reason {
        FatalReason::FirstPageUnavailable { kind, attempts, .. } => {
            assert_eq!(kind, FailureKind::NotFound);
            assert_eq!(attempts, 1);
        }
        other => panic!("unexpected reason: {:?}", other),
    }
    assert!(error.partial.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_failing_middle_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path().to_str().unwrap());

    mount_page(&mock_server, 1, topic_page(1, 5, 3)).await;
    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .and(query_param("p", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 3, topic_page(11, 5, 3)).await;

    let results = paginator(&config)
        .scrape(&topic_url(&mock_server))
        .await
        .expect("Scrape should succeed with a skipped page");

    assert_eq!(results.len(), 10);
    assert_eq!(results.pages_scraped().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(results.warnings().len(), 1);

    let warning = &results.warnings()[0];
    assert_eq!(warning.page, 2);
    assert_eq!(warning.kind, FailureKind::TransientNetwork);
    assert_eq!(warning.attempts, 3);
    assert!(warning.url.ends_with("?p=2"));

    let written = CsvOutput::new(dir.path())
        .with_timestamp("20240101_120000")
        .persist(&results)
        .unwrap();
    let errors = written.errors.expect("errors file should be written");
    assert_eq!(
        errors,
        dir.path().join("pena_3sayfa_20240101_120000_errors.csv")
    );
}

#[tokio::test]
async fn test_challenge_page_on_first_page_is_fatal() {
    let mock_server = MockServer::start().await;
    let config = create_test_config("unused");

    Mock::given(method("GET"))
        .and(path(TOPIC_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Just a moment...</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let error = paginator(&config)
        .scrape(&topic_url(&mock_server))
        .await
        .expect_err("Scrape should abort");

    assert!(matches!(
        error.reason,
        FatalReason::FirstPageUnavailable {
            kind: FailureKind::Malformed,
            attempts: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_scrape_entry_point() {
    let mock_server = MockServer::start().await;
    let config = create_test_config("unused");

    mount_page(&mock_server, 1, topic_page(1, 4, 2)).await;
    mount_page(&mock_server, 2, topic_page(5, 4, 2)).await;

    let results = scrape(&config, &topic_url(&mock_server))
        .await
        .expect("Scrape should succeed");

    assert_eq!(results.len(), 8);
    assert_eq!(results.planned_pages(), 2);
}

#[tokio::test]
async fn test_scrape_entry_point_reports_fatal_errors() {
    let config = create_test_config("unused");

    let error = scrape(&config, "https://example.com/pena--31782")
        .await
        .expect_err("Host outside the allow list should abort");

    match error {
        RippleError::Fatal(fatal) => {
            assert!(matches!(fatal.reason, FatalReason::InvalidTopicUrl(_)));
            assert!(fatal.partial.is_empty());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
