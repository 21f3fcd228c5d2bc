//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! validate/crawl/write/check cycle end-to-end.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiki_reader::config::Config;
use wiki_reader::crawler::{run_pipeline, Coordinator, Engine, FailureKind};
use wiki_reader::output::{validate_jsonl_structure, JsonlMode};
use wiki_reader::{HarvestError, OutputError, RecordSet};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing to `output` with no politeness delay
fn create_test_config(seeds: Vec<String>, output: &Path) -> Config {
    let mut config = Config::default();
    config.seeds = seeds;
    config.crawler.random_delay_ms = 0;
    config.output.path = output.to_string_lossy().into_owned();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a", "<p>Hello</p><p>world</p>").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let seed = format!("{}/a", mock_server.uri());
    let config = create_test_config(vec![seed.clone()], &output);

    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.record_count, 1);
    assert_eq!(summary.pages_fetched, 1);
    assert!(summary.failures.is_empty());

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        format!("{{\"url\":\"{}\",\"text\":\"Hello world\"}}\n", seed)
    );
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/good", "<p>Still here</p>").await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let bad = format!("{}/bad", mock_server.uri());
    let good = format!("{}/good", mock_server.uri());
    let config = create_test_config(vec![bad.clone(), good.clone()], &output);

    let summary = run_pipeline(config).await.expect("Run should still succeed");

    assert_eq!(summary.record_count, 1);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].url, bad);
    assert_eq!(summary.failures[0].kind, FailureKind::Http(500));

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains(&good));
    assert!(content.contains("Still here"));
}

#[tokio::test]
async fn test_non_html_response_is_a_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/page", "<p>text</p>").await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"p\":1}", "application/json"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let config = create_test_config(
        vec![
            format!("{}/data.json", mock_server.uri()),
            format!("{}/page", mock_server.uri()),
        ],
        &output,
    );

    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.record_count, 1);
    assert!(matches!(
        summary.failures[0].kind,
        FailureKind::ContentMismatch(_)
    ));
}

#[tokio::test]
async fn test_all_fetches_failing_yields_empty_artifact_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let config = create_test_config(
        vec![
            format!("{}/missing-1", mock_server.uri()),
            format!("{}/missing-2", mock_server.uri()),
        ],
        &output,
    );

    let result = run_pipeline(config).await;

    assert!(matches!(
        result,
        Err(HarvestError::Output(OutputError::Empty { .. }))
    ));
}

#[tokio::test]
async fn test_page_without_paragraphs_contributes_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/empty", "<div>no paragraphs</div><p>   </p>").await;
    mount_page(&mock_server, "/full", "<p>content</p>").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let config = create_test_config(
        vec![
            format!("{}/empty", mock_server.uri()),
            format!("{}/full", mock_server.uri()),
        ],
        &output,
    );

    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.record_count, 1);
    assert!(summary.failures.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_pages_keep_fragment_order() {
    let mock_server = MockServer::start().await;

    let pages = 20;
    let fragments = 5;
    for page in 0..pages {
        let body: String = (0..fragments)
            .map(|f| format!("<p>p{}-f{}</p>", page, f))
            .collect();
        mount_page(&mock_server, &format!("/page{}", page), &body).await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let seeds: Vec<String> = (0..pages)
        .map(|page| format!("{}/page{}", mock_server.uri(), page))
        .collect();
    let mut config = create_test_config(seeds, &output);
    config.crawler.parallelism = 8;

    let coordinator = Coordinator::new(config).unwrap();
    let (records, report) = coordinator.crawl().await;

    assert_eq!(report.pages_fetched, pages);
    assert_eq!(report.fragments_seen, pages * fragments);
    assert_eq!(records.len(), pages);

    for record in &records {
        let page: usize = record
            .source_url
            .rsplit("/page")
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let expected: Vec<String> = (0..fragments)
            .map(|f| format!("p{}-f{}", page, f))
            .collect();
        assert_eq!(record.text, expected.join(" "));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_seeds_merge_into_one_record() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a", "<p>Hello</p><p>world</p>").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let seed = format!("{}/a", mock_server.uri());
    let config = create_test_config(vec![seed.clone(), seed.clone()], &output);

    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.record_count, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    let record: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    let mut words: Vec<&str> = record["text"].as_str().unwrap().split(' ').collect();
    words.sort_unstable();
    assert_eq!(words, vec!["Hello", "Hello", "world", "world"]);
}

#[tokio::test]
async fn test_same_domain_parallelism_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("<p>slow</p>").set_delay(Duration::from_millis(100)))
        .mount(&mock_server)
        .await;

    let seeds: Vec<Url> = (0..4)
        .map(|i| Url::parse(&format!("{}/slow{}", mock_server.uri(), i)).unwrap())
        .collect();

    let mut config = Config::default();
    config.crawler.parallelism = 1;
    config.crawler.random_delay_ms = 0;
    let engine = Engine::new(&config.crawler).unwrap();

    let start = Instant::now();
    let report = engine.crawl(&seeds, |_, _| {}).await;

    assert_eq!(report.pages_fetched, 4);
    assert!(
        start.elapsed() >= Duration::from_millis(400),
        "one slot per domain should serialize the fetches, took {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_engine_reports_originating_url_per_fragment() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/one", "<p>first</p><p> second </p><p></p>").await;
    mount_page(&mock_server, "/two", "<p>third</p>").await;

    let one = Url::parse(&format!("{}/one", mock_server.uri())).unwrap();
    let two = Url::parse(&format!("{}/two", mock_server.uri())).unwrap();

    let mut config = Config::default();
    config.crawler.random_delay_ms = 0;
    let engine = Engine::new(&config.crawler).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let report = engine
        .crawl(&[one.clone(), two.clone()], move |url, text| {
            sink.lock()
                .unwrap()
                .push((url.to_string(), text.to_string()));
        })
        .await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.fragments_seen, 3);

    let seen = seen.lock().unwrap();
    let from_one: Vec<&str> = seen
        .iter()
        .filter(|(url, _)| url == one.as_str())
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(from_one, vec!["first", "second"]);
    assert!(seen.contains(&(two.to_string(), "third".to_string())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refused_connection_and_panicking_callback_are_isolated() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/boom", "<p>before</p><p>boom</p>").await;
    mount_page(&mock_server, "/ok", "<p>survivor</p>").await;

    let refused = Url::parse("http://127.0.0.1:1/x").unwrap();
    let boom = Url::parse(&format!("{}/boom", mock_server.uri())).unwrap();
    let ok = Url::parse(&format!("{}/ok", mock_server.uri())).unwrap();

    let mut config = Config::default();
    config.crawler.random_delay_ms = 0;
    let engine = Engine::new(&config.crawler).unwrap();

    let records = Arc::new(RecordSet::new());
    let sink = Arc::clone(&records);
    let report = engine
        .crawl(&[refused.clone(), boom.clone(), ok.clone()], move |url, text| {
            if text == "boom" {
                panic!("callback rejected fragment");
            }
            sink.merge(url.as_str(), text);
        })
        .await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.failures.len(), 2);

    assert_eq!(report.failures[0].url, refused.to_string());
    assert!(matches!(report.failures[0].kind, FailureKind::Network(_)));
    assert_eq!(report.failures[1].url, boom.to_string());
    assert!(matches!(report.failures[1].kind, FailureKind::Task(_)));

    let snapshot = records.snapshot();
    let survivor = snapshot
        .iter()
        .find(|r| r.source_url == ok.as_str())
        .expect("good page should still produce a record");
    assert_eq!(survivor.text, "survivor");

    // Fragments accepted before the panic are kept
    let partial = snapshot
        .iter()
        .find(|r| r.source_url == boom.as_str())
        .expect("partial record should remain");
    assert_eq!(partial.text, "before");
}

#[tokio::test]
async fn test_previous_artifact_is_replaced() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a", "<p>fresh</p>").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    std::fs::write(
        &output,
        "{\"url\":\"https://old.example/x\",\"text\":\"stale\"}\n\
         {\"url\":\"https://old.example/y\",\"text\":\"stale\"}\n",
    )
    .unwrap();

    let config = create_test_config(vec![format!("{}/a", mock_server.uri())], &output);
    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.record_count, 1);
    let content = std::fs::read_to_string(&output).unwrap();
    assert!(!content.contains("stale"));
}

#[tokio::test]
async fn test_stream_mode_accepts_written_artifact() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/a", "<p>one</p>").await;
    mount_page(&mock_server, "/b", "<p>two</p>").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let mut config = create_test_config(
        vec![
            format!("{}/a", mock_server.uri()),
            format!("{}/b", mock_server.uri()),
        ],
        &output,
    );
    config.output.jsonl_mode = JsonlMode::Stream;

    let summary = run_pipeline(config).await.expect("Run failed");

    assert_eq!(summary.record_count, 2);
    assert_eq!(validate_jsonl_structure(&output, JsonlMode::Strict).unwrap(), 2);
}

#[tokio::test]
async fn test_invalid_seed_aborts_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("<p>never</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("scraped_data.jl");
    let config = create_test_config(
        vec![
            format!("{}/a", mock_server.uri()),
            "ftp://example.com/file".to_string(),
        ],
        &output,
    );

    let result = run_pipeline(config).await;

    assert!(matches!(result, Err(HarvestError::Url(_))));
    assert!(!output.exists());
    // Wiremock verifies the zero-request expectation when mock_server drops
}
