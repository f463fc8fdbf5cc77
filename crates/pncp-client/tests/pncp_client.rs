//! Integration tests for `PncpClient::fetch_all`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Back-off delays go through a recording sleeper,
//! so retry tests finish instantly while still checking the schedule.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pncp_client::{PncpClient, Sleeper, CONTRACTS_ENDPOINT};

#[derive(Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        self.delays.lock().unwrap().push(delay);
        std::future::ready(())
    }
}

const WINDOW: &[(&str, &str)] = &[("dataInicial", "20250101"), ("dataFinal", "20251231")];

/// Builds a client against the mock server: 5-second timeout, 3 attempts, 2 s step.
fn test_client(server: &MockServer, sleeper: RecordingSleeper) -> PncpClient<RecordingSleeper> {
    PncpClient::new(&server.uri(), 5, "pncp-test/0.1", 3, 2)
        .expect("failed to build test PncpClient")
        .with_sleeper(sleeper)
}

fn contract(id: &str) -> Value {
    json!({
        "numeroControlePNCP": id,
        "orgaoEntidade": {"nomeOrgao": "PREFEITURA DO MUNICIPIO DE SAO PAULO"},
        "fornecedor": {"razaoSocial": "ACME LTDA", "cpfCnpj": "123"},
        "valorFinal": "1.000,00"
    })
}

fn page_body(ids: &[&str], total_pages: u32) -> Value {
    json!({
        "data": ids.iter().map(|id| contract(id)).collect::<Vec<_>>(),
        "totalPaginas": total_pages,
        "totalRegistros": ids.len()
    })
}

async fn mount_page(server: &MockServer, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .and(query_param("pagina", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["numeroControlePNCP"].as_str().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concatenates_pages_until_an_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_body(&["a", "b"], 10)).await;
    mount_page(&server, "2", page_body(&["c"], 10)).await;
    mount_page(&server, "3", page_body(&["d", "e"], 10)).await;
    mount_page(&server, "4", page_body(&[], 10)).await;

    let sleeper = RecordingSleeper::default();
    let outcome = test_client(&server, sleeper.clone())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success);
    assert_eq!(ids(&outcome.records), vec!["a", "b", "c", "d", "e"]);
    assert!(sleeper.recorded().is_empty());
}

#[tokio::test]
async fn stops_when_page_reaches_reported_total() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_body(&["a"], 2)).await;
    mount_page(&server, "2", page_body(&["b"], 2)).await;
    Mock::given(method("GET"))
        .and(query_param("pagina", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_body(&["c"], 2)))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success);
    assert_eq!(ids(&outcome.records), vec!["a", "b"]);
}

#[tokio::test]
async fn missing_total_pages_means_single_page() {
    let server = MockServer::start().await;
    mount_page(&server, "1", json!({"data": [contract("only")]})).await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success);
    assert_eq!(ids(&outcome.records), vec!["only"]);
}

#[tokio::test]
async fn no_content_response_is_an_empty_successful_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success);
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn sends_window_paging_params_and_identifying_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .and(query_param("dataInicial", "20250101"))
        .and(query_param("dataFinal", "20251231"))
        .and(query_param("pagina", "1"))
        .and(query_param("tamanhoPagina", "500"))
        .and(header("user-agent", "pncp-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_body(&["a"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success, "request did not match expected params/header");
    assert_eq!(outcome.records.len(), 1);
}

// ---------------------------------------------------------------------------
// Retry and failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_errors_exhaust_three_attempts_and_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let outcome = test_client(&server, sleeper.clone())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(!outcome.success);
    assert!(outcome.records.is_empty());
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn transient_error_is_retried_then_pagination_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("pagina", "1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "1", page_body(&["a"], 2)).await;
    mount_page(&server, "2", page_body(&["b"], 2)).await;

    let sleeper = RecordingSleeper::default();
    let outcome = test_client(&server, sleeper.clone())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(outcome.success);
    assert_eq!(ids(&outcome.records), vec!["a", "b"]);
    assert_eq!(sleeper.recorded(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn client_error_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::default();
    let outcome = test_client(&server, sleeper.clone())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(!outcome.success);
    assert!(outcome.records.is_empty());
    assert!(sleeper.recorded().is_empty());
}

#[tokio::test]
async fn failure_on_later_page_keeps_earlier_records_but_fails_run() {
    let server = MockServer::start().await;
    mount_page(&server, "1", page_body(&["a", "b"], 3)).await;
    Mock::given(method("GET"))
        .and(query_param("pagina", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("pagina", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_body(&["c"], 3)))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(!outcome.success);
    assert_eq!(ids(&outcome.records), vec!["a", "b"]);
}

#[tokio::test]
async fn malformed_body_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CONTRACTS_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server, RecordingSleeper::default())
        .fetch_all(CONTRACTS_ENDPOINT, WINDOW)
        .await;

    assert!(!outcome.success);
    assert!(outcome.records.is_empty());
}

#[tokio::test]
async fn unreachable_server_fails_after_retries() {
    // Port 1 on loopback refuses connections.
    let sleeper = RecordingSleeper::default();
    let client = PncpClient::new("http://127.0.0.1:1", 2, "pncp-test/0.1", 3, 2)
        .unwrap()
        .with_sleeper(sleeper.clone());

    let outcome = client.fetch_all(CONTRACTS_ENDPOINT, WINDOW).await;

    assert!(!outcome.success);
    assert_eq!(sleeper.recorded().len(), 2);
}
