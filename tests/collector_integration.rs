//! Collector 통합 테스트
//!
//! wiremock을 사용한 HTTP 모킹 테스트

use rsolr_exporter::collector::{Collector, Endpoint, RetryPolicy, SolrClient};
use rsolr_exporter::error::{FetchError, PollError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_url(server: &MockServer) -> String {
    format!("{}/solr/", server.uri())
}

async fn mount_info_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/solr/admin/info/system"))
        .and(query_param("wt", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mode": "std",
            "jvm": {"processors": 8}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/solr/admin/info/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "system": {"threadCount": {"current": 31, "peak": 40, "daemon": 12}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_system_success() {
    let mock_server = MockServer::start().await;
    mount_info_endpoints(&mock_server).await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    let doc = client.fetch(Endpoint::System).await.unwrap();

    assert_eq!(doc["mode"], "std");
    assert_eq!(doc["jvm"]["processors"], 8);
}

#[tokio::test]
async fn test_mbeans_scoped_to_core() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solr/mycore/admin/mbeans"))
        .and(query_param("stats", "true"))
        .and(query_param("wt", "json"))
        .and(query_param("json.nl", "map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "solr-mbeans": {"CACHE": {"documentCache": {"stats": {"hits": 5}}}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000)
        .unwrap()
        .with_core("mycore");
    let doc = client.fetch(Endpoint::MBeans).await.unwrap();

    assert_eq!(
        doc["solr-mbeans"]["CACHE"]["documentCache"]["stats"]["hits"],
        5
    );
}

#[tokio::test]
async fn test_mbeans_without_core() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solr/admin/mbeans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"solr-mbeans": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    assert!(client.fetch(Endpoint::MBeans).await.is_ok());
}

#[tokio::test]
async fn test_timeout_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 100).unwrap();
    let result = client.fetch(Endpoint::System).await;

    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_http_500_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    let err = client.fetch(Endpoint::Threads).await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
}

#[tokio::test]
async fn test_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"mode\": \"std\""))
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    let result = client.fetch(Endpoint::System).await;

    assert!(matches!(result, Err(FetchError::Parse { .. })));
}

#[tokio::test]
async fn test_connection_refused() {
    // 아무도 listen하지 않는 포트
    let client = SolrClient::new("http://127.0.0.1:1/solr/", 1000).unwrap();
    let result = client.fetch(Endpoint::System).await;

    assert!(matches!(
        result,
        Err(FetchError::Network { .. }) | Err(FetchError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_collect_retries_until_mbeans_recovers() {
    let mock_server = MockServer::start().await;
    mount_info_endpoints(&mock_server).await;

    // 처음 두 번은 503, 이후 성공
    Mock::given(method("GET"))
        .and(path("/solr/admin/mbeans"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/solr/admin/mbeans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"solr-mbeans": {}})))
        .with_priority(2)
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    let collector = Collector::new(client, RetryPolicy::new(5, Duration::from_millis(10)));
    let snapshot = collector.collect().await.unwrap();

    assert_eq!(snapshot.system["mode"], "std");
    assert!(snapshot.mbeans["solr-mbeans"].is_object());

    // 세 번의 시도 모두 system을 다시 조회
    let requests = mock_server.received_requests().await.unwrap();
    let system_requests = requests
        .iter()
        .filter(|r| r.url.path() == "/solr/admin/info/system")
        .count();
    assert_eq!(system_requests, 3);
}

#[tokio::test]
async fn test_collect_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = SolrClient::new(&base_url(&mock_server), 5000).unwrap();
    let collector = Collector::new(client, RetryPolicy::new(3, Duration::from_millis(10)));
    let result = collector.collect().await;

    match result {
        Err(PollError::MaxRetriesExceeded { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last.http_status(), Some(503));
        }
        other => panic!("expected MaxRetriesExceeded, got {:?}", other.map(|_| ())),
    }
}
