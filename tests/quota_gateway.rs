use std::time::Duration;

use owner_fixer::error::QuotaError;
use owner_fixer::identity::NumericIdentity;
use owner_fixer::quota::{HttpQuotaService, QuotaService};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetches_limit_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quota/5001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "quota_limit": 1000, "current_usage": 512.5 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpQuotaService::new(&format!("{}/", server.uri()), Duration::from_secs(2)).unwrap();
    let snapshot = service.fetch_quota(NumericIdentity(5001)).await.unwrap();

    assert_eq!(snapshot.limit, 1000.0);
    assert_eq!(snapshot.current_usage, 512.5);
    assert_eq!(snapshot.remaining(), 487.5);
}

#[tokio::test]
async fn test_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = HttpQuotaService::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let err = service.fetch_quota(NumericIdentity(5001)).await.unwrap_err();
    assert!(matches!(err, QuotaError::Status(503)));
}

#[tokio::test]
async fn test_malformed_body_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "quota_limit": 1000 })))
        .mount(&server)
        .await;

    let service = HttpQuotaService::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let err = service.fetch_quota(NumericIdentity(5001)).await.unwrap_err();
    assert!(matches!(err, QuotaError::Malformed(_)));
}

#[tokio::test]
async fn test_negative_values_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "quota_limit": -1, "current_usage": 0 })),
        )
        .mount(&server)
        .await;

    let service = HttpQuotaService::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let err = service.fetch_quota(NumericIdentity(5001)).await.unwrap_err();
    assert!(matches!(err, QuotaError::Malformed(_)));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "quota_limit": 1000, "current_usage": 0 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let service = HttpQuotaService::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = service.fetch_quota(NumericIdentity(5001)).await.unwrap_err();
    assert!(matches!(err, QuotaError::Timeout));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let service = HttpQuotaService::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = service.fetch_quota(NumericIdentity(5001)).await.unwrap_err();
    assert!(matches!(err, QuotaError::Transport(_)));
}
