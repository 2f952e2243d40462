//! Integration tests for the Alidns RPC client
//!
//! Each test points the provider at a local mock server and checks the signed
//! request it sends and how it reads the response.

use dns01_core::traits::DnsProvider;
use dns01_core::{Credentials, DnsRecord};
use dns01_provider_alidns::AlidnsProvider;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "secret_value_12345";

fn provider_for(server: &MockServer) -> AlidnsProvider {
    AlidnsProvider::with_endpoint(Credentials::new("LTAI_test_id", SECRET, None), server.uri())
        .unwrap()
}

/// Matches the parameters every signed request carries
fn signed_get(action: &str) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("Action", action))
        .and(query_param("Format", "JSON"))
        .and(query_param("Version", "2015-01-09"))
        .and(query_param("AccessKeyId", "LTAI_test_id"))
        .and(query_param("SignatureMethod", "HMAC-SHA1"))
        .and(query_param("SignatureVersion", "1.0"))
}

#[tokio::test]
async fn list_records_sends_lookup_and_keeps_exact_matches() {
    let server = MockServer::start().await;

    signed_get("DescribeDomainRecords")
        .and(query_param("DomainName", "example.com"))
        .and(query_param("RRKeyWord", "_acme-challenge"))
        .and(query_param("Type", "TXT"))
        .and(query_param("PageSize", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "RequestId": "R-list",
            "TotalCount": 2,
            "DomainRecords": {
                "Record": [
                    {"RecordId": "9001", "RR": "_acme-challenge", "Type": "TXT",
                     "Value": "tok123", "TTL": 600, "Line": "default"},
                    {"RecordId": "9002", "RR": "_acme-challenge.sub", "Type": "TXT",
                     "Value": "tok456", "TTL": 600, "Line": "default"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = assert_ok!(
        provider_for(&server)
            .list_records("example.com", "_acme-challenge", "TXT")
            .await
    );

    assert_eq!(
        records,
        vec![DnsRecord {
            record_id: "9001".to_string(),
            host_record: "_acme-challenge".to_string(),
            record_type: "TXT".to_string(),
            value: "tok123".to_string(),
            ttl: 600,
            line: Some("default".to_string()),
        }]
    );
}

#[tokio::test]
async fn create_record_sends_add_and_returns_id() {
    let server = MockServer::start().await;

    signed_get("AddDomainRecord")
        .and(query_param("DomainName", "example.com"))
        .and(query_param("RR", "_acme-challenge.sub"))
        .and(query_param("Type", "TXT"))
        .and(query_param("Value", "tok/with+chars="))
        .and(query_param("TTL", "600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "RequestId": "R-add",
            "RecordId": "9999"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record_id = assert_ok!(
        provider_for(&server)
            .create_record("example.com", "_acme-challenge.sub", "TXT", "tok/with+chars=", 600)
            .await
    );

    assert_eq!(record_id, "9999");
}

#[tokio::test]
async fn create_record_without_record_id_is_provider_error() {
    let server = MockServer::start().await;

    signed_get("AddDomainRecord")
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"RequestId": "R-add"})),
        )
        .mount(&server)
        .await;

    let err = assert_err!(
        provider_for(&server)
            .create_record("example.com", "_acme-challenge", "TXT", "tok123", 600)
            .await
    );

    assert!(err.is_provider());
    assert!(err.to_string().contains("no record ID"), "got {}", err);
}

#[tokio::test]
async fn update_record_sends_all_fields() {
    let server = MockServer::start().await;

    signed_get("UpdateDomainRecord")
        .and(query_param("RecordId", "9001"))
        .and(query_param("RR", "_acme-challenge"))
        .and(query_param("Type", "TXT"))
        .and(query_param("Value", "tok-new"))
        .and(query_param("TTL", "120"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "RequestId": "R-update",
            "RecordId": "9001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(
        provider_for(&server)
            .update_record("9001", "_acme-challenge", "TXT", "tok-new", 120)
            .await
    );
}

#[tokio::test]
async fn delete_record_sends_record_id() {
    let server = MockServer::start().await;

    signed_get("DeleteDomainRecord")
        .and(query_param("RecordId", "9001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "RequestId": "R-delete",
            "RecordId": "9001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(provider_for(&server).delete_record("9001").await);
}

#[tokio::test]
async fn forbidden_response_is_authentication_error() {
    let server = MockServer::start().await;

    signed_get("DescribeDomainRecords")
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "RequestId": "R-denied",
            "Code": "InvalidAccessKeyId.NotFound",
            "Message": "Specified access key is not found."
        })))
        .mount(&server)
        .await;

    let err = assert_err!(
        provider_for(&server)
            .list_records("example.com", "_acme-challenge", "TXT")
            .await
    );
    let msg = err.to_string();

    assert!(err.is_provider());
    assert!(msg.contains("Authentication failed"), "got {}", msg);
    assert!(msg.contains("InvalidAccessKeyId.NotFound"));
    assert!(msg.contains("R-denied"));
    assert!(!msg.contains(SECRET));
}

#[tokio::test]
async fn throttled_response_is_rate_limit_error() {
    let server = MockServer::start().await;

    signed_get("DeleteDomainRecord")
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "RequestId": "R-throttle",
            "Code": "Throttling.User",
            "Message": "Request was denied due to user flow control."
        })))
        .mount(&server)
        .await;

    let err = assert_err!(provider_for(&server).delete_record("9001").await);
    assert!(err.to_string().contains("Rate limit exceeded"), "got {}", err);
}

#[tokio::test]
async fn malformed_success_body_is_provider_error() {
    let server = MockServer::start().await;

    signed_get("DescribeDomainRecords")
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = assert_err!(
        provider_for(&server)
            .list_records("example.com", "_acme-challenge", "TXT")
            .await
    );

    assert!(err.is_provider());
    assert!(err.to_string().contains("Invalid DescribeDomainRecords response"), "got {}", err);
}
