//! Integration tests using wiremock to simulate the address API.

use http::{HeaderMap, StatusCode};
use serde_json::json;
use smarty_street::transport::{PreparedRequest, RawResponse, Transport};
use smarty_street::{
    AddressInput, AddressOptional, Client, Credentials, Error, StatusKind, ValidationError,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> Client {
    Client::builder()
        .base_url(format!("{}/street-address", mock_server.uri()))
        .unwrap()
        .credentials(Credentials::new("test-id", "test-token"))
        .build()
        .unwrap()
}

fn candidate(input_index: usize, candidate_index: usize, line: &str) -> serde_json::Value {
    json!({
        "input_index": input_index,
        "candidate_index": candidate_index,
        "delivery_line_1": line,
        "last_line": "Provo UT 84604-4405",
        "components": {"city_name": "Provo", "state_abbreviation": "UT", "zipcode": "84604"},
        "metadata": {"latitude": 40.27658, "longitude": -111.65759, "time_zone": "Mountain"},
        "analysis": {"dpv_match_code": "Y"}
    })
}

#[tokio::test]
async fn test_successful_get_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .and(query_param("auth-id", "test-id"))
        .and(query_param("auth-token", "test-token"))
        .and(query_param("street", "3214 N University Ave"))
        .and(query_param("city", "Provo"))
        .and(query_param("state", "UT"))
        .and(query_param("candidates", "2"))
        .and(query_param("input_id", "row-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            candidate(0, 0, "3214 N University Ave"),
            candidate(0, 1, "3214 N University Ave Ste 1"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let input = AddressInput::new()
        .street("3214 N University Ave")
        .city("Provo")
        .state("UT")
        .candidates(2);
    let optional = AddressOptional::new().input_id("row-1");

    let response = client.get_address(&input, Some(&optional)).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].delivery_line_1, "3214 N University Ave");
    assert_eq!(response.data[1].candidate_index, 1);
    assert_eq!(response.data[0].components.city_name, "Provo");
    assert!(response.data[0].analysis.dpv_match().is_deliverable());
    assert!(response.raw_body.contains("Provo"));
}

#[tokio::test]
async fn test_freeform_get_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .and(query_param("street", "1 Rosedale, Baltimore, MD"))
        .and(query_param("candidates", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let input = AddressInput::new().freeform("1 Rosedale, Baltimore, MD");

    let response = client.get_address(&input, None).await.unwrap();
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn test_successful_post_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/street-address"))
        .and(query_param("auth-id", "batch-id"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!([
            {"street": "3214 N University Ave", "city": "Provo", "state": "UT", "candidates": 1},
            {"street": "1 Rosedale", "zipcode": "21229", "candidates": 5, "input_id": "second"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            candidate(0, 0, "first"),
            candidate(1, 0, "second"),
            candidate(1, 1, "third"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let inputs = vec![
        AddressInput::new()
            .street("3214 N University Ave")
            .city("Provo")
            .state("UT"),
        AddressInput::new()
            .credentials(Credentials::new("batch-id", "batch-token"))
            .street("1 Rosedale")
            .zipcode("21229")
            .candidates(5),
    ];
    let optionals = vec![None, Some(AddressOptional::new().input_id("second"))];

    let response = client
        .post_addresses(&inputs, Some(&optionals))
        .await
        .unwrap();

    let lines: Vec<_> = response
        .iter()
        .map(|c| c.delivery_line_1.as_str())
        .collect();
    assert_eq!(lines, vec!["first", "second", "third"]);
    assert_eq!(response.for_input(1).count(), 2);
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_address(&AddressInput::new().freeform("x"), None)
        .await;

    match result {
        Err(Error::HttpError {
            status,
            kind,
            raw_response,
            ..
        }) => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(kind, StatusKind::Unauthorized);
            assert_eq!(raw_response, "Unauthorized");
        }
        _ => panic!("Expected HttpError, got {:?}", result),
    }
}

#[tokio::test]
async fn test_documented_status_codes() {
    let cases = [
        (400, StatusKind::BadRequest),
        (402, StatusKind::PaymentRequired),
        (413, StatusKind::RequestTooLarge),
        (429, StatusKind::TooManyRequests),
        (500, StatusKind::Unexpected),
    ];

    for (code, expected) in cases {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/street-address"))
            .respond_with(ResponseTemplate::new(code))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .post_addresses(&[AddressInput::new().freeform("x")], None)
            .await
            .unwrap_err();

        assert_eq!(err.status().map(|s| s.as_u16()), Some(code));
        assert_eq!(err.status_kind(), Some(expected));
    }
}

#[tokio::test]
async fn test_truncated_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/street-address"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"input_index": 0, "deli"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_address(&AddressInput::new().freeform("x"), None)
        .await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            status,
            ..
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, r#"[{"input_index": 0, "deli"#);
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_address(&AddressInput::new().street("1 Rosedale"), None)
        .await;

    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::IncompleteStreet))
    ));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(format!("{}/street-address", mock_server.uri()))
        .unwrap()
        .credentials(Credentials::new("test-id", "test-token"))
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let result = client
        .get_address(&AddressInput::new().freeform("x"), None)
        .await;
    assert!(matches!(result, Err(Error::Timeout)), "got {:?}", result);
}

#[tokio::test]
async fn test_default_headers_reach_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "test-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(format!("{}/street-address", mock_server.uri()))
        .unwrap()
        .credentials(Credentials::new("test-id", "test-token"))
        .default_header("User-Agent", "test-agent")
        .unwrap()
        .build()
        .unwrap();

    client
        .get_address(&AddressInput::new().freeform("x"), None)
        .await
        .unwrap();
}

/// Records every request and answers with a canned response.
#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<PreparedRequest>>>,
}

impl Transport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> smarty_street::Result<RawResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: "[]".to_string(),
        })
    }
}

#[tokio::test]
async fn test_invalid_batch_entry_blocks_request() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .credentials(Credentials::new("id", "token"))
        .build_with_transport(transport.clone())
        .unwrap();

    let inputs = vec![
        AddressInput::new().freeform("ok"),
        AddressInput::new().city("Provo").state("UT"),
        AddressInput::new().street("1 Rosedale").zipcode("21229"),
    ];

    match client.post_addresses(&inputs, None).await {
        Err(Error::InvalidBatch { failures, total }) => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 1);
            assert_eq!(failures[0].reason, ValidationError::MissingAddress);
        }
        other => panic!("Expected InvalidBatch, got {:?}", other),
    }
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credentials_blocks_request() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .build_with_transport(transport.clone())
        .unwrap();

    let result = client
        .get_address(&AddressInput::new().freeform("x"), None)
        .await;

    assert!(matches!(result, Err(Error::MissingCredentials)));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_length_mismatch() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .credentials(Credentials::new("id", "token"))
        .build_with_transport(transport.clone())
        .unwrap();

    let inputs = vec![
        AddressInput::new().freeform("a"),
        AddressInput::new().freeform("b"),
    ];
    let optionals = vec![Some(AddressOptional::new().addressee("ACME"))];

    let result = client.post_addresses(&inputs, Some(&optionals)).await;

    assert!(matches!(
        result,
        Err(Error::LengthMismatch {
            inputs: 2,
            optionals: 1
        })
    ));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_prepared_request_can_be_sent_later() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .credentials(Credentials::new("id", "token"))
        .build_with_transport(transport.clone())
        .unwrap();

    let input = AddressInput::new()
        .street("1 Rosedale")
        .zipcode("21229")
        .candidates(15);
    let request = client.prepare_get(&input, None).unwrap();
    assert!(request
        .url
        .as_str()
        .ends_with("&street=1+Rosedale&zipcode=21229&candidates=10"));

    client.send(request).await.unwrap();

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, http::Method::GET);
}
