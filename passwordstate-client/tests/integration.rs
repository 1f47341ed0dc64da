//! Integration tests for the PasswordState client using wiremock.

use std::time::Duration;

use passwordstate_client::{Client, ClientError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::new(format!("{}/api/passwords", server.uri()), "test-api-key").expect("valid client")
}

#[tokio::test]
async fn get_password_sends_key_to_correct_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/42"))
        .and(header("APIKey", "test-api-key"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "PasswordID": 42,
            "Title": "svc account",
            "UserName": "svc",
            "Password": "s3cr3t"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server)
        .get_password(42)
        .await
        .expect("should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].password_id, 42);
    assert_eq!(records[0].user_name, "svc");
    records[0].password.with_str(|p| assert_eq!(p, "s3cr3t"));
}

#[tokio::test]
async fn get_password_returns_every_record_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "PasswordID": 7, "UserName": "first", "Password": "one" },
            { "PasswordID": 7, "UserName": "second", "Password": "two" }
        ])))
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).get_password(7).await.unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
}

#[tokio::test]
async fn get_password_empty_array_is_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).get_password(9).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn forbidden_maps_envelope_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/42"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!([{
            "errors": [
                { "message": "Invalid API Key" },
                { "phrase": "The API key is not valid for this password list." }
            ]
        }])))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).get_password(42).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("Invalid API Key"), "got: {message}");
            assert!(message.contains("not valid"), "got: {message}");
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/42"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).get_password(42).await.unwrap_err();
    assert!(
        matches!(&err, ClientError::Api { status: 500, message } if message == "internal error"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn invalid_json_maps_to_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).get_password(42).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got: {err:?}");
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/passwords/42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder(format!("{}/api/passwords", mock_server.uri()), "key")
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.get_password(42).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(100)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn connection_refused_maps_to_transport() {
    let client = Client::new("http://127.0.0.1:1/api/passwords", "key").unwrap();
    let err = client.get_password(42).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got: {err:?}");
}
