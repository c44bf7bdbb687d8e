//! Tests for lead/contact retrieval (wiremock).

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::amocrm::AmoCrmApi;
use crate::error::ProcessError;
use crate::settings::test_settings;

fn api_with_mock(mock_uri: &str) -> AmoCrmApi {
    let mut api = AmoCrmApi::new(&test_settings());
    api.base_url = mock_uri.to_string();
    api
}

fn lead_body(lead_id: u64, contact_id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": lead_id,
        "price": 5000,
        "custom_fields_values": [],
        "_embedded": { "contacts": [{ "id": contact_id }] }
    })
}

fn contact_body(contact_id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": contact_id,
        "name": "Иван Петров",
        "custom_fields_values": [
            { "field_code": "PHONE", "values": [{ "value": "+79990000000" }] },
            { "field_code": "EMAIL", "values": [{ "value": "ivan@example.com" }] }
        ]
    })
}

#[tokio::test]
async fn fetches_lead_and_first_contact() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/39553937"))
        .and(query_param("with", "contacts"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lead_body(39553937, 777)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/contacts/777"))
        .and(header("Authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contact_body(777)))
        .mount(&mock_server)
        .await;

    let result = api.get_lead_with_contact(39553937).await.unwrap();
    assert_eq!(result.lead.id, 39553937);
    assert_eq!(result.lead.price, 5000);
    assert_eq!(result.contact.id, 777);
    assert_eq!(result.contact.name, "Иван Петров");
}

#[tokio::test]
async fn lead_without_contacts_fails() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "_embedded": { "contacts": [] }
        })))
        .mount(&mock_server)
        .await;

    let err = api.get_lead_with_contact(1).await.unwrap_err();
    assert!(matches!(err, ProcessError::NoContactsForLead(1)));
}

#[tokio::test]
async fn missing_lead_maps_to_not_found() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = api.get_lead_with_contact(2).await.unwrap_err();
    assert!(matches!(err, ProcessError::LeadNotFound(2)));
}

#[tokio::test]
async fn missing_contact_maps_to_not_found() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lead_body(3, 778)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/contacts/778"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = api.get_lead_with_contact(3).await.unwrap_err();
    assert!(matches!(err, ProcessError::ContactNotFound(778)));
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    // First call hits the rate limit, second succeeds.
    Mock::given(method("GET"))
        .and(path("/api/v4/leads/4"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lead_body(4, 779)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/contacts/779"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contact_body(779)))
        .mount(&mock_server)
        .await;

    let result = api.get_lead_with_contact(4).await.unwrap();
    assert_eq!(result.lead.id, 4);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/5"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = api.get_lead_with_contact(5).await.unwrap_err();
    assert!(matches!(
        err,
        ProcessError::HttpStatus(status) if status == reqwest::StatusCode::BAD_REQUEST
    ));
}

#[tokio::test]
async fn malformed_json_fails_with_parse_error() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v4/leads/6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&mock_server)
        .await;

    let err = api.get_lead_with_contact(6).await.unwrap_err();
    assert!(matches!(err, ProcessError::Parse(_)));
}
