//! Client tests against an in-memory transport
//!
//! The transport records every URL it is asked for, so tests can check both
//! the decoded result and whether a request went out at all.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flixmap::api::{ApiError, CatalogClient, Transport, COUNTRIES_FAILED, SEARCH_FAILED};
use flixmap::state::MediaType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct FakeTransport {
    response: Arc<Mutex<Option<Result<Value, ApiError>>>>,
    requests: Arc<Mutex<Vec<(String, Option<Value>)>>>,
}

impl FakeTransport {
    fn answering(value: Value) -> Self {
        let fake = Self::default();
        *fake.response.lock().unwrap() = Some(Ok(value));
        fake
    }

    fn failing(error: ApiError) -> Self {
        let fake = Self::default();
        *fake.response.lock().unwrap() = Some(Err(error));
        fake
    }

    fn requests(&self) -> Vec<(String, Option<Value>)> {
        self.requests.lock().unwrap().clone()
    }

    fn reply(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.cloned()));
        self.response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Transport("no response configured".into())))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.reply(url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.reply(url, Some(body))
    }
}

fn client(fake: &FakeTransport) -> CatalogClient<FakeTransport> {
    CatalogClient::new("http://localhost:5000/api/", fake.clone())
}

#[tokio::test]
async fn search_returns_items_in_server_order() {
    let fake = FakeTransport::answering(json!({
        "success": true,
        "data": [
            {"id": "tt2", "type": "movie", "title": "Inception", "year": 2010,
             "poster": "https://img/2.jpg", "rating": 8.8},
            {"id": 3, "type": "tv", "title": "Inception: The Cobol Job", "year": "2010"}
        ]
    }));

    let items = client(&fake).search_titles("  Inception ").await.unwrap();

    let ids: Vec<_> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["tt2", "3"]);
    assert_eq!(items[1].media_type, MediaType::Tv);

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "http://localhost:5000/api/search");
    assert_eq!(requests[0].1, Some(json!({"query": "Inception"})));
}

#[tokio::test]
async fn blank_query_never_hits_the_network() {
    let fake = FakeTransport::answering(json!({"success": true, "data": []}));

    for query in ["", "   ", "\t"] {
        let result = client(&fake).search_titles(query).await;
        assert_eq!(result, Err(ApiError::Validation));
    }
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn empty_search_is_not_found() {
    let fake = FakeTransport::answering(json!({"success": true, "data": []}));
    let err = client(&fake).search_titles("zzzz").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No results found");
}

#[tokio::test]
async fn search_failure_uses_server_message_or_default() {
    let fake = FakeTransport::answering(json!({"success": false, "message": "TMDB is down"}));
    let err = client(&fake).search_titles("Dark").await.unwrap_err();
    assert_eq!(err, ApiError::Backend("TMDB is down".into()));

    let fake = FakeTransport::answering(json!({"success": false}));
    let err = client(&fake).search_titles("Dark").await.unwrap_err();
    assert_eq!(err.to_string(), SEARCH_FAILED);
}

#[tokio::test]
async fn countries_url_encodes_id_and_type() {
    let fake = FakeTransport::answering(json!({"success": true, "data": ["Brazil", "Japan"]}));

    let countries = client(&fake)
        .fetch_countries("tt 1/2", MediaType::Tv)
        .await
        .unwrap();

    assert_eq!(countries, vec!["Brazil".to_string(), "Japan".to_string()]);
    assert_eq!(
        fake.requests()[0].0,
        "http://localhost:5000/api/countries/tt%201%2F2/tv"
    );
}

#[tokio::test]
async fn countries_failure_and_empty() {
    let fake = FakeTransport::answering(json!({"success": false}));
    let err = client(&fake)
        .fetch_countries("tt001", MediaType::Movie)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), COUNTRIES_FAILED);

    let fake = FakeTransport::answering(json!({"success": true, "data": []}));
    let err = client(&fake)
        .fetch_countries("tt001", MediaType::Movie)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn transport_errors_pass_through() {
    let fake = FakeTransport::failing(ApiError::Transport("connection refused".into()));
    let err = client(&fake).search_titles("Dark").await.unwrap_err();
    assert_eq!(err.to_string(), "Network error: connection refused");
}

#[tokio::test]
async fn health_decodes_backend_status() {
    let fake = FakeTransport::answering(json!({"status": "ok", "api_key_configured": true}));
    let health = client(&fake).health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.api_key_configured);
    assert_eq!(fake.requests()[0].0, "http://localhost:5000/api/health");
}
