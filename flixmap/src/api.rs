//! Client for the availability backend
//!
//! Two endpoints: `POST {base}/search` and `GET {base}/countries/{id}/{type}`,
//! both answering with a `{ success, message?, data }` envelope. HTTP status
//! codes are not interpreted; the envelope is authoritative.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::state::{BackendHealth, MediaType, TitleSummary};

/// Backend used when the app is opened from a loopback origin.
pub const DEV_API_BASE: &str = "http://localhost:5000/api";

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Please enter a title")]
    Validation,
    /// Successful response without any entries
    #[error("{0}")]
    NotFound(String),
    /// `success: false` envelope
    #[error("{0}")]
    Backend(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("Invalid origin URL: {0}")]
    InvalidBase(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

pub const SEARCH_FAILED: &str = "Search failed";
pub const NO_RESULTS: &str = "No results found";
pub const COUNTRIES_FAILED: &str = "Could not fetch availability data";
pub const NO_AVAILABILITY: &str = "No Netflix availability found for this title";

/// Picks the API base for the origin the app was opened from: loopback hosts
/// talk to the local development server, anything else to `/api` on the same
/// origin.
pub fn resolve_api_base(origin: &str) -> Result<String, ApiError> {
    let url =
        reqwest::Url::parse(origin).map_err(|e| ApiError::InvalidBase(format!("{origin}: {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| ApiError::InvalidBase(format!("{origin}: missing host")))?;

    if LOOPBACK_HOSTS.contains(&host) {
        return Ok(DEV_API_BASE.to_string());
    }
    Ok(format!("{}/api", url.origin().ascii_serialization()))
}

/// Trims the query, rejecting blank input before anything is sent.
pub fn normalize_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation);
    }
    Ok(trimmed)
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

fn decode_envelope<T: DeserializeOwned>(value: Value) -> Result<Envelope<T>, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn backend_message(message: Option<String>, fallback: &str) -> String {
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub struct CatalogClient<T = HttpTransport> {
    base: String,
    transport: T,
}

impl CatalogClient<HttpTransport> {
    pub fn http(base: impl Into<String>) -> Self {
        Self::new(base, HttpTransport::new())
    }
}

impl<T: Transport> CatalogClient<T> {
    pub fn new(base: impl Into<String>, transport: T) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Searches titles. Never returns an empty list: no hits is `NotFound`.
    pub async fn search_titles(&self, query: &str) -> Result<Vec<TitleSummary>, ApiError> {
        let query = normalize_query(query)?;
        let url = format!("{}/search", self.base);
        tracing::debug!(%url, query, "searching titles");

        let body = serde_json::json!({ "query": query });
        let envelope: Envelope<TitleSummary> =
            decode_envelope(self.transport.post_json(&url, &body).await?)?;

        if !envelope.success {
            return Err(ApiError::Backend(backend_message(
                envelope.message,
                SEARCH_FAILED,
            )));
        }
        if envelope.data.is_empty() {
            return Err(ApiError::NotFound(NO_RESULTS.to_string()));
        }
        tracing::debug!(count = envelope.data.len(), "search returned titles");
        Ok(envelope.data)
    }

    /// Country names carrying the title. Never returns an empty list.
    pub async fn fetch_countries(
        &self,
        title_id: &str,
        media_type: MediaType,
    ) -> Result<Vec<String>, ApiError> {
        let url = format!(
            "{}/countries/{}/{}",
            self.base,
            urlencoding::encode(title_id),
            media_type.as_str()
        );
        tracing::debug!(%url, "fetching availability");

        let envelope: Envelope<String> = decode_envelope(self.transport.get_json(&url).await?)?;

        if !envelope.success {
            return Err(ApiError::Backend(backend_message(
                envelope.message,
                COUNTRIES_FAILED,
            )));
        }
        if envelope.data.is_empty() {
            return Err(ApiError::NotFound(NO_AVAILABILITY.to_string()));
        }
        Ok(envelope.data)
    }

    pub async fn health(&self) -> Result<BackendHealth, ApiError> {
        let url = format!("{}/health", self.base);
        let value = self.transport.get_json(&url).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loopback_origins_use_dev_server() {
        for origin in [
            "http://localhost:5173",
            "http://127.0.0.1:8080/app",
            "http://[::1]:3000",
        ] {
            assert_eq!(resolve_api_base(origin).as_deref(), Ok(DEV_API_BASE));
        }
    }

    #[test]
    fn other_origins_use_relative_api() {
        assert_eq!(
            resolve_api_base("https://watch.example.com/some/page").as_deref(),
            Ok("https://watch.example.com/api")
        );
        assert_eq!(
            resolve_api_base("http://192.168.1.20:8000").as_deref(),
            Ok("http://192.168.1.20:8000/api")
        );
    }

    #[test]
    fn bad_origin_is_rejected() {
        assert!(matches!(
            resolve_api_base("not a url"),
            Err(ApiError::InvalidBase(_))
        ));
    }

    #[test]
    fn blank_queries_fail_validation() {
        assert_eq!(normalize_query("   "), Err(ApiError::Validation));
        assert_eq!(normalize_query("\t\n"), Err(ApiError::Validation));
        assert_eq!(normalize_query("  Dark "), Ok("Dark"));
        assert_eq!(ApiError::Validation.to_string(), "Please enter a title");
    }

    #[test]
    fn empty_backend_message_uses_fallback() {
        assert_eq!(backend_message(Some("  ".into()), SEARCH_FAILED), SEARCH_FAILED);
        assert_eq!(backend_message(None, COUNTRIES_FAILED), COUNTRIES_FAILED);
        assert_eq!(backend_message(Some("Rate limited".into()), SEARCH_FAILED), "Rate limited");
    }
}
