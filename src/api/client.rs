/// HTTP client for the paginated image feed
///
/// The backend exposes a single listing endpoint that wraps its result in a
/// `{"status": ..., "payload": ...}` envelope. Pagination is client-owned: a
/// record offset advanced in page-size steps and sent as `offset`/`limit`
/// query parameters. The offset is only committed once a fetch succeeds, so
/// retrying after a failure re-requests the same page.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::state::data::ImageRecord;

/// What can go wrong talking to the backend
///
/// The view never matches on these; they exist so the transport keeps its
/// context until the message is stringified at the display boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Response envelope used by every backend endpoint
///
/// On `"ok"` the payload is the record array; on anything else it is an
/// object carrying a `message` string.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Client for the feed API, holding the HTTP connection pool, the resolved
/// endpoints, and the page cursor
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
    s3_base: Url,
    page_size: u64,
    /// Offset of the page currently on screen; `None` until the first page
    /// has loaded
    loaded_offset: Option<u64>,
}

impl ApiClient {
    /// Build a client from the startup configuration
    pub fn new(config: &Config) -> Result<Self, String> {
        let endpoint = Url::parse(&format!(
            "http://{}:{}/api",
            config.api_hostname, config.api_port
        ))
        .map_err(|e| format!("Invalid API endpoint: {}", e))?;

        // The trailing slash matters: Url::join replaces the last path
        // segment when it is missing
        let s3_base = Url::parse(&format!(
            "http://{}:{}/{}/",
            config.s3_hostname, config.s3_port, config.s3_bucket_name
        ))
        .map_err(|e| format!("Invalid object-storage endpoint: {}", e))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ImageStream/0.1")
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(ApiClient {
            http,
            endpoint,
            s3_base,
            page_size: config.page_size,
            loaded_offset: None,
        })
    }

    /// Cheap handle to the connection pool for async tasks
    pub fn http(&self) -> reqwest::Client {
        self.http.clone()
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset of the page a "next" click should request
    pub fn next_offset(&self) -> u64 {
        match self.loaded_offset {
            Some(offset) => offset + self.page_size,
            None => 0,
        }
    }

    /// Offset of the page a "previous" click should request, or `None` when
    /// the first page (or nothing) is on screen
    pub fn prev_offset(&self) -> Option<u64> {
        match self.loaded_offset {
            Some(offset) if offset > 0 => Some(offset.saturating_sub(self.page_size)),
            _ => None,
        }
    }

    /// Record that the page at `offset` is now on screen
    pub fn commit(&mut self, offset: u64) {
        self.loaded_offset = Some(offset);
    }

    /// Resolve a record's image link to a fetchable URL
    ///
    /// Absolute links pass through untouched; bare object keys are joined
    /// onto the configured bucket base.
    pub fn resolve_image_url(&self, link: &str) -> Option<Url> {
        if let Ok(absolute) = Url::parse(link) {
            return Some(absolute);
        }
        self.s3_base.join(link.trim_start_matches('/')).ok()
    }
}

/// Fetch one page of records
///
/// No retry, no backoff: the first failure is surfaced to the caller. The
/// envelope is decoded regardless of the HTTP status code because the
/// backend reports its own failures as `{"status": "error"}` bodies.
pub async fn fetch_page(
    http: reqwest::Client,
    endpoint: Url,
    offset: u64,
    limit: u64,
) -> Result<Vec<ImageRecord>, ApiError> {
    let response = http
        .get(endpoint)
        .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
        .send()
        .await?;

    let body = response.text().await?;
    parse_envelope(&body)
}

/// Download one image binary
pub async fn fetch_image(http: reqwest::Client, url: Url) -> Result<Vec<u8>, ApiError> {
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Decode a listing response body into records
fn parse_envelope(body: &str) -> Result<Vec<ImageRecord>, ApiError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;

    if envelope.status != "ok" {
        let message = envelope
            .payload
            .get("message")
            .and_then(|value| value.as_str())
            .unwrap_or("no message");
        return Err(ApiError::Backend(message.to_string()));
    }

    Ok(serde_json::from_value(envelope.payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api_hostname: "api.example".to_string(),
            api_port: 5001,
            s3_hostname: "s3.example".to_string(),
            s3_port: 9000,
            s3_bucket_name: "cats".to_string(),
            column_count: 4,
            page_size: 12,
        }
    }

    #[test]
    fn test_endpoint_built_from_config() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://api.example:5001/api");
    }

    #[test]
    fn test_cursor_starts_at_zero() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.next_offset(), 0);
        assert_eq!(client.prev_offset(), None);
    }

    #[test]
    fn test_cursor_advances_only_on_commit() {
        let mut client = ApiClient::new(&test_config()).unwrap();

        // A fetch that never settles successfully leaves the cursor alone
        assert_eq!(client.next_offset(), 0);
        assert_eq!(client.next_offset(), 0);

        client.commit(0);
        assert_eq!(client.next_offset(), 12);

        client.commit(12);
        assert_eq!(client.next_offset(), 24);
        assert_eq!(client.prev_offset(), Some(0));
    }

    #[test]
    fn test_previous_unavailable_on_first_page() {
        let mut client = ApiClient::new(&test_config()).unwrap();
        client.commit(0);
        assert_eq!(client.prev_offset(), None);
    }

    #[test]
    fn test_absolute_link_passes_through() {
        let client = ApiClient::new(&test_config()).unwrap();
        let url = client
            .resolve_image_url("http://elsewhere.example/a/b.jpg")
            .unwrap();
        assert_eq!(url.as_str(), "http://elsewhere.example/a/b.jpg");
    }

    #[test]
    fn test_bare_key_joins_bucket_base() {
        let client = ApiClient::new(&test_config()).unwrap();
        let url = client.resolve_image_url("2020/01/cat.jpg").unwrap();
        assert_eq!(url.as_str(), "http://s3.example:9000/cats/2020/01/cat.jpg");
    }

    #[test]
    fn test_leading_slash_key_stays_inside_bucket() {
        let client = ApiClient::new(&test_config()).unwrap();
        let url = client.resolve_image_url("/cat.jpg").unwrap();
        assert_eq!(url.as_str(), "http://s3.example:9000/cats/cat.jpg");
    }

    #[test]
    fn test_ok_envelope_yields_records() {
        let records = parse_envelope(
            r#"{"status": "ok", "payload": [{"s3_image_link": "a.jpg"}, {"s3_image_link": "b.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].s3_image_link, "b.jpg");
    }

    #[test]
    fn test_ok_envelope_with_empty_page() {
        let records = parse_envelope(r#"{"status": "ok", "payload": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_error_envelope_surfaces_message() {
        let error =
            parse_envelope(r#"{"status": "error", "payload": {"message": "No status"}}"#)
                .unwrap_err();
        assert_eq!(error.to_string(), "backend error: No status");
    }

    #[test]
    fn test_error_envelope_without_message() {
        let error = parse_envelope(r#"{"status": "error"}"#).unwrap_err();
        assert_eq!(error.to_string(), "backend error: no message");
    }

    #[test]
    fn test_non_json_body_is_a_decode_error() {
        let error = parse_envelope("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(error, ApiError::Decode(_)));
    }
}
