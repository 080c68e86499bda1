//! The Hypixel API client.

use crate::error::{HypixelError, Result};
use crate::hooks::RequestHooks;
use crate::interpret::{RequestOutcome, RESET_HEADER};
use crate::params::Params;
use crate::rate_limit::RateGate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.hypixel.net/v2/";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "API-Key";

/// Async client for the Hypixel public API.
///
/// Every request passes through the client's [`RateGate`], which holds it
/// back while the server-reported quota is exhausted.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> hypixel_client::error::Result<()> {
/// let client = hypixel_client::HypixelClient::from_env()?;
/// let response = client.player("069a79f4-44e9-4726-a5be-fca90e38aaf5").await?;
/// println!("{} -> {}", response.status, response.text());
/// println!("quota: {}", client.rate_gate().map(|g| g.status().to_string()).unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HypixelClient {
    pub(crate) http: Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) rate_gate: Option<RateGate>,
    pub(crate) hooks: Option<Arc<dyn RequestHooks>>,
}

impl HypixelClient {
    /// Create a new client with the given API key and its own rate gate.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("hypixel-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "HTTP client setup failed, using defaults without timeout or user agent");
                Client::new()
            });

        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_gate: Some(RateGate::new()),
            hooks: None,
        }
    }

    /// Create a client from the `HYPIXEL_API_KEY` environment variable.
    ///
    /// `HYPIXEL_API_URL`, if set, overrides the base URL.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("HYPIXEL_API_KEY").map_err(|_| HypixelError::AuthRequired)?;
        if key.is_empty() {
            return Err(HypixelError::AuthRequired);
        }
        let client = Self::new(key);
        Ok(match std::env::var("HYPIXEL_API_URL") {
            Ok(url) if !url.is_empty() => client.with_base_url(url),
            _ => client,
        })
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Share `gate` with other clients drawing on the same API key.
    pub fn with_rate_gate(mut self, gate: RateGate) -> Self {
        self.rate_gate = Some(gate);
        self
    }

    /// Send requests without any quota coordination.
    pub fn without_rate_gate(mut self) -> Self {
        self.rate_gate = None;
        self
    }

    /// Install request hooks.
    pub fn with_hooks(mut self, hooks: Arc<dyn RequestHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Rotate the API key.
    ///
    /// The learned quota belongs to the old key, so the gate is reset too.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
        if let Some(gate) = &self.rate_gate {
            gate.reset();
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn rate_gate(&self) -> Option<&RateGate> {
        self.rate_gate.as_ref()
    }

    /// Join `path` onto the base URL with exactly one slash between them.
    pub fn full_path(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Add the `API-Key` header to `headers`, keeping everything already there.
    pub fn with_auth(&self, mut headers: HeaderMap) -> Result<HeaderMap> {
        let value = HeaderValue::from_str(&self.api_key)
            .map_err(|_| HypixelError::Config("API key is not a valid header value".into()))?;
        headers.insert(API_KEY_HEADER, value);
        Ok(headers)
    }

    /// Resolve a request to the URL it will be sent to.
    pub fn request_url(&self, request: &Request) -> Result<Url> {
        let full = self.full_path(&request.path);
        let mut url =
            Url::parse(&full).map_err(|e| HypixelError::InvalidUrl(format!("{}: {}", full, e)))?;
        request.params.apply(&mut url);
        Ok(url)
    }

    /// Send a request through the hooks and the rate gate.
    ///
    /// Non-2xx statuses come back as a [`Response`]; use
    /// [`Response::error_for_status`] to turn them into errors.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let url = self.request_url(&request)?;

        if let Some(hooks) = &self.hooks {
            if let Some(response) = hooks.before_request(&request, &url) {
                debug!("request answered by hook");
                return Ok(response);
            }
        }

        if let Some(gate) = &self.rate_gate {
            gate.wait_if_needed().await;
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone());
        if let Some(payload) = &request.payload {
            builder = builder.body(payload.clone());
        }
        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let content = response.bytes().await?.to_vec();

        if let Some(gate) = &self.rate_gate {
            let outcome = RequestOutcome::from_parts(status, &headers, &content);
            match gate.update(&outcome) {
                Ok(quota) => debug!(%quota, status = status.as_u16(), "response received"),
                Err(e) => warn!(error = %e, "ignoring malformed rate limit header"),
            }
        }

        let response = Response {
            path: url.to_string(),
            status: status.as_u16(),
            headers,
            content,
        };
        Ok(match &self.hooks {
            Some(hooks) => hooks.after_response(&request, response),
            None => response,
        })
    }

    /// Make an authenticated GET request. Empty parameter values are dropped.
    pub(crate) async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        let request = Request::get(path)
            .with_params(non_empty(params))
            .with_headers(self.with_auth(HeaderMap::new())?);
        self.execute(request).await
    }

    /// Make an unauthenticated GET request. Empty parameter values are dropped.
    pub(crate) async fn get_public(&self, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        self.execute(Request::get(path).with_params(non_empty(params)))
            .await
    }
}

fn non_empty(params: &[(&str, &str)]) -> Params {
    params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (*k, *v))
        .collect()
}

/// A request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Params,
    pub headers: HeaderMap,
    pub payload: Option<Vec<u8>>,
}

impl Request {
    /// A GET request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            params: Params::new(),
            headers: HeaderMap::new(),
            payload: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// A raw API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Full URL the request was sent to.
    pub path: String,
    /// HTTP status code.
    pub status: u16,
    pub headers: HeaderMap,
    pub content: Vec<u8>,
}

impl Response {
    pub fn new(path: impl Into<String>, status: u16, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            status,
            headers: HeaderMap::new(),
            content: content.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.content)?)
    }

    /// Map error statuses to [`HypixelError`], passing successes through.
    pub fn error_for_status(self) -> Result<Self> {
        match self.status {
            200..=299 => Ok(self),
            403 => Err(HypixelError::AuthRequired),
            404 => Err(HypixelError::NotFound(self.path)),
            429 => {
                let retry_after = self
                    .headers
                    .get(RESET_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(HypixelError::RateLimited { retry_after })
            }
            status => Err(HypixelError::Api {
                status,
                message: self.text().into_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = HypixelClient::new("test-api-key");
        assert_eq!(client.api_key(), "test-api-key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(client.rate_gate().is_some());
    }

    #[test]
    fn test_full_path() {
        let cases = [
            ("https://api.hypixel.net/v2/", "skyblock/auctions", "https://api.hypixel.net/v2/skyblock/auctions"),
            ("https://api.hypixel.net/v2", "skyblock/auctions", "https://api.hypixel.net/v2/skyblock/auctions"),
            ("https://api.hypixel.net/v2/", "", "https://api.hypixel.net/v2/"),
            ("https://api.hypixel.net/v2/", "/skyblock/auctions", "https://api.hypixel.net/v2/skyblock/auctions"),
        ];
        for (base, path, expected) in cases {
            let client = HypixelClient::new("k").with_base_url(base);
            assert_eq!(client.full_path(path), expected, "base={base} path={path}");
        }
    }

    #[test]
    fn test_auth_header_keeps_existing() {
        let client = HypixelClient::new("test1");
        let mut headers = HeaderMap::new();
        headers.insert("head", HeaderValue::from_static("value1"));
        let headers = client.with_auth(headers).unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "test1");
        assert_eq!(headers.get("head").unwrap(), "value1");
    }

    #[test]
    fn test_auth_header_rejects_bad_key() {
        let client = HypixelClient::new("bad\nkey");
        assert!(matches!(
            client.with_auth(HeaderMap::new()),
            Err(HypixelError::Config(_))
        ));
    }

    #[test]
    fn test_request_url_with_params() {
        let client = HypixelClient::new("k");
        let request = Request::get("player")
            .with_params(Params::from_iter([("uuid", "abc")]));
        assert_eq!(
            client.request_url(&request).unwrap().as_str(),
            "https://api.hypixel.net/v2/player?uuid=abc"
        );
    }

    #[test]
    fn test_request_url_invalid_base() {
        let client = HypixelClient::new("k").with_base_url("not a url");
        assert!(matches!(
            client.request_url(&Request::get("player")),
            Err(HypixelError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_empty_params() {
        let params = non_empty(&[("id", ""), ("name", "Sirius")]);
        assert!(!params.contains("id"));
        assert_eq!(params.get("name"), Some("Sirius"));
    }

    #[tokio::test]
    async fn test_set_api_key_resets_gate() {
        let mut client = HypixelClient::new("old");
        let gate = client.rate_gate().unwrap().clone();
        gate.state().write(40, None);
        client.set_api_key("new");
        assert_eq!(client.api_key(), "new");
        assert!(gate.quota().is_unknown());
    }

    #[test]
    fn test_error_for_status() {
        let ok = Response::new("u", 200, b"{}".to_vec());
        assert!(ok.clone().error_for_status().is_ok());

        let mut throttled = Response::new("u", 429, br#"{"throttle":true}"#.to_vec());
        throttled
            .headers
            .insert("RateLimit-Reset", HeaderValue::from_static("12"));
        assert!(matches!(
            throttled.error_for_status(),
            Err(HypixelError::RateLimited { retry_after: Some(d) }) if d == Duration::from_secs(12)
        ));

        let missing = Response::new("u", 404, Vec::new());
        assert!(matches!(missing.error_for_status(), Err(HypixelError::NotFound(_))));
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize)]
        struct Body {
            success: bool,
        }
        let response = Response::new("u", 200, br#"{"success":true}"#.to_vec());
        assert!(response.json::<Body>().unwrap().success);
        assert!(Response::new("u", 200, b"nope".to_vec()).json::<Body>().is_err());
    }
}
