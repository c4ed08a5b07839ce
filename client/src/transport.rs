use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use walls_protocol::{ApiRequest, Endpoint, Method, parse_error_message};

use crate::error::{ClientError, TOKEN_EXPIRED_MESSAGE};

pub const API_URL: &str = "https://api.knights-il.com/api";

/// Headers a browser session sends with every API call
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "en,he;q=0.9"),
    ("cache-control", "no-cache"),
    ("content-type", "application/json"),
    ("pragma", "no-cache"),
    ("priority", "u=1, i"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"143\", \"Chromium\";v=\"143\", \"Not A(Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
];

/// Status plus parsed JSON body (`Null` when the body is empty or not JSON)
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn message(&self) -> String {
        parse_error_message(&self.body).unwrap_or_else(|| "Unknown error".to_string())
    }

    /// Authorization failure caused by a stale token
    pub fn is_token_expired(&self) -> bool {
        matches!(self.status, 401 | 403)
            && parse_error_message(&self.body)
                .map(|m| m.contains(TOKEN_EXPIRED_MESSAGE))
                .unwrap_or(false)
    }
}

/// One HTTP round trip. The token is passed per call, never cached.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest, token: Option<&str>)
    -> Result<RawResponse, ClientError>;
}

/// reqwest-backed transport to the live API
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser headers, plus the bearer token when the endpoint takes one
    fn headers(endpoint: Endpoint, token: Option<&str>) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        for &(name, value) in BROWSER_HEADERS {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }

        if let Some(token) = token.filter(|_| endpoint.requires_auth()) {
            let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::Auth("Token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(headers)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(API_URL)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse, ClientError> {
        let url = format!("{}/{}", self.base_url, request.endpoint.path());

        let builder = match request.endpoint.method() {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };

        let mut builder = builder.headers(Self::headers(request.endpoint, token)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::trace!(url = %url, status, "Request completed");

        Ok(RawResponse { status, body })
    }
}
