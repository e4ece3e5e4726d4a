//! Minimal JSON HTTP client with safe logging and pluggable auth.
//!
//! - Request options: headers, [`Auth`], query params, timeout
//! - Redacts sensitive query params and never logs secret values
//! - Signs requests with OAuth 1.0a when asked to (see [`oauth`])
//! - Optional *raw* response logging via `SWEEPER_HTTP_RAW=1`
//!
//! There is no retry loop: every call is attempted exactly once and the first
//! failure is returned to the caller.
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), sweeper_http::HttpError> {
//! let client = sweeper_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", sweeper_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers (including rate-limit headers), decode failures and API
//! errors. Raw bodies go to target `http.raw` when `SWEEPER_HTTP_RAW=1`.

pub mod oauth;

pub use oauth::OAuth1Keys;
pub use reqwest::StatusCode;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

const RAW_ENV: &str = "SWEEPER_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for API errors; `None` for failures before a response arrived.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// How a request is authenticated.
///
/// ```
/// use sweeper_http::Auth;
///
/// assert_eq!(Auth::None.kind(), "none");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: OAuth ... (HMAC-SHA1 user context)
    OAuth1(&'a OAuth1Keys),
    None,
}

impl Auth<'_> {
    /// Label used in logs in place of the credential itself.
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::OAuth1(_) => "oauth1",
            Auth::None => "none",
        }
    }
}

/// Per-request knobs.
///
/// ```
/// use sweeper_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("count", "200".into())]),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    /// Applied when a request does not set its own; `None` waits indefinitely.
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use sweeper_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.twitter.com/1.1/")?;
    /// assert!(client.default_timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: None,
        })
    }

    /// Bound every request by `dur` unless the request overrides it.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET and decode a JSON response.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json_internal(Method::GET, path, opts).await
    }

    /// POST with parameters carried in the query string and no body.
    pub async fn post_query<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json_internal(Method::POST, path, opts).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_json_internal<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let pairs: Vec<(&str, &str)> = opts
            .query
            .as_ref()
            .map(|q| q.iter().map(|(k, v)| (*k, v.as_ref())).collect())
            .unwrap_or_default();

        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }
        if !pairs.is_empty() {
            rb = rb.query(&pairs);
        }
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        match &opts.auth {
            Some(Auth::OAuth1(keys)) => {
                // The signature is computed over the URL without its query.
                let mut signed_url = url.clone();
                signed_url.set_query(None);
                signed_url.set_fragment(None);
                let header = keys.authorization(method.as_str(), signed_url.as_str(), &pairs)?;
                let value = HeaderValue::from_str(&header)
                    .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
                rb = rb.header(AUTHORIZATION, value);
            }
            Some(Auth::None) | None => {}
        }

        let req_id = uuid::Uuid::new_v4().simple().to_string();
        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?redact_pairs(&pairs),
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            auth_kind,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let x_request_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-transaction-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%x_request_id,
            rate_limit.limit=?header_str("x-rate-limit-limit"),
            rate_limit.remaining=?header_str("x-rate-limit-remaining"),
            rate_limit.reset=?header_str("x-rate-limit-reset"),
            "http.response.headers"
        );

        if raw_enabled() {
            let end = bytes.len().min(RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                body=%String::from_utf8_lossy(&bytes[..end]),
                truncated = bytes.len() > RAW_MAX_BODY
            );
        }

        let snippet = snip_body(&bytes);

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            x_request_id=%x_request_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: x_request_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
            | "oauth_token"
            | "oauth_consumer_key"
    )
}

fn redact_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| {
            let shown = if is_secret_param(k) { "<redacted>" } else { v };
            ((*k).to_string(), shown.to_string())
        })
        .collect()
}

/// Pull a human-readable message out of common error envelopes.
fn extract_error_message(body: &[u8]) -> String {
    // Twitter v1.1: {"errors":[{"code":144,"message":"No status found with that ID."}]}
    // Twitter v2:   {"errors":[{"detail":"...","title":"..."}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }

    // Generic: {"message":"..."} / {"detail":"..."} / {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            let text = [first.message, first.detail, first.title]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            return match first.code {
                Some(code) => format!("{text} (code {code})"),
                None => text,
            };
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if let Some(text) = [m.message, m.detail, m.error]
            .into_iter()
            .find(|s| !s.is_empty())
        {
            return text;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
