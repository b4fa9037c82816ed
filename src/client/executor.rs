//! Request Executor: one authenticated round trip, classified.
//!
//! Outcome classes:
//! - 2xx + JSON body   -> `Reply::Json`
//! - 2xx + empty body  -> `Reply::Empty` (mutations such as connection close)
//! - 401 / 403         -> `AuthenticationFailed`
//! - other non-2xx < 500 -> `RequestRejected` with the broker's error payload
//! - 5xx, transport error, timeout -> `BrokerUnavailable`
//!
//! Nothing is retried here; retry policy belongs to the caller.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{MgmtError, Result};
use crate::utils::utils_time::elapsed_ms;

/// Longest broker error text carried into an error value.
const MAX_REASON_LEN: usize = 512;

// ========================================
// REPLY
// ========================================

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(Value),
    Empty,
}

// ========================================
// REQUEST
// ========================================

/// A management call before it is bound to the base endpoint.
///
/// Path segments are raw identifiers; they are percent-encoded (including
/// `/` and `%`) when the URL is built, so a vhost named `/` becomes `%2F`.
/// Dot segments are normalized away by URL parsing and are refused.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub segments: Vec<&'a str>,
    pub headers: Vec<(&'static str, String)>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, segments: &[&'a str]) -> Self {
        Self {
            method,
            segments: segments.to_vec(),
            headers: Vec::new(),
        }
    }

    pub fn get(segments: &[&'a str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn delete(segments: &[&'a str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

// ========================================
// EXECUTOR
// ========================================

struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Shared, read-only after construction. Cloning is cheap: the transport
/// handle and endpoint are reference counted.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base: Arc<Url>,
    credentials: Arc<Credentials>,
    timeout: Option<Duration>,
}

impl RequestExecutor {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| MgmtError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base: Arc::new(base),
            credentials: Arc::new(Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
            }),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Same endpoint, credentials and connection pool; different timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self.clone()
        }
    }

    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        build_url(&self.base, segments)
    }

    pub async fn execute(&self, request: ApiRequest<'_>) -> Result<Reply> {
        let url = self.url(&request.segments)?;
        let method = request.method.clone();
        let started = Instant::now();

        tracing::debug!(method = %method, path = %url.path(), "management request");

        let mut builder = self
            .http
            .request(request.method, url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = %url.path(), error = %e, "management request failed");
            MgmtError::from(e)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(MgmtError::from)?;

        tracing::debug!(
            method = %method,
            path = %url.path(),
            status = status.as_u16(),
            elapsed_ms = elapsed_ms(started),
            "management response"
        );

        let outcome = classify(status, &body);
        if let Err(err) = &outcome {
            tracing::warn!(method = %method, path = %url.path(), error = %err, "management call unsuccessful");
        }
        outcome
    }
}

// ========================================
// HELPERS
// ========================================

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| MgmtError::InvalidConfig(format!("invalid base url '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MgmtError::InvalidConfig(format!(
            "base url '{}' must use http or https",
            raw
        )));
    }
    if url.cannot_be_a_base() {
        return Err(MgmtError::InvalidConfig(format!(
            "base url '{}' cannot carry a path",
            raw
        )));
    }
    Ok(url)
}

fn build_url(base: &Url, segments: &[&str]) -> Result<Url> {
    if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
        return Err(MgmtError::InvalidIdentifier(bad.to_string()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| MgmtError::InvalidConfig(format!("base url '{}' cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Maps a received HTTP status and body to an outcome.
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Reply> {
    if status.is_success() {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Reply::Empty);
        }
        return serde_json::from_slice(body)
            .map(Reply::Json)
            .map_err(|e| MgmtError::malformed("response", format!("invalid JSON body: {}", e)));
    }

    let code = status.as_u16();
    let (error, reason) = broker_error(status, body);
    match code {
        401 | 403 => Err(MgmtError::AuthenticationFailed { status: code, reason }),
        code if code >= 500 => Err(MgmtError::unavailable(Some(code), reason)),
        _ => Err(MgmtError::RequestRejected { status: code, error, reason }),
    }
}

/// Broker error bodies look like `{"error": "...", "reason": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct BrokerErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    reason: Option<Value>,
}

fn field_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Anything that is not a broker error object is carried as plain text.
fn broker_error(status: StatusCode, body: &[u8]) -> (String, String) {
    let fallback = status.canonical_reason().unwrap_or("unknown status").to_string();

    match serde_json::from_slice::<BrokerErrorBody>(body) {
        Ok(parsed) => {
            let error = field_text(parsed.error).unwrap_or_else(|| fallback.clone());
            let reason = field_text(parsed.reason).unwrap_or_else(|| error.clone());
            (error, truncate(reason))
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let reason = if text.is_empty() { fallback.clone() } else { truncate(text) };
            (fallback, reason)
        }
    }
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_REASON_LEN {
        let mut cut = MAX_REASON_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
