//! HTTP client abstraction with tracing, cookie handling and domain allowlist.
//!
//! Couriers talk to the network only through the [`HttpClient`] trait so
//! tests can swap in a fake. [`ReqwestHttpClient`] is the production
//! implementation and adds:
//! - Request/response tracing
//! - Domain allowlist for security
//! - Manual redirect following with cookie collection on every hop

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, redirect};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cookies::CookieJar;
use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum redirects followed for a single request.
const MAX_REDIRECTS: usize = 10;

/// User agent string for `FraudCheck`.
const USER_AGENT: &str = concat!("FraudCheck/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Request / Response
// ============================================================================

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON body.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` body.
    Form(Vec<(String, String)>),
}

/// An outgoing HTTP request.
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra request headers.
    pub headers: HeaderMap,
    /// Body.
    pub body: RequestBody,
    /// Cookies to send.
    pub cookies: CookieJar,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    /// Whether 3xx responses are followed.
    pub follow_redirects: bool,
}

impl HttpRequest {
    /// Creates a request with no body, headers or cookies.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            cookies: CookieJar::new(),
            bearer: None,
            follow_redirects: false,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Sets a form body.
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Sets the cookies to send.
    #[must_use]
    pub fn cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Follows 3xx responses.
    #[must_use]
    pub fn follow_redirects(mut self) -> Self {
        self.follow_redirects = true;
        self
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies and tokens carry credentials.
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("cookies", &self.cookies.len())
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .field("follow_redirects", &self.follow_redirects)
            .finish_non_exhaustive()
    }
}

/// A received HTTP response, fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final status code.
    pub status: StatusCode,
    /// Final response headers.
    pub headers: HeaderMap,
    /// Cookies set by every response in the redirect chain, later hops win.
    pub cookies: CookieJar,
    /// Body text.
    pub body: String,
    /// URL of the final response.
    pub url: String,
}

impl HttpResponse {
    /// Creates a response with no headers or cookies.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            cookies: CookieJar::new(),
            body: body.into(),
            url: String::new(),
        }
    }

    /// Attaches cookies.
    #[must_use]
    pub fn with_cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }

    /// Attaches a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns true for 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true for 3xx.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// `Location` header, if present.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

// ============================================================================
// HTTP Client Trait
// ============================================================================

/// Transport used by every courier.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a request and buffers the response.
    ///
    /// Non-2xx statuses are responses, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// ============================================================================
// Reqwest Client
// ============================================================================

/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl ReqwestHttpClient {
    /// Creates a client with default timeouts.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeouts(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Creates a client with custom total and connect timeouts.
    pub fn with_timeouts(timeout: Duration, connect_timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut url = Url::parse(&request.url)?;
        let mut method = request.method.clone();
        let mut body = request.body;
        let mut outgoing = request.cookies;
        let mut received = CookieJar::new();

        for hop in 0..=MAX_REDIRECTS {
            self.is_domain_allowed(&url)?;
            debug!(hop, url = %url, "Sending request");

            let mut builder = self
                .inner
                .request(method.clone(), url.clone())
                .headers(request.headers.clone());
            if let Some(ref token) = request.bearer {
                builder = builder.bearer_auth(token);
            }
            if !outgoing.is_empty() {
                builder = builder.header(header::COOKIE, outgoing.to_header());
            }
            builder = match body {
                RequestBody::Empty => builder,
                RequestBody::Json(ref value) => builder.json(value),
                RequestBody::Form(ref fields) => builder.form(fields),
            };

            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            debug!(status = %status, "Response received");

            let set = CookieJar::from_set_cookie(headers.get_all(header::SET_COOKIE));
            outgoing.merge(&set);
            received.merge(&set);

            let next = headers
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .filter(|_| request.follow_redirects && status.is_redirection());

            if let Some(location) = next {
                url = url.join(location)?;
                if matches!(
                    status,
                    StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
                ) {
                    method = Method::GET;
                    body = RequestBody::Empty;
                }
                continue;
            }

            let text = response.text().await?;
            return Ok(HttpResponse {
                status,
                headers,
                cookies: received,
                body: text,
                url: url.to_string(),
            });
        }

        Err(HttpError::TooManyRedirects(MAX_REDIRECTS))
    }
}

// ============================================================================
// Tests
// ============================================================================
