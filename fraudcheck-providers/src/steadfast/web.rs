//! Steadfast web dashboard client.

use fraudcheck_core::PhoneNumber;
use fraudcheck_fetch::{CookieJar, FetchError, HttpClient, HttpRequest, HttpResponse, ProviderCredential};
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

use super::csrf::extract_csrf_token;

// ============================================================================
// Constants
// ============================================================================

/// Steadfast site root.
pub const STEADFAST_BASE_URL: &str = "https://www.steadfast.com.bd";

/// Login page and form target.
const LOGIN_ENDPOINT: &str = "/login";

/// Fraud-check endpoint prefix; the phone number is appended.
const FRAUD_CHECK_ENDPOINT: &str = "/user/frauds/check";

/// Browser user agent; the dashboard rejects unknown clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Accept header of the HTML steps.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

// ============================================================================
// Web Client
// ============================================================================

/// Client for the Steadfast web dashboard.
#[derive(Debug, Clone)]
pub struct SteadfastWebClient {
    base_url: String,
}

impl SteadfastWebClient {
    /// Creates a client for the public site.
    pub fn new() -> Self {
        Self::with_base_url(STEADFAST_BASE_URL)
    }

    /// Creates a client for another site root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Site root in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn browser_request(request: HttpRequest, accept: &'static str) -> HttpRequest {
        request
            .header(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT))
            .header(ACCEPT, HeaderValue::from_static(accept))
    }

    /// Logs in and returns the session cookies with their CSRF token.
    #[instrument(skip(self, http, password))]
    pub async fn login(
        &self,
        http: &dyn HttpClient,
        email: &str,
        password: &str,
    ) -> Result<ProviderCredential, FetchError> {
        let login_url = format!("{}{LOGIN_ENDPOINT}", self.base_url);

        let page = http
            .send(Self::browser_request(HttpRequest::get(&login_url), ACCEPT_HTML))
            .await?;
        debug!(status = %page.status, cookies = page.cookies.len(), "Login page response");

        let token = extract_csrf_token(&page.body).ok_or(FetchError::CsrfTokenNotFound)?;

        let form = [("_token", token.as_str()), ("email", email), ("password", password)];
        let request = Self::browser_request(HttpRequest::post(&login_url), ACCEPT_HTML)
            .form(form)
            .cookies(page.cookies.clone())
            .follow_redirects();
        let response = http.send(request).await?;
        debug!(status = %response.status, url = %response.url, "Login form response");

        check_login(&response)?;

        let mut cookies: CookieJar = page.cookies;
        cookies.merge(&response.cookies);
        if cookies.is_empty() {
            return Err(FetchError::AuthenticationFailed("no session cookies".into()));
        }
        Ok(ProviderCredential::session(cookies, token))
    }

    /// Requests the fraud-check page of `phone` with `cookies`.
    ///
    /// Redirects are not followed so an expired session stays observable.
    #[instrument(skip(self, http, cookies), fields(phone = %phone))]
    pub async fn fraud_check(
        &self,
        http: &dyn HttpClient,
        cookies: &CookieJar,
        phone: &PhoneNumber,
    ) -> Result<HttpResponse, FetchError> {
        let url = format!("{}{FRAUD_CHECK_ENDPOINT}/{phone}", self.base_url);
        let request = Self::browser_request(HttpRequest::get(url), "application/json")
            .cookies(cookies.clone());
        let response = http.send(request).await?;
        debug!(status = %response.status, "Fraud check response");
        Ok(response)
    }
}

impl Default for SteadfastWebClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A login that ends on an error status or back on the login page failed.
fn check_login(response: &HttpResponse) -> Result<(), FetchError> {
    if !response.is_success() {
        return Err(FetchError::AuthenticationFailed(format!(
            "login returned {}",
            response.status
        )));
    }
    let path = response
        .url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if path.ends_with(LOGIN_ENDPOINT) {
        return Err(FetchError::AuthenticationFailed("still on login page".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn landed_on(status: u16, url: &str) -> HttpResponse {
        let mut response = HttpResponse::new(StatusCode::from_u16(status).unwrap(), "");
        response.url = url.to_string();
        response
    }

    #[test]
    fn test_check_login() {
        assert!(check_login(&landed_on(200, "https://www.steadfast.com.bd/dashboard")).is_ok());
        assert!(check_login(&landed_on(200, "https://www.steadfast.com.bd/login")).is_err());
        assert!(check_login(&landed_on(200, "https://www.steadfast.com.bd/login/?e=1")).is_err());
        assert!(check_login(&landed_on(422, "https://www.steadfast.com.bd/dashboard")).is_err());
    }

    #[test]
    fn test_base_url_trimmed() {
        assert_eq!(SteadfastWebClient::with_base_url("http://x/").base_url(), "http://x");
    }
}
