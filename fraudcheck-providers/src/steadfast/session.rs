//! Session expiry detection.

use fraudcheck_fetch::HttpResponse;
use reqwest::StatusCode;

/// Body fragment that only appears when the dashboard bounced us to login.
pub const LOGIN_MARKER: &str = "/login";

/// Laravel's "page expired" status for a stale CSRF session.
const PAGE_EXPIRED: u16 = 419;

/// Decides whether a stats response means the session is no longer valid.
pub type SessionExpiredPredicate = fn(&HttpResponse) -> bool;

/// Default [`SessionExpiredPredicate`].
///
/// True for any redirect, 401, 419, or a body mentioning the login page.
pub fn is_session_expired(response: &HttpResponse) -> bool {
    response.is_redirect()
        || response.status == StatusCode::UNAUTHORIZED
        || response.status.as_u16() == PAGE_EXPIRED
        || response.body.contains(LOGIN_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(StatusCode::from_u16(status).unwrap(), body)
    }

    #[test]
    fn test_expired_signals() {
        assert!(is_session_expired(&response(302, "")));
        assert!(is_session_expired(&response(401, "")));
        assert!(is_session_expired(&response(419, "Page Expired")));
        assert!(is_session_expired(&response(
            200,
            r#"<a href="https://www.steadfast.com.bd/login">Login</a>"#
        )));
    }

    #[test]
    fn test_live_session() {
        assert!(!is_session_expired(&response(
            200,
            r#"{"total_delivered": 3, "total_cancelled": 1}"#
        )));
        assert!(!is_session_expired(&response(500, "Server Error")));
    }
}
