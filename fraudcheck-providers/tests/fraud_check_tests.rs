//! End-to-end fraud checks against mocked courier endpoints.

use std::time::Duration;

use fraudcheck_core::{CourierKind, DeliveryStats, FailureKind};
use fraudcheck_fetch::{CookieJar, ProviderCredential};
use fraudcheck_providers::FraudChecker;
use fraudcheck_store::{Config, PathaoConfig, RedxConfig, SteadfastConfig};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE: &str = "01712345678";

const LOGIN_PAGE: &str = r#"<html><body>
<form method="POST" action="/login">
    <input type="hidden" name="_token" value="csrf-123">
    <input type="email" name="email">
</form>
</body></html>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Config Helpers
// ============================================================================

fn steadfast_section(server: &MockServer) -> SteadfastConfig {
    SteadfastConfig {
        email: "ops@example.com".into(),
        password: "sf-secret".into(),
        base_url: Some(server.uri()),
    }
}

fn pathao_section(server: &MockServer) -> PathaoConfig {
    PathaoConfig {
        username: "ops@example.com".into(),
        password: "pt-secret".into(),
        base_url: Some(server.uri()),
    }
}

fn redx_section(server: &MockServer) -> RedxConfig {
    RedxConfig {
        phone: "01898765432".into(),
        password: "rx-secret".into(),
        api_base_url: Some(server.uri()),
        base_url: Some(server.uri()),
    }
}

// ============================================================================
// Mock Helpers
// ============================================================================

async fn mount_pathao_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_string_contains("pt-secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"access_token": "p-tok", "expires_in": 3600}"#),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_steadfast_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "XSRF-TOKEN=xsrf-1; Path=/")
                .append_header("set-cookie", "steadfast_session=pre; Path=/; HttpOnly")
                .set_body_string(LOGIN_PAGE),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("_token=csrf-123"))
        .and(header_regex("cookie", "steadfast_session=pre"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/dashboard")
                .append_header("set-cookie", "steadfast_session=fresh; Path=/; HttpOnly"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Dashboard</html>"))
        .mount(server)
        .await;
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_mixed_outcomes_in_one_report() {
    init_tracing();
    let steadfast = MockServer::start().await;
    let pathao = MockServer::start().await;
    let redx = MockServer::start().await;

    // Pathao: fresh login, then stats.
    mount_pathao_login(&pathao, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/success"))
        .and(header("authorization", "Bearer p-tok"))
        .and(body_string_contains(PHONE))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": {"customer": {"successful_delivery": 8, "total_delivery": 10}}}"#,
        ))
        .expect(1)
        .mount(&pathao)
        .await;

    // Steadfast: the cached session is rejected once, then a new login works.
    Mock::given(method("GET"))
        .and(path(format!("/user/frauds/check/{PHONE}")))
        .and(header_regex("cookie", "steadfast_session=stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&steadfast)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/user/frauds/check/{PHONE}")))
        .and(header_regex("cookie", "steadfast_session=fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"total_delivered": 5, "total_cancelled": 1}"#),
        )
        .expect(1)
        .mount(&steadfast)
        .await;
    mount_steadfast_login(&steadfast).await;

    // RedX: login rejected.
    Mock::given(method("POST"))
        .and(path("/v4/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message": "invalid"}"#))
        .expect(1)
        .mount(&redx)
        .await;

    let mut config = Config::default();
    config.couriers.steadfast = Some(steadfast_section(&steadfast));
    config.couriers.pathao = Some(pathao_section(&pathao));
    config.couriers.redx = Some(redx_section(&redx));
    let checker = FraudChecker::from_config(&config).unwrap();

    let stale: CookieJar = [("steadfast_session", "stale")].into_iter().collect();
    checker
        .context()
        .credentials
        .put(
            "steadfast_auth_data",
            ProviderCredential::session(stale, "old-csrf"),
            Duration::from_secs(600),
        )
        .await
        .unwrap();

    let report = checker.check(PHONE).await.unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(
        report.get(CourierKind::Pathao).unwrap().stats(),
        Some(&DeliveryStats { success: 8, cancel: 2, total: 10 })
    );
    assert_eq!(
        report.get(CourierKind::Steadfast).unwrap().stats(),
        Some(&DeliveryStats { success: 5, cancel: 1, total: 6 })
    );
    let failure = report.get(CourierKind::Redx).unwrap().failure().unwrap();
    assert_eq!(failure.reason, "authentication failed");
    assert_eq!(failure.kind, FailureKind::Authentication);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["results"]["pathao"]["total"], 10);
    assert_eq!(json["results"]["redx"]["error"], "authentication failed");

    // The new session replaced the stale one.
    let cached = checker
        .context()
        .credentials
        .get("steadfast_auth_data")
        .await
        .unwrap()
        .unwrap();
    let (cookies, csrf) = cached.as_session().unwrap();
    assert_eq!(cookies.get("steadfast_session"), Some("fresh"));
    assert_eq!(cookies.get("XSRF-TOKEN"), Some("xsrf-1"));
    assert_eq!(csrf, "csrf-123");
}

#[tokio::test]
async fn test_missing_csrf_token() {
    init_tracing();
    let steadfast = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&steadfast)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&steadfast)
        .await;

    let mut config = Config::default();
    config.couriers.steadfast = Some(steadfast_section(&steadfast));
    let checker = FraudChecker::from_config(&config).unwrap();

    let report = checker.check(PHONE).await.unwrap();
    let failure = report.get(CourierKind::Steadfast).unwrap().failure().unwrap();
    assert_eq!(failure.reason, "CSRF token not found");
}

#[tokio::test]
async fn test_token_reused_across_checks() {
    init_tracing();
    let pathao = MockServer::start().await;
    mount_pathao_login(&pathao, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/success"))
        .and(header("authorization", "Bearer p-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": {"customer": {"successful_delivery": 1, "total_delivery": 1}}}"#,
        ))
        .expect(2)
        .mount(&pathao)
        .await;

    let mut config = Config::default();
    config.couriers.pathao = Some(pathao_section(&pathao));
    let checker = FraudChecker::from_config(&config).unwrap();

    for _ in 0..2 {
        let report = checker.check(PHONE).await.unwrap();
        assert!(report.get(CourierKind::Pathao).unwrap().is_success());
    }
}

#[tokio::test]
async fn test_invalid_phone_makes_no_requests() {
    init_tracing();
    let pathao = MockServer::start().await;
    mount_pathao_login(&pathao, 0).await;

    let mut config = Config::default();
    config.couriers.pathao = Some(pathao_section(&pathao));
    let checker = FraudChecker::from_config(&config).unwrap();

    for phone in ["123", "01212345678", "+8801712345678", "017-1234-5678"] {
        let err = checker.check(phone).await.unwrap_err();
        assert!(err.is_validation(), "{phone}");
    }
}

#[tokio::test]
async fn test_second_rejection_is_terminal() {
    init_tracing();
    let pathao = MockServer::start().await;
    mount_pathao_login(&pathao, 2).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/success"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&pathao)
        .await;

    let mut config = Config::default();
    config.couriers.pathao = Some(pathao_section(&pathao));
    let checker = FraudChecker::from_config(&config).unwrap();

    let result = checker
        .check_courier(CourierKind::Pathao, PHONE)
        .await
        .unwrap();
    let failure = result.failure().unwrap();
    assert_eq!(failure.reason, "failed to retrieve customer data");
    assert_eq!(failure.status, Some(401));

    // The rejected token is not kept.
    let cached = checker.context().credentials.get("pathao_access_token").await.unwrap();
    assert!(cached.is_none());
}

#[tokio::test]
async fn test_session_rejected_after_relogin() {
    init_tracing();
    let steadfast = MockServer::start().await;
    mount_steadfast_login(&steadfast).await;
    Mock::given(method("GET"))
        .and(path(format!("/user/frauds/check/{PHONE}")))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/login"))
        .expect(2)
        .mount(&steadfast)
        .await;

    let mut config = Config::default();
    config.couriers.steadfast = Some(steadfast_section(&steadfast));
    let checker = FraudChecker::from_config(&config).unwrap();

    let result = checker
        .check_courier(CourierKind::Steadfast, PHONE)
        .await
        .unwrap();
    let failure = result.failure().unwrap();
    assert_eq!(failure.reason, "session rejected after re-authentication");
    assert_eq!(failure.kind, FailureKind::Authentication);
}

#[tokio::test]
async fn test_invalid_steadfast_payload_not_retried() {
    init_tracing();
    let steadfast = MockServer::start().await;
    mount_steadfast_login(&steadfast).await;
    Mock::given(method("GET"))
        .and(path(format!("/user/frauds/check/{PHONE}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&steadfast)
        .await;

    let mut config = Config::default();
    config.couriers.steadfast = Some(steadfast_section(&steadfast));
    let checker = FraudChecker::from_config(&config).unwrap();

    let result = checker
        .check_courier(CourierKind::Steadfast, PHONE)
        .await
        .unwrap();
    assert_eq!(result.failure().unwrap().reason, "invalid response from provider");
}

#[tokio::test]
async fn test_redx_stats_with_country_prefix() {
    init_tracing();
    let redx = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/auth/login"))
        .and(body_string_contains("8801898765432"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"data": {"accessToken": "r-tok"}}"#),
        )
        .expect(1)
        .mount(&redx)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/redx_se/admin/parcel/customer-success-return-rate"))
        .and(query_param("phoneNumber", "8801712345678"))
        .and(header("authorization", "Bearer r-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": {"totalParcels": "12", "deliveredParcels": 9}}"#,
        ))
        .expect(1)
        .mount(&redx)
        .await;

    let mut config = Config::default();
    config.couriers.redx = Some(redx_section(&redx));
    let checker = FraudChecker::from_config(&config).unwrap();

    let result = checker.check_courier(CourierKind::Redx, PHONE).await.unwrap();
    assert_eq!(
        result.stats(),
        Some(&DeliveryStats { success: 9, cancel: 3, total: 12 })
    );
}

#[tokio::test]
async fn test_upstream_error_keeps_status() {
    init_tracing();
    let pathao = MockServer::start().await;
    mount_pathao_login(&pathao, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/success"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&pathao)
        .await;

    let mut config = Config::default();
    config.couriers.pathao = Some(pathao_section(&pathao));
    let checker = FraudChecker::from_config(&config).unwrap();

    let report = checker.check(PHONE).await.unwrap();
    let failure = report.get(CourierKind::Pathao).unwrap().failure().unwrap();
    assert_eq!(failure.kind, FailureKind::Upstream);
    assert_eq!(failure.status, Some(503));
}
