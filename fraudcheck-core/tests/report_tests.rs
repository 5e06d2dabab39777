//! Integration tests for report types.

use fraudcheck_core::{CourierKind, DeliveryStats, FraudReport, PhoneNumber, ProviderResult};

#[test]
fn test_report_serialization_roundtrip() {
    let mut report = FraudReport::new(PhoneNumber::parse("01912345678").unwrap());
    report.insert(CourierKind::Steadfast, DeliveryStats::from_success_and_cancel(0, 0));
    let json = serde_json::to_string(&report).unwrap();
    let parsed: FraudReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 1);
    assert!(parsed.combined().is_empty());
}

#[test]
fn test_deserialized_stats_validation() {
    let stats: DeliveryStats =
        serde_json::from_str(r#"{"success":3,"cancel":1,"total":4}"#).unwrap();
    assert!(stats.validate().is_ok());

    let broken: DeliveryStats =
        serde_json::from_str(r#"{"success":3,"cancel":1,"total":9}"#).unwrap();
    assert!(broken.validate().is_err());
}

#[test]
fn test_invalid_phone_is_validation_error() {
    let err = PhoneNumber::parse("0171234").unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("0171234"));
}

#[test]
fn test_result_accessors() {
    let result = ProviderResult::from(DeliveryStats::from_success_and_total(1, 2));
    assert!(result.is_success());
    assert!(result.failure().is_none());
}
