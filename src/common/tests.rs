use super::models::{HealthCheck, UIConfiguration};
use super::{current, invalid};
use crate::common::test_helpers::get_json;
use crate::config::Config;
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use sea_orm::ActiveValue;

#[test]
fn test_ui_configuration_from_config() {
    let config = Config::for_tests();
    let ui = UIConfiguration::from(&config);
    assert_eq!(ui.client_id, "test-ui");
    assert_eq!(ui.realm, "test-realm");
    assert_eq!(ui.deployment, "test");

    let json = serde_json::to_value(&ui).unwrap();
    assert_eq!(json["clientId"], "test-ui");
    assert!(json.get("client_id").is_none());
}

#[test]
fn test_health_check_serialization() {
    let health = HealthCheck {
        status: "ok".to_string(),
    };
    assert_eq!(serde_json::to_string(&health).unwrap(), r#"{"status":"ok"}"#);
}

#[test]
fn test_current_reads_set_and_unchanged_values() {
    assert_eq!(current(&ActiveValue::Set(3)), Some(&3));
    assert_eq!(current(&ActiveValue::Unchanged(4)), Some(&4));
    assert_eq!(current::<i32>(&ActiveValue::NotSet), None);
}

#[test]
fn test_invalid_uses_validation_prefix() {
    let err = invalid("weaned", "cannot precede born");
    assert!(matches!(
        err,
        sea_orm::DbErr::Custom(ref msg) if msg == "Validation failed: weaned cannot precede born"
    ));
}

#[tokio::test]
async fn test_healthz() {
    let app = setup_test_app().await;
    let (status, body) = get_json(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ui_config_endpoint() {
    let app = setup_test_app().await;
    let (status, body) = get_json(&app, "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientId"], "test-ui");
    assert_eq!(body["realm"], "test-realm");
}
