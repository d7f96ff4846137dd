//! Request helpers and record builders shared by the feature test suites.
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    payload: Option<&Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    extract_response_body(response).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, "GET", uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, Some(payload)).await
}

pub async fn put_json(app: &Router, uri: &str, payload: &Value) -> (StatusCode, Value) {
    send_json(app, "PUT", uri, Some(payload)).await
}

/// GET returning the raw body, content type and status (CSV exports)
pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

/// POSTs `payload` to `uri` and returns the created record, failing the test otherwise
pub async fn create(app: &Router, uri: &str, payload: &Value) -> Value {
    let (status, body) = post_json(app, uri, payload).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create record at {uri}: {body:?}"
    );
    body
}

/// Copies the top-level fields of `overrides` into `payload`
pub fn merge(payload: &mut Value, overrides: &Value) {
    if let (Some(target), Some(overrides)) = (payload.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            target.insert(key.clone(), value.clone());
        }
    }
}

pub fn id_of(record: &Value) -> String {
    record["id"].as_str().expect("record has an id").to_string()
}

pub async fn create_test_strain(app: &Router, name: &str) -> Value {
    create(app, "/api/strains", &json!({ "name": name })).await
}

/// Alive animal of `strain_id`; `extra` fields override the defaults.
pub async fn create_test_animal(app: &Router, strain_id: &str, extra: Value) -> Value {
    let mut payload = json!({
        "strain_id": strain_id,
        "background": "C57BL/6-BA",
        "genotype": "N.D.",
        "gender": "F",
    });
    merge(&mut payload, &extra);
    create(app, "/api/animals", &payload).await
}

/// Active breeding cage of `strain_id`; `extra` fields override the defaults.
pub async fn create_test_breeding(app: &Router, strain_id: &str, extra: Value) -> Value {
    let mut payload = json!({
        "strain_id": strain_id,
        "background": "C57BL/6-BA",
        "genotype": "+/-",
        "timed_mating": false,
        "female_ids": [],
        "male_ids": [],
    });
    merge(&mut payload, &extra);
    create(app, "/api/breedings", &payload).await
}

pub async fn create_test_researcher(app: &Router, first_name: &str, last_name: &str) -> Value {
    create(
        app,
        "/api/researchers",
        &json!({
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}@example.org", first_name.to_lowercase()),
        }),
    )
    .await
}
