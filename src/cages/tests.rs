use crate::common::test_helpers::{create, get_json, id_of, post_json, put_json};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_cage_crud_operations() {
    let app = setup_test_app().await;
    let cage = create(
        &app,
        "/api/cages",
        &json!({"barcode": 4401, "rack": "A", "rack_position": "3"}),
    )
    .await;
    assert_eq!(cage["label"], "4401");

    let (status, body) = put_json(
        &app,
        &format!("/api/cages/{}", id_of(&cage)),
        &json!({"rack_position": "4"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["rack_position"], "4");
    assert_eq!(body["barcode"], 4401);

    create(&app, "/api/cages", &json!({"barcode": 12})).await;
    let (status, body) = get_json(&app, "/api/cages").await;
    assert_eq!(status, StatusCode::OK);
    let barcodes: Vec<i64> = body
        .as_array()
        .expect("list of cages")
        .iter()
        .filter_map(|cage| cage["barcode"].as_i64())
        .collect();
    assert_eq!(barcodes, vec![12, 4401]);
}

#[tokio::test]
async fn test_duplicate_barcode_rejected() {
    let app = setup_test_app().await;
    create(&app, "/api/cages", &json!({"barcode": 7})).await;
    let (status, _) = post_json(&app, "/api/cages", &json!({"barcode": 7})).await;
    assert!(!status.is_success());
}
