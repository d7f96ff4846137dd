use crate::common::test_helpers::{
    create, create_test_animal, create_test_researcher, create_test_strain, get_json, id_of,
    post_json, put_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_researcher_name_slug() {
    let app = setup_test_app().await;
    let researcher = create_test_researcher(&app, "Dave", "Bridges").await;
    assert_eq!(researcher["name_slug"], "dave-bridges");
    assert_eq!(researcher["active"], true);

    let (status, body) = put_json(
        &app,
        &format!("/api/researchers/{}", id_of(&researcher)),
        &json!({"active": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["active"], false);
    assert_eq!(body["name_slug"], "dave-bridges");

    let (status, body) = put_json(
        &app,
        &format!("/api/researchers/{}", id_of(&researcher)),
        &json!({"name_slug": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["name_slug"], "dave-bridges");
    assert_eq!(body["first_name"], "Dave");

    let second = create_test_researcher(&app, "Erin", "Stephenson").await;
    assert_eq!(second["name_slug"], "erin-stephenson");
}

#[tokio::test]
async fn test_diet_requires_vendor() {
    let app = setup_test_app().await;
    let vendor = create(
        &app,
        "/api/vendors",
        &json!({"name": "Harlan Teklad", "website": "https://example.org"}),
    )
    .await;

    let diet = create(
        &app,
        "/api/diets",
        &json!({
            "vendor_id": id_of(&vendor),
            "description": "High fat diet",
            "product_id": "TD.06414",
            "fat_content": 60,
            "irradiated": true,
        }),
    )
    .await;
    assert_eq!(diet["fat_content"], 60);

    let (status, _) = post_json(
        &app,
        "/api/diets",
        &json!({"vendor_id": uuid::Uuid::new_v4(), "irradiated": false}),
    )
    .await;
    assert!(!status.is_success(), "Diet with unknown vendor was accepted");
}

#[tokio::test]
async fn test_pharmaceutical_label_and_mode() {
    let app = setup_test_app().await;
    let drug = create(
        &app,
        "/api/pharmaceuticals",
        &json!({
            "drug": "Dexamethasone",
            "dose": "1 mg/kg",
            "recurrence": "daily",
            "mode": "oral gavage",
        }),
    )
    .await;
    assert_eq!(drug["label"], "Dexamethasone at 1 mg/kg, daily");
    assert_eq!(drug["mode"], "oral gavage");

    let (status, _) = post_json(
        &app,
        "/api/pharmaceuticals",
        &json!({"drug": "X", "dose": "1", "recurrence": "once", "mode": "nasal"}),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_transplantation_donors() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    let donor = create_test_animal(&app, &id_of(&strain), json!({})).await;

    let transplantation = create(
        &app,
        "/api/transplantations",
        &json!({
            "tissue": "Brown adipose",
            "transplant_date": "2024-02-02",
            "donor_ids": [id_of(&donor)],
        }),
    )
    .await;
    assert_eq!(transplantation["donor_ids"], json!([id_of(&donor)]));

    let (status, body) = get_json(
        &app,
        &format!("/api/transplantations/{}", id_of(&transplantation)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor_ids"], json!([id_of(&donor)]));
}

#[tokio::test]
async fn test_environment_crud() {
    let app = setup_test_app().await;
    let environment = create(
        &app,
        "/api/environments",
        &json!({"building": "MSRB II", "room": "B-042", "temperature": 22, "humidity": 40}),
    )
    .await;

    let (status, body) = get_json(&app, &format!("/api/environments/{}", id_of(&environment))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "B-042");

    create(
        &app,
        "/api/implantations",
        &json!({"implant": "Osmotic pump", "product_id": "1002"}),
    )
    .await;
    let (_, body) = get_json(&app, "/api/implantations").await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
