use crate::common::test_helpers::{
    create, create_test_animal, create_test_researcher, create_test_strain, get_json, id_of,
    post_json, put_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn create_experiment(app: &Router, extra: Value) -> Value {
    let mut payload = json!({
        "date": "2024-03-21",
        "feeding_state": "fed",
        "researcher_ids": [],
    });
    crate::common::test_helpers::merge(&mut payload, &extra);
    create(app, "/api/experiments", &payload).await
}

#[tokio::test]
async fn test_experiment_crud_with_researchers() {
    let app = setup_test_app().await;
    let researcher = create_test_researcher(&app, "Erin", "Stephenson").await;

    let experiment = create_experiment(
        &app,
        json!({
            "time": "08:30",
            "feeding_state": "fasted",
            "fasting_time": 16,
            "injection": "Glucose",
            "concentration": "1 g/kg",
            "researcher_ids": [id_of(&researcher)],
        }),
    )
    .await;
    assert_eq!(experiment["label"], "2024-03-21-fasted");
    assert_eq!(experiment["researcher_ids"], json!([id_of(&researcher)]));
    assert_eq!(experiment["injection"], "Glucose");

    let (status, body) = put_json(
        &app,
        &format!("/api/experiments/{}", id_of(&experiment)),
        &json!({"notes": "GTT", "researcher_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["researcher_ids"], json!([]));
}

#[tokio::test]
async fn test_experiment_time_format_validated() {
    let app = setup_test_app().await;
    let (status, _) = post_json(
        &app,
        "/api/experiments",
        &json!({
            "date": "2024-03-21",
            "time": "8h30",
            "feeding_state": "fed",
            "researcher_ids": [],
        }),
    )
    .await;
    assert!(!status.is_success(), "Malformed time was accepted");
}

#[tokio::test]
async fn test_experiments_newest_first() {
    let app = setup_test_app().await;
    create_experiment(&app, json!({"date": "2023-01-01"})).await;
    create_experiment(&app, json!({"date": "2024-06-01"})).await;
    create_experiment(&app, json!({"date": "2023-09-15"})).await;

    let (status, body) = get_json(&app, "/api/experiments").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .expect("list of experiments")
        .iter()
        .filter_map(|experiment| experiment["date"].as_str())
        .collect();
    assert_eq!(dates, vec!["2024-06-01", "2023-09-15", "2023-01-01"]);
}

#[tokio::test]
async fn test_assay_slug_generated() {
    let app = setup_test_app().await;
    let assay = create(
        &app,
        "/api/assays",
        &json!({"name": "Body Weight", "measurement_units": "g"}),
    )
    .await;
    assert_eq!(assay["slug"], "body-weight");

    let (status, body) = post_json(&app, "/api/assays", &json!({"name": "Blood Glucose"})).await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    assert_eq!(body["slug"], "blood-glucose");

    let (status, body) = put_json(
        &app,
        &format!("/api/assays/{}", id_of(&assay)),
        &json!({"slug": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["slug"], "body-weight");
    assert_eq!(body["measurement_units"], "g");
}

#[tokio::test]
async fn test_measurement_label_age_and_bulk_upload() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let strain_id = id_of(&strain);
    let first = create_test_animal(&app, &strain_id, json!({"ear_tag": 11, "born": "2024-01-21"})).await;
    let second = create_test_animal(&app, &strain_id, json!({"ear_tag": 12, "born": "2024-02-01"})).await;
    let assay = create(&app, "/api/assays", &json!({"name": "Blood Glucose"})).await;
    let experiment = create_experiment(&app, json!({})).await;

    let measurement = create(
        &app,
        "/api/measurements",
        &json!({
            "animal_id": id_of(&first),
            "experiment_id": id_of(&experiment),
            "assay_id": id_of(&assay),
            "values": "120,250,180",
        }),
    )
    .await;
    assert_eq!(measurement["label"], "Leptin Knockout-EarTag #11 Blood Glucose");
    assert_eq!(measurement["age_days"], 60);

    let (status, body) = post_json(
        &app,
        &format!("/api/experiments/{}/measurements", id_of(&experiment)),
        &json!({"measurements": [
            {"animal_id": id_of(&first), "assay_id": id_of(&assay), "values": "98"},
            {"animal_id": id_of(&second), "assay_id": id_of(&assay), "values": "101.5"},
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    let created = body.as_array().expect("created measurements");
    assert_eq!(created.len(), 2);
    assert_eq!(created[1]["age_days"], 49);

    let (_, body) = get_json(&app, "/api/measurements").await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_bulk_upload_is_all_or_nothing() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({})).await;
    let assay = create(&app, "/api/assays", &json!({"name": "Body Weight"})).await;
    let experiment = create_experiment(&app, json!({})).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/experiments/{}/measurements", id_of(&experiment)),
        &json!({"measurements": [
            {"animal_id": id_of(&animal), "assay_id": id_of(&assay), "values": "24.1"},
            {"animal_id": id_of(&animal), "assay_id": id_of(&assay), "values": "heavy"},
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, body) = get_json(&app, "/api/measurements").await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let missing = uuid::Uuid::new_v4();
    let (status, _) = post_json(
        &app,
        &format!("/api/experiments/{missing}/measurements"),
        &json!({"measurements": [
            {"animal_id": id_of(&animal), "assay_id": id_of(&assay), "values": "24.1"},
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
