use crate::common::test_helpers::{
    create, create_test_animal, create_test_researcher, create_test_strain, get_json, id_of,
    put_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_study_strains_and_experiments() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let study = create(
        &app,
        "/api/studies",
        &json!({
            "description": "High fat diet and insulin resistance",
            "start_date": "2024-01-01",
            "strain_ids": [id_of(&strain)],
        }),
    )
    .await;
    let study_id = id_of(&study);
    assert_eq!(study["strain_ids"], json!([id_of(&strain)]));

    for date in ["2024-02-01", "2024-03-01"] {
        create(
            &app,
            "/api/experiments",
            &json!({
                "date": date,
                "feeding_state": "fed",
                "study_id": study_id,
                "researcher_ids": [],
            }),
        )
        .await;
    }
    create(
        &app,
        "/api/experiments",
        &json!({"date": "2024-04-01", "feeding_state": "fed", "researcher_ids": []}),
    )
    .await;

    let (status, body) = get_json(&app, &format!("/api/studies/{study_id}/experiments")).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .expect("experiments of the study")
        .iter()
        .filter_map(|experiment| experiment["date"].as_str())
        .collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-01"]);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = get_json(&app, &format!("/api/studies/{missing}/experiments")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_treatment_links() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({})).await;
    let researcher = create_test_researcher(&app, "Innocence", "Harvey").await;
    let drug = create(
        &app,
        "/api/pharmaceuticals",
        &json!({"drug": "Metformin", "dose": "250 mg/kg", "recurrence": "daily", "mode": "water"}),
    )
    .await;

    let treatment = create(
        &app,
        "/api/treatments",
        &json!({
            "name": "Metformin in water",
            "animal_ids": [id_of(&animal)],
            "researcher_ids": [id_of(&researcher)],
            "implantation_ids": [],
            "pharmaceutical_ids": [id_of(&drug)],
        }),
    )
    .await;
    assert_eq!(treatment["animal_ids"], json!([id_of(&animal)]));
    assert_eq!(treatment["pharmaceutical_ids"], json!([id_of(&drug)]));

    let (status, body) = get_json(&app, "/api/treatments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["researcher_ids"], json!([id_of(&researcher)]));

    // Only the supplied link set is replaced
    let (status, body) = put_json(
        &app,
        &format!("/api/treatments/{}", id_of(&treatment)),
        &json!({"animal_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["animal_ids"], json!([]));
    assert_eq!(body["researcher_ids"], json!([id_of(&researcher)]));
    assert_eq!(body["pharmaceutical_ids"], json!([id_of(&drug)]));
}

#[tokio::test]
async fn test_study_update_keeps_strains() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let study = create(
        &app,
        "/api/studies",
        &json!({"description": "Leptin and thermogenesis", "strain_ids": [id_of(&strain)]}),
    )
    .await;
    let url = format!("/api/studies/{}", id_of(&study));

    let (status, body) = put_json(&app, &url, &json!({"description": "Leptin and cold exposure"})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["description"], "Leptin and cold exposure");
    assert_eq!(body["strain_ids"], json!([id_of(&strain)]));

    let (status, body) = put_json(&app, &url, &json!({"strain_ids": []})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["strain_ids"], json!([]));
}

#[tokio::test]
async fn test_cohort_slug_is_set_once() {
    let app = setup_test_app().await;
    let cohort = create(
        &app,
        "/api/cohorts",
        &json!({"name": "Spring 2024 HFD", "animal_ids": [], "treatment_ids": []}),
    )
    .await;
    assert_eq!(cohort["slug"], "spring-2024-hfd");

    let (status, body) = put_json(
        &app,
        &format!("/api/cohorts/{}", id_of(&cohort)),
        &json!({"name": "Spring 2024 High Fat"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["name"], "Spring 2024 High Fat");
    assert_eq!(body["slug"], "spring-2024-hfd");
}
