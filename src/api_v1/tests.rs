use crate::common::test_helpers::{
    create, create_test_animal, create_test_strain, get_json, id_of, post_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_animal_collection_pagination() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    for tag in 1..=25 {
        create_test_animal(&app, &id_of(&strain), json!({"ear_tag": tag})).await;
    }

    let (status, body) = get_json(&app, "/api/v1/animals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"], json!({"limit": 20, "offset": 0, "total_count": 25}));
    assert_eq!(body["objects"].as_array().unwrap().len(), 20);

    let (_, body) = get_json(&app, "/api/v1/animals?limit=10&offset=20").await;
    assert_eq!(body["objects"].as_array().unwrap().len(), 5);
    assert_eq!(body["objects"][0]["ear_tag"], 21);

    let (status, body) = get_json(&app, "/api/v1/animals?limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["limit"], 0);
    assert_eq!(body["objects"].as_array().unwrap().len(), 25);

    let (status, body) = get_json(&app, "/api/v1/animals?limit=0&offset=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"], json!({"limit": 0, "offset": 5, "total_count": 25}));
    assert_eq!(body["objects"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_animal_filters_and_embedded_strain() {
    let app = setup_test_app().await;
    let leptin = create_test_strain(&app, "Leptin Knockout").await;
    let wildtype = create_test_strain(&app, "C57BL/6J").await;
    create_test_animal(
        &app,
        &id_of(&leptin),
        json!({"ear_tag": 1, "gender": "M", "cage": 5, "genotype": "-/-", "born": "2024-01-01"}),
    )
    .await;
    create_test_animal(
        &app,
        &id_of(&leptin),
        json!({"ear_tag": 2, "cage": 6, "born": "2024-06-01", "death": "2024-08-01", "cause_of_death": "Sacrificed"}),
    )
    .await;
    create_test_animal(&app, &id_of(&wildtype), json!({"ear_tag": 3, "cage": 5})).await;

    let (status, body) = get_json(&app, "/api/v1/animals?strain=leptin-knockout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_count"], 2);
    assert_eq!(body["objects"][0]["strain"]["name"], "Leptin Knockout");
    assert_eq!(body["objects"][0]["label"], "Leptin Knockout-EarTag #1");
    assert!(body["objects"][0]["age_days"].is_i64());

    let (_, body) = get_json(&app, "/api/v1/animals?cage=5&gender=M").await;
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["ear_tag"], 1);

    let (_, body) = get_json(&app, "/api/v1/animals?alive=false").await;
    assert_eq!(body["objects"][0]["cause_of_death"], "Sacrificed");
    assert_eq!(body["meta"]["total_count"], 1);

    let (_, body) = get_json(&app, "/api/v1/animals?born_after=2024-01-01").await;
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["ear_tag"], 2);

    let (_, body) = get_json(&app, "/api/v1/animals?born_before=2024-06-01").await;
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["ear_tag"], 1);

    let (_, body) = get_json(&app, "/api/v1/animals?strain=missing").await;
    assert_eq!(body["meta"]["total_count"], 0);
}

#[tokio::test]
async fn test_animal_detail() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({"ear_tag": 8})).await;

    let (status, body) = get_json(&app, &format!("/api/v1/animals/{}", id_of(&animal))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ear_tag"], 8);
    assert_eq!(body["strain"]["slug"], "obob");

    let (status, _) = get_json(&app, &format!("/api/v1/animals/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_strain_name_filter() {
    let app = setup_test_app().await;
    create_test_strain(&app, "Ob/Ob").await;
    let wildtype = create_test_strain(&app, "C57BL/6J").await;

    let (status, body) = get_json(&app, "/api/v1/strains?name=C57BL%2F6J").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["id"], wildtype["id"]);

    let (status, body) = get_json(&app, &format!("/api/v1/strains/{}", id_of(&wildtype))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "C57BL/6J");
}

#[tokio::test]
async fn test_measurement_filters() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({"ear_tag": 1})).await;
    let weight = create(&app, "/api/assays", &json!({"name": "Body Weight"})).await;
    let glucose = create(&app, "/api/assays", &json!({"name": "Blood Glucose"})).await;

    for (date, assay, value) in [
        ("2012-05-01", &weight, "30.1"),
        ("2013-05-01", &weight, "31.4"),
        ("2013-06-01", &glucose, "150"),
    ] {
        let experiment = create(
            &app,
            "/api/experiments",
            &json!({"date": date, "feeding_state": "fed", "researcher_ids": []}),
        )
        .await;
        let (status, _) = post_json(
            &app,
            &format!("/api/experiments/{}/measurements", id_of(&experiment)),
            &json!({"measurements": [
                {"animal_id": id_of(&animal), "assay_id": id_of(assay), "values": value},
            ]}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get_json(&app, "/api/v1/measurements?assay=body-weight").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_count"], 2);

    let (_, body) = get_json(&app, "/api/v1/measurements?assay=body-weight&year=2012").await;
    assert_eq!(body["meta"]["total_count"], 1);
    assert_eq!(body["objects"][0]["values"], "30.1");
    assert_eq!(body["objects"][0]["label"], "Ob/Ob-EarTag #1 Body Weight");

    let (_, body) = get_json(&app, "/api/v1/measurements?year=2013").await;
    assert_eq!(body["meta"]["total_count"], 2);
}

#[tokio::test]
async fn test_assay_experiment_and_study_resources() {
    let app = setup_test_app().await;
    let assay = create(&app, "/api/assays", &json!({"name": "Body Weight"})).await;
    let experiment = create(
        &app,
        "/api/experiments",
        &json!({"date": "2024-03-21", "feeding_state": "fasted", "researcher_ids": []}),
    )
    .await;
    let study = create(
        &app,
        "/api/studies",
        &json!({"description": "Diet induced obesity", "strain_ids": []}),
    )
    .await;

    let (status, body) = get_json(&app, "/api/v1/assays").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"][0]["slug"], "body-weight");
    let (status, _) = get_json(&app, &format!("/api/v1/assays/{}", id_of(&assay))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, "/api/v1/experiments").await;
    assert_eq!(body["meta"]["total_count"], 1);
    let (_, body) = get_json(&app, &format!("/api/v1/experiments/{}", id_of(&experiment))).await;
    assert_eq!(body["label"], "2024-03-21-fasted");

    let (_, body) = get_json(&app, "/api/v1/studies").await;
    assert_eq!(body["objects"][0]["description"], "Diet induced obesity");
    let (status, body) = get_json(&app, &format!("/api/v1/studies/{}", id_of(&study))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strain_ids"], json!([]));

    let (status, _) = get_json(&app, &format!("/api/v1/studies/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
