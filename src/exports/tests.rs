use crate::common::test_helpers::{
    create, create_test_animal, create_test_breeding, create_test_strain, get_text, id_of,
    post_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn create_fed_experiment(app: &Router) -> Value {
    create(
        app,
        "/api/experiments",
        &json!({"date": "2024-03-21", "feeding_state": "fed", "researcher_ids": []}),
    )
    .await
}

#[tokio::test]
async fn test_aging_export() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    create_test_animal(
        &app,
        &id_of(&strain),
        json!({
            "ear_tag": 17,
            "genotype": "-/-",
            "born": "2024-01-01",
            "death": "2024-03-01",
            "cause_of_death": "Sacrificed",
        }),
    )
    .await;

    let (status, content_type, body) = get_text(&app, "/api/exports/aging").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"), "{content_type}");
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Animal,Strain,Genotype,Age,Death,Alive");
    assert_eq!(lines[1], "17,Ob/Ob,-/-,60,Sacrificed,false");
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn test_litters_export_names_breeding_cage() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let strain_id = id_of(&strain);
    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({"cage": "88", "start_date": "2024-01-02"}),
    )
    .await;
    create_test_animal(
        &app,
        &strain_id,
        json!({"ear_tag": 1, "born": "2024-02-10", "breeding_id": id_of(&breeding)}),
    )
    .await;
    create_test_animal(&app, &strain_id, json!({"ear_tag": 2, "born": "2024-02-11"})).await;

    let (status, _, body) = get_text(&app, "/api/exports/litters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Born,Breeding,Strain\n\
         2024-02-10,Leptin Knockout Breeding Cage: 88 starting on 2024-01-02,Leptin Knockout\n\
         2024-02-11,,Leptin Knockout\n"
    );
}

#[tokio::test]
async fn test_body_weight_export() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(
        &app,
        &id_of(&strain),
        json!({"ear_tag": 4, "genotype": "+/-", "cage": 12}),
    )
    .await;
    let weight = create(&app, "/api/assays", &json!({"name": "Body Weight"})).await;
    let glucose = create(&app, "/api/assays", &json!({"name": "Blood Glucose"})).await;
    let experiment = create_fed_experiment(&app).await;
    let (status, body) = post_json(
        &app,
        &format!("/api/experiments/{}/measurements", id_of(&experiment)),
        &json!({"measurements": [
            {"animal_id": id_of(&animal), "assay_id": id_of(&weight), "values": "31.2"},
            {"animal_id": id_of(&animal), "assay_id": id_of(&glucose), "values": "140"},
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");

    let (status, _, body) = get_text(&app, "/api/exports/body_weights").await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "Animal,Genotype,Assay,Value,Strain,Age,Cage,Feeding");
    // No birth date, so no age
    assert_eq!(lines[1], "Ob/Ob-EarTag #4,+/-,Body Weight,31.2,Ob/Ob,,12,fed");
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn test_body_weight_export_without_assay() {
    let app = setup_test_app().await;
    let (status, _, body) = get_text(&app, "/api/exports/body_weights").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Animal,Genotype,Assay,Value,Strain,Age,Cage,Feeding\n");
}

#[tokio::test]
async fn test_experiment_export() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(
        &app,
        &id_of(&strain),
        json!({"ear_tag": 9, "genotype": "-/-", "born": "2024-01-21"}),
    )
    .await;
    let assay = create(&app, "/api/assays", &json!({"name": "Blood Glucose"})).await;
    let experiment = create_fed_experiment(&app).await;
    let (status, _) = post_json(
        &app,
        &format!("/api/experiments/{}/measurements", id_of(&experiment)),
        &json!({"measurements": [
            {"animal_id": id_of(&animal), "assay_id": id_of(&assay), "values": "120,250"},
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, content_type, body) =
        get_text(&app, &format!("/api/exports/experiments/{}", id_of(&experiment))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/csv"));
    assert_eq!(
        body,
        "Animal,Genotype,Age,Assay,Values\nOb/Ob-EarTag #9,-/-,60,Blood Glucose,\"120,250\"\n"
    );

    let (status, _, _) = get_text(
        &app,
        &format!("/api/exports/experiments/{}", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
