use crate::common::test_helpers::{
    create_test_animal, create_test_strain, get_json, id_of, post_json, put_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_animal_crud_and_display_fields() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let strain_id = id_of(&strain);

    let animal = create_test_animal(
        &app,
        &strain_id,
        json!({"ear_tag": 1204, "cage": 31, "genotype": "-/-", "born": "2024-01-10"}),
    )
    .await;
    assert_eq!(animal["alive"], true);
    assert_eq!(animal["label"], "Leptin Knockout-EarTag #1204");
    assert_eq!(animal["strain_name"], "Leptin Knockout");
    assert!(animal["age_days"].as_i64().is_some_and(|days| days > 0));

    let (status, body) = get_json(&app, &format!("/api/animals/{}", id_of(&animal))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genotype"], "-/-");
    assert_eq!(body["background"], "C57BL/6-BA");

    let (status, body) = get_json(&app, "/api/animals").await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("list of animals");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["label"], "Leptin Knockout-EarTag #1204");
}

#[tokio::test]
async fn test_animal_without_ear_tag_uses_id_in_label() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({"genotype": "  "})).await;

    let expected = format!("Ob/Ob ({})", id_of(&animal));
    assert_eq!(animal["label"], expected.as_str());
    assert_eq!(animal["genotype"], "N.D.");
    assert!(animal["age_days"].is_null());
}

#[tokio::test]
async fn test_death_date_marks_animal_dead() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    let animal = create_test_animal(
        &app,
        &id_of(&strain),
        json!({"ear_tag": 7, "born": "2024-01-01"}),
    )
    .await;

    let (status, body) = put_json(
        &app,
        &format!("/api/animals/{}", id_of(&animal)),
        &json!({"death": "2024-03-01", "cause_of_death": "Sacrificed"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["alive"], false);
    assert_eq!(body["cause_of_death"], "Sacrificed");
    // Age stops counting at death
    assert_eq!(body["age_days"], 60);
}

#[tokio::test]
async fn test_animal_dates_must_follow_birth() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    let strain_id = id_of(&strain);

    let (status, body) = post_json(
        &app,
        "/api/animals",
        &json!({
            "strain_id": strain_id,
            "background": "Mixed",
            "genotype": "+/+",
            "gender": "M",
            "born": "2024-02-01",
            "weaned": "2024-01-15",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Weaning before birth was accepted");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // The stored birth date is checked when only the death date is sent
    let animal = create_test_animal(&app, &strain_id, json!({"born": "2024-02-01"})).await;
    let (status, body) = put_json(
        &app,
        &format!("/api/animals/{}", id_of(&animal)),
        &json!({"death": "2023-12-31"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Death before birth was accepted");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["type"], "ValidationError");
    assert_eq!(
        body["error"]["message"],
        "Validation failed for field 'death': death cannot precede the birth date"
    );
}

#[tokio::test]
async fn test_partial_updates_keep_death_rule() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    let animal = create_test_animal(
        &app,
        &id_of(&strain),
        json!({"ear_tag": 9, "born": "2024-01-01", "cage": 41}),
    )
    .await;
    let url = format!("/api/animals/{}", id_of(&animal));

    let (status, body) = put_json(&app, &url, &json!({"death": "2024-02-01"})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["alive"], false);

    // A dead animal cannot be revived without clearing its death date
    let (status, body) = put_json(&app, &url, &json!({"alive": true})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["alive"], false);
    assert_eq!(body["death"], "2024-02-01");

    let (status, body) = put_json(&app, &url, &json!({"notes": "found in cage 41"})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["alive"], false);
    assert_eq!(body["ear_tag"], 9);

    let (status, body) = put_json(&app, &url, &json!({"weaned": "2023-12-01"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
}

#[tokio::test]
async fn test_missing_animal_answers_not_found() {
    let app = setup_test_app().await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = get_json(&app, &format!("/api/animals/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");

    let (status, body) = put_json(&app, &format!("/api/animals/{missing}"), &json!({"notes": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_animal_cannot_be_its_own_parent() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "C57BL/6J").await;
    let animal = create_test_animal(&app, &id_of(&strain), json!({})).await;
    let animal_id = id_of(&animal);

    let (status, _) = put_json(
        &app,
        &format!("/api/animals/{animal_id}"),
        &json!({"mother_id": animal_id}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_animals_in_batch() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;

    let (status, body) = post_json(
        &app,
        "/api/animals/batch",
        &json!({
            "count": 4,
            "animal": {
                "strain_id": id_of(&strain),
                "background": "Mixed",
                "genotype": "N.D.",
                "gender": "M",
                "cage": 12,
                "born": "2024-05-01",
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    let created = body.as_array().expect("created animals");
    assert_eq!(created.len(), 4);
    assert!(created.iter().all(|animal| animal["cage"] == 12));
    assert!(created.iter().all(|animal| animal["alive"] == true));

    let (_, listed) = get_json(&app, "/api/animals").await;
    assert_eq!(listed.as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_batch_count_is_bounded() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let animal = json!({
        "strain_id": id_of(&strain),
        "background": "Mixed",
        "genotype": "N.D.",
        "gender": "F",
    });

    for count in [0, 101] {
        let (status, body) = post_json(
            &app,
            "/api/animals/batch",
            &json!({"count": count, "animal": animal}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "count {count}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
