use crate::common::test_helpers::{
    create_test_animal, create_test_breeding, create_test_strain, get_json, id_of, post_json,
    put_json,
};
use crate::config::test_helpers::setup_test_app;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_breeding_crud_with_members() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Leptin Knockout").await;
    let strain_id = id_of(&strain);
    let female = create_test_animal(&app, &strain_id, json!({"ear_tag": 1, "cage": 101})).await;
    let male = create_test_animal(&app, &strain_id, json!({"ear_tag": 2, "gender": "M"})).await;

    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({
            "cage": "101",
            "start_date": "2024-03-04",
            "cross_type": "HET vs HET",
            "female_ids": [id_of(&female)],
            "male_ids": [id_of(&male)],
        }),
    )
    .await;
    let breeding_id = id_of(&breeding);
    assert_eq!(breeding["active"], true);
    assert_eq!(
        breeding["label"],
        "Leptin Knockout Breeding Cage: 101 starting on 2024-03-04"
    );
    assert_eq!(breeding["female_ids"], json!([id_of(&female)]));
    assert_eq!(breeding["male_ids"], json!([id_of(&male)]));

    // Membership is replaced on update
    let (status, body) = put_json(
        &app,
        &format!("/api/breedings/{breeding_id}"),
        &json!({"notes": "male removed", "female_ids": [id_of(&female)], "male_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["male_ids"], json!([]));
    assert_eq!(body["notes"], "male removed");

    let (status, body) = get_json(&app, "/api/breedings").await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("list of breedings");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["female_ids"], json!([id_of(&female)]));
}

#[tokio::test]
async fn test_end_date_deactivates_breeding() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let strain_id = id_of(&strain);
    let female = create_test_animal(&app, &strain_id, json!({"ear_tag": 3})).await;
    let male = create_test_animal(&app, &strain_id, json!({"ear_tag": 4, "gender": "M"})).await;
    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({"cage": "12", "female_ids": [id_of(&female)], "male_ids": [id_of(&male)]}),
    )
    .await;
    let url = format!("/api/breedings/{}", id_of(&breeding));

    // Omitted member lists are kept
    let (status, body) = put_json(&app, &url, &json!({"end_date": "2024-06-01"})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["active"], false);
    assert_eq!(body["female_ids"], json!([id_of(&female)]));
    assert_eq!(body["male_ids"], json!([id_of(&male)]));

    let (status, body) = put_json(&app, &url, &json!({"active": true})).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["active"], false);
    assert_eq!(body["end_date"], "2024-06-01");
    assert_eq!(body["cage"], "12");

    let (status, body) = get_json(&app, &url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
    assert_eq!(body["male_ids"], json!([id_of(&male)]));
}

#[tokio::test]
async fn test_pups_inherit_from_breeding() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let breeding = create_test_breeding(
        &app,
        &id_of(&strain),
        json!({"cage": "205, 206", "rack": "R2", "backcross": 3, "generation": 4}),
    )
    .await;
    let breeding_id = id_of(&breeding);

    let (status, body) = post_json(
        &app,
        &format!("/api/breedings/{breeding_id}/pups"),
        &json!({"count": 3, "gender": "M", "born": "2024-04-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    let pups = body.as_array().expect("created pups");
    assert_eq!(pups.len(), 3);
    for pup in pups {
        assert_eq!(pup["cage"], 205);
        assert_eq!(pup["rack"], "R2");
        assert_eq!(pup["genotype"], "+/-");
        assert_eq!(pup["backcross"], 3);
        assert_eq!(pup["generation"], 4);
        assert_eq!(pup["breeding_id"], breeding_id.as_str());
        assert_eq!(pup["strain_name"], "Ob/Ob");
    }

    let (status, body) = get_json(&app, &format!("/api/breedings/{breeding_id}/unweaned")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    // Weaning one pup removes it from the unweaned list
    let (status, _) = put_json(
        &app,
        &format!("/api/animals/{}", id_of(&pups[0])),
        &json!({"weaned": "2024-04-22"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get_json(&app, &format!("/api/breedings/{breeding_id}/unweaned")).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_litter_size_validated() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let breeding = create_test_breeding(&app, &id_of(&strain), json!({})).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/breedings/{}/pups", id_of(&breeding)),
        &json!({"count": 0, "gender": "F", "born": "2024-04-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_male_location() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let strain_id = id_of(&strain);
    let resident = create_test_animal(&app, &strain_id, json!({"gender": "M", "cage": 102})).await;
    let visitor = create_test_animal(&app, &strain_id, json!({"gender": "M", "cage": 300})).await;

    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({"cage": "101,102", "male_ids": [id_of(&resident)]}),
    )
    .await;
    let (status, body) = get_json(
        &app,
        &format!("/api/breedings/{}/male_location", id_of(&breeding)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "resident");
    assert_eq!(body["male_cage"], 102);

    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({"cage": "101,102", "male_ids": [id_of(&visitor)]}),
    )
    .await;
    let (_, body) = get_json(
        &app,
        &format!("/api/breedings/{}/male_location", id_of(&breeding)),
    )
    .await;
    assert_eq!(body["location"], "non_resident");

    let breeding = create_test_breeding(&app, &strain_id, json!({"cage": "101"})).await;
    let (_, body) = get_json(
        &app,
        &format!("/api/breedings/{}/male_location", id_of(&breeding)),
    )
    .await;
    assert_eq!(body["location"], "unknown");
    assert!(body["male_id"].is_null());
}

#[tokio::test]
async fn test_plug_event_requires_breeding_members() {
    let app = setup_test_app().await;
    let strain = create_test_strain(&app, "Ob/Ob").await;
    let strain_id = id_of(&strain);
    let female = create_test_animal(&app, &strain_id, json!({})).await;
    let stranger = create_test_animal(&app, &strain_id, json!({})).await;
    let breeding = create_test_breeding(
        &app,
        &strain_id,
        json!({"timed_mating": true, "female_ids": [id_of(&female)]}),
    )
    .await;
    let uri = format!("/api/breedings/{}/plug_events", id_of(&breeding));

    let (status, body) = post_json(
        &app,
        &uri,
        &json!({"plug_date": "2024-05-02", "plug_female_id": id_of(&female)}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");
    assert_eq!(body["breeding_id"], id_of(&breeding).as_str());
    assert_eq!(body["active"], true);
    let expected = format!("Plug Event - {}", id_of(&body));
    assert_eq!(body["label"], expected.as_str());

    let (status, body) = post_json(
        &app,
        &uri,
        &json!({"plug_date": "2024-05-02", "plug_female_id": id_of(&stranger)}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_missing_breeding_returns_not_found() {
    let app = setup_test_app().await;
    let missing = uuid::Uuid::new_v4();
    let (status, body) = get_json(&app, &format!("/api/breedings/{missing}/unweaned")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}
