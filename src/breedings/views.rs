use super::models::{
    Breeding, breeding_males, create_pups, females, find_breeding, males, router as crudrouter,
    unweaned_pups,
};
use super::services::{MaleLocation, male_location};
use crate::animals::models::{Animal, Gender};
use crate::common::auth::require_admin;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::timed_matings::models::{PlugEvent, record_for_breeding};
use crate::{business_rule_violation, validation_error};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use crudcrate::CRUDResource;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

const MAX_LITTER_SIZE: u32 = 30;

pub fn router(state: &AppState) -> OpenApiRouter {
    let mutating_router = crudrouter(&state.db.clone())
        .route(
            "/{id}/unweaned",
            get(get_unweaned_pups).with_state(state.clone()),
        )
        .route(
            "/{id}/male_location",
            get(get_male_location).with_state(state.clone()),
        )
        .route("/{id}/pups", post(add_pups).with_state(state.clone()))
        .route(
            "/{id}/plug_events",
            post(add_plug_event).with_state(state.clone()),
        );

    require_admin(mutating_router, state, Breeding::RESOURCE_NAME_PLURAL)
}

#[derive(Serialize, ToSchema)]
pub struct MaleLocationReport {
    pub breeding_id: Uuid,
    pub male_id: Option<Uuid>,
    pub male_cage: Option<i32>,
    pub location: MaleLocation,
}

#[derive(Deserialize, ToSchema)]
pub struct Litter {
    pub count: u32,
    pub gender: Gender,
    pub born: NaiveDate,
    pub weaned: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct PlugRecord {
    pub plug_date: NaiveDate,
    pub plug_female_id: Option<Uuid>,
    pub plug_male_id: Option<Uuid>,
    pub researcher_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Alive pups of a breeding cage that still need to be weaned
#[utoipa::path(
    get,
    path = "/breedings/{id}/unweaned",
    params(("id" = Uuid, Path, description = "Breeding ID")),
    responses(
        (status = 200, description = "Unweaned pups", body = Vec<Animal>),
        (status = 404, description = "Breeding not found"),
    ),
    tag = "breedings"
)]
pub async fn get_unweaned_pups(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let pups = unweaned_pups(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;
    Ok(Json(pups))
}

/// Whether the first breeding male lives in the breeding cage
#[utoipa::path(
    get,
    path = "/breedings/{id}/male_location",
    params(("id" = Uuid, Path, description = "Breeding ID")),
    responses(
        (status = 200, description = "Male location", body = MaleLocationReport),
        (status = 404, description = "Breeding not found"),
    ),
    tag = "breedings"
)]
pub async fn get_male_location(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<MaleLocationReport>> {
    let breeding = find_breeding(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;
    let male = breeding_males(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("breeding"))?
        .into_iter()
        .next();

    let male_cage = male.as_ref().and_then(|male| male.cage);
    Ok(Json(MaleLocationReport {
        breeding_id: id,
        male_id: male.map(|male| male.id),
        male_cage,
        location: male_location(breeding.cage.as_deref(), male_cage),
    }))
}

/// Record a litter born in this breeding cage
#[utoipa::path(
    post,
    path = "/breedings/{id}/pups",
    params(("id" = Uuid, Path, description = "Breeding ID")),
    request_body = Litter,
    responses(
        (status = 201, description = "Pups created", body = Vec<Animal>),
        (status = 400, description = "Invalid litter"),
        (status = 404, description = "Breeding not found"),
    ),
    tag = "breedings"
)]
pub async fn add_pups(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(litter): Json<Litter>,
) -> BusinessResult<(StatusCode, Json<Vec<Animal>>)> {
    if litter.count == 0 || litter.count > MAX_LITTER_SIZE {
        return Err(validation_error!(
            "count",
            format!("must be between 1 and {MAX_LITTER_SIZE}")
        ));
    }
    let breeding = find_breeding(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;

    let pups = create_pups(
        &state.db,
        &breeding,
        litter.count,
        litter.gender,
        litter.born,
        litter.weaned,
    )
    .await
    .map_err(|err| err.to_business_error("animal"))?;
    tracing::info!("Added {} pups to breeding {}", pups.len(), id);

    Ok((StatusCode::CREATED, Json(pups)))
}

/// Record a plug event for one of the females of this breeding cage
#[utoipa::path(
    post,
    path = "/breedings/{id}/plug_events",
    params(("id" = Uuid, Path, description = "Breeding ID")),
    request_body = PlugRecord,
    responses(
        (status = 201, description = "Plug event created", body = PlugEvent),
        (status = 404, description = "Breeding not found"),
        (status = 422, description = "Plug female or male is not part of the breeding"),
    ),
    tag = "breedings"
)]
pub async fn add_plug_event(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(record): Json<PlugRecord>,
) -> BusinessResult<(StatusCode, Json<PlugEvent>)> {
    find_breeding(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;

    if let Some(female_id) = record.plug_female_id {
        let breeding_females = females::member_ids(&state.db, id)
            .await
            .map_err(|err| err.to_business_error("breeding"))?;
        if !breeding_females.contains(&female_id) {
            return Err(business_rule_violation!(
                "plug female",
                format!("animal {female_id} is not a female of this breeding cage")
            ));
        }
    }
    if let Some(male_id) = record.plug_male_id {
        let breeding_males = males::member_ids(&state.db, id)
            .await
            .map_err(|err| err.to_business_error("breeding"))?;
        if !breeding_males.contains(&male_id) {
            return Err(business_rule_violation!(
                "plug male",
                format!("animal {male_id} is not a male of this breeding cage")
            ));
        }
    }

    let event = record_for_breeding(
        &state.db,
        id,
        record.plug_date,
        record.plug_female_id,
        record.plug_male_id,
        record.researcher_id,
        record.notes,
    )
    .await
    .map_err(|err| err.to_business_error("plug_event"))?;

    Ok((StatusCode::CREATED, Json(event)))
}
