use super::models::{AnimalFilter, AnimalResource, MeasurementFilter, Page, Pagination, StrainFilter};
use super::services;
use crate::common::auth::require_user;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::experiments::assays::Assay;
use crate::experiments::measurements::Measurement;
use crate::experiments::models::Experiment;
use crate::reports::services::year_range;
use crate::strains::models::Strain;
use crate::studies::models::Study;
use crate::validation_error;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let api = OpenApiRouter::new()
        .routes(routes!(list_animals))
        .routes(routes!(get_animal))
        .routes(routes!(list_strains))
        .routes(routes!(get_strain))
        .routes(routes!(list_measurements))
        .routes(routes!(get_measurement))
        .routes(routes!(list_assays))
        .routes(routes!(get_assay))
        .routes(routes!(list_experiments))
        .routes(routes!(get_experiment))
        .routes(routes!(list_studies))
        .routes(routes!(get_study))
        .with_state(state.clone());

    require_user(api, state, "v1")
}

#[utoipa::path(
    get,
    path = "/animals",
    params(AnimalFilter),
    responses((status = 200, description = "Animals with their strain", body = Page<AnimalResource>)),
    tag = "v1"
)]
pub async fn list_animals(
    Query(filter): Query<AnimalFilter>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<AnimalResource>>> {
    let page = services::animal_page(&state.db, &filter)
        .await
        .map_err(|err| err.to_business_error("animal"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/animals/{id}",
    params(("id" = Uuid, Path, description = "Animal ID")),
    responses(
        (status = 200, description = "Animal with its strain", body = AnimalResource),
        (status = 404, description = "Animal not found"),
    ),
    tag = "v1"
)]
pub async fn get_animal(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<AnimalResource>> {
    let animal = services::animal(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("animal"))?;
    Ok(Json(animal))
}

#[utoipa::path(
    get,
    path = "/strains",
    params(StrainFilter),
    responses((status = 200, description = "Strains", body = Page<Strain>)),
    tag = "v1"
)]
pub async fn list_strains(
    Query(filter): Query<StrainFilter>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<Strain>>> {
    let page = services::strain_page(&state.db, &filter)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/strains/{id}",
    params(("id" = Uuid, Path, description = "Strain ID")),
    responses(
        (status = 200, description = "Strain", body = Strain),
        (status = 404, description = "Strain not found"),
    ),
    tag = "v1"
)]
pub async fn get_strain(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Strain>> {
    let strain = services::strain(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    Ok(Json(strain))
}

#[utoipa::path(
    get,
    path = "/measurements",
    params(MeasurementFilter),
    responses(
        (status = 200, description = "Measurements", body = Page<Measurement>),
        (status = 400, description = "Invalid year"),
    ),
    tag = "v1"
)]
pub async fn list_measurements(
    Query(filter): Query<MeasurementFilter>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<Measurement>>> {
    let year = match filter.year {
        Some(year) => Some(year_range(year).ok_or_else(|| validation_error!("year", "out of range"))?),
        None => None,
    };
    let page = services::measurement_page(&state.db, &filter, year)
        .await
        .map_err(|err| err.to_business_error("measurement"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/measurements/{id}",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    responses(
        (status = 200, description = "Measurement", body = Measurement),
        (status = 404, description = "Measurement not found"),
    ),
    tag = "v1"
)]
pub async fn get_measurement(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Measurement>> {
    let measurement = services::measurement(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("measurement"))?;
    Ok(Json(measurement))
}

#[utoipa::path(
    get,
    path = "/assays",
    params(Pagination),
    responses((status = 200, description = "Assays", body = Page<Assay>)),
    tag = "v1"
)]
pub async fn list_assays(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<Assay>>> {
    let page = services::assay_page(&state.db, page.limit, page.offset)
        .await
        .map_err(|err| err.to_business_error("assay"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/assays/{id}",
    params(("id" = Uuid, Path, description = "Assay ID")),
    responses(
        (status = 200, description = "Assay", body = Assay),
        (status = 404, description = "Assay not found"),
    ),
    tag = "v1"
)]
pub async fn get_assay(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Assay>> {
    let assay = services::assay(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("assay"))?;
    Ok(Json(assay))
}

#[utoipa::path(
    get,
    path = "/experiments",
    params(Pagination),
    responses((status = 200, description = "Experiments, newest first", body = Page<Experiment>)),
    tag = "v1"
)]
pub async fn list_experiments(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<Experiment>>> {
    let page = services::experiment_page(&state.db, page.limit, page.offset)
        .await
        .map_err(|err| err.to_business_error("experiment"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/experiments/{id}",
    params(("id" = Uuid, Path, description = "Experiment ID")),
    responses(
        (status = 200, description = "Experiment", body = Experiment),
        (status = 404, description = "Experiment not found"),
    ),
    tag = "v1"
)]
pub async fn get_experiment(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Experiment>> {
    let experiment = services::experiment(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("experiment"))?;
    Ok(Json(experiment))
}

#[utoipa::path(
    get,
    path = "/studies",
    params(Pagination),
    responses((status = 200, description = "Studies", body = Page<Study>)),
    tag = "v1"
)]
pub async fn list_studies(
    Query(page): Query<Pagination>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Page<Study>>> {
    let page = services::study_page(&state.db, page.limit, page.offset)
        .await
        .map_err(|err| err.to_business_error("study"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/studies/{id}",
    params(("id" = Uuid, Path, description = "Study ID")),
    responses(
        (status = 200, description = "Study", body = Study),
        (status = 404, description = "Study not found"),
    ),
    tag = "v1"
)]
pub async fn get_study(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Study>> {
    let study = services::study(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("study"))?;
    Ok(Json(study))
}
