use super::services::{
    AGING_HEADER, BODY_WEIGHTS_HEADER, EXPERIMENT_HEADER, LITTERS_HEADER, aging_rows,
    body_weight_rows, experiment_rows, litter_rows, to_csv,
};
use crate::common::auth::require_user;
use crate::common::errors::{BusinessError, BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let exports = OpenApiRouter::new()
        .routes(routes!(export_aging))
        .routes(routes!(export_litters))
        .routes(routes!(export_body_weights))
        .routes(routes!(export_experiment))
        .with_state(state.clone());

    require_user(exports, state, "exports")
}

fn csv_attachment<T: Serialize>(filename: &str, header: &[&str], rows: &[T]) -> BusinessResult<Response> {
    let body = to_csv(header, rows).map_err(|err| BusinessError::InternalError {
        message: err.to_string(),
    })?;
    Ok((
        [
            (CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    )
        .into_response())
}

/// Every animal with its age and cause of death
#[utoipa::path(
    get,
    path = "/aging",
    responses((status = 200, description = "aging.csv", content_type = "text/csv", body = String)),
    tag = "exports"
)]
pub async fn export_aging(State(state): State<AppState>) -> BusinessResult<Response> {
    let rows = aging_rows(&state.db)
        .await
        .map_err(|err| err.to_business_error("animal"))?;
    csv_attachment("aging.csv", &AGING_HEADER, &rows)
}

/// Birth dates with the breeding cage and strain of every animal
#[utoipa::path(
    get,
    path = "/litters",
    responses((status = 200, description = "litters.csv", content_type = "text/csv", body = String)),
    tag = "exports"
)]
pub async fn export_litters(State(state): State<AppState>) -> BusinessResult<Response> {
    let rows = litter_rows(&state.db)
        .await
        .map_err(|err| err.to_business_error("animal"))?;
    csv_attachment("litters.csv", &LITTERS_HEADER, &rows)
}

#[utoipa::path(
    get,
    path = "/body_weights",
    responses((status = 200, description = "body_weights.csv", content_type = "text/csv", body = String)),
    tag = "exports"
)]
pub async fn export_body_weights(State(state): State<AppState>) -> BusinessResult<Response> {
    let rows = body_weight_rows(&state.db)
        .await
        .map_err(|err| err.to_business_error("measurement"))?;
    csv_attachment("body_weights.csv", &BODY_WEIGHTS_HEADER, &rows)
}

#[utoipa::path(
    get,
    path = "/experiments/{id}",
    params(("id" = Uuid, Path, description = "Experiment ID")),
    responses(
        (status = 200, description = "experiment_<id>.csv", content_type = "text/csv", body = String),
        (status = 404, description = "Experiment not found"),
    ),
    tag = "exports"
)]
pub async fn export_experiment(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Response> {
    let rows = experiment_rows(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("experiment"))?;
    csv_attachment(&format!("experiment_{id}.csv"), &EXPERIMENT_HEADER, &rows)
}
