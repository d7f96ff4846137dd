use super::assays::{self, Assay};
use super::measurements::{self, Measurement, NewMeasurement, add_to_experiment};
use super::models::{Experiment, router as crudrouter};
use crate::common::auth::require_admin;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::validation_error;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use crudcrate::CRUDResource;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let experiments_router = crudrouter(&state.db.clone()).route(
        "/{id}/measurements",
        post(add_measurements).with_state(state.clone()),
    );

    OpenApiRouter::new()
        .nest(
            "/api/experiments",
            require_admin(experiments_router, state, Experiment::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/assays",
            require_admin(assays::router(&state.db.clone()), state, Assay::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/measurements",
            require_admin(
                measurements::router(&state.db.clone()),
                state,
                Measurement::RESOURCE_NAME_PLURAL,
            ),
        )
}

#[derive(Deserialize, ToSchema)]
pub struct MeasurementUpload {
    pub measurements: Vec<NewMeasurement>,
}

/// Add several measurements to an experiment at once
#[utoipa::path(
    post,
    path = "/experiments/{id}/measurements",
    params(("id" = Uuid, Path, description = "Experiment ID")),
    request_body = MeasurementUpload,
    responses(
        (status = 201, description = "Measurements created", body = Vec<Measurement>),
        (status = 400, description = "Empty upload or values that are not numbers"),
        (status = 404, description = "Experiment not found"),
    ),
    tag = "experiments"
)]
pub async fn add_measurements(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(upload): Json<MeasurementUpload>,
) -> BusinessResult<(StatusCode, Json<Vec<Measurement>>)> {
    if upload.measurements.is_empty() {
        return Err(validation_error!("measurements", "cannot be empty"));
    }
    let created = add_to_experiment(&state.db, id, upload.measurements)
        .await
        .map_err(|err| err.to_business_error("experiment"))?;
    tracing::info!("Added {} measurements to experiment {}", created.len(), id);

    Ok((StatusCode::CREATED, Json(created)))
}
