use super::cohorts::{self, Cohort};
use super::models::{Study, find_study, router as crudrouter};
use super::treatments::{self, Treatment};
use crate::common::auth::require_admin;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::experiments::models::{Experiment, for_study};
use axum::{
    Json,
    extract::{Path, State},
    routing::get,
};
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let studies_router = crudrouter(&state.db.clone()).route(
        "/{id}/experiments",
        get(get_study_experiments).with_state(state.clone()),
    );

    OpenApiRouter::new()
        .nest(
            "/api/studies",
            require_admin(studies_router, state, Study::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/treatments",
            require_admin(
                treatments::router(&state.db.clone()),
                state,
                Treatment::RESOURCE_NAME_PLURAL,
            ),
        )
        .nest(
            "/api/cohorts",
            require_admin(cohorts::router(&state.db.clone()), state, Cohort::RESOURCE_NAME_PLURAL),
        )
}

/// Experiments that belong to a study, newest first
#[utoipa::path(
    get,
    path = "/studies/{id}/experiments",
    params(("id" = Uuid, Path, description = "Study ID")),
    responses(
        (status = 200, description = "Experiments of the study", body = Vec<Experiment>),
        (status = 404, description = "Study not found"),
    ),
    tag = "studies"
)]
pub async fn get_study_experiments(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Experiment>>> {
    find_study(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("study"))?;
    let experiments = for_study(&state.db, id)
        .await
        .map_err(|err| err.to_business_error("study"))?;
    Ok(Json(experiments))
}
