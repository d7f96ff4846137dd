use super::models::{Animal, AnimalCreate, create_batch, router as crudrouter};
use crate::common::auth::require_admin;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::validation_error;
use axum::{Json, extract::State, http::StatusCode, routing::post};
use crudcrate::CRUDResource;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

const MAX_BATCH_SIZE: u32 = 100;

pub fn router(state: &AppState) -> OpenApiRouter {
    let mutating_router = crudrouter(&state.db.clone())
        .route("/batch", post(create_animals_in_batch).with_state(state.clone()));

    require_admin(mutating_router, state, Animal::RESOURCE_NAME_PLURAL)
}

#[derive(Deserialize, ToSchema)]
pub struct AnimalBatch {
    /// Number of identical animals to create
    pub count: u32,
    pub animal: AnimalCreate,
}

/// Create several identical animals at once (e.g. a litter entered after weaning)
#[utoipa::path(
    post,
    path = "/animals/batch",
    request_body = AnimalBatch,
    responses(
        (status = 201, description = "Animals created", body = Vec<Animal>),
        (status = 400, description = "Invalid count or animal data"),
    ),
    tag = "animals"
)]
pub async fn create_animals_in_batch(
    State(state): State<AppState>,
    Json(batch): Json<AnimalBatch>,
) -> BusinessResult<(StatusCode, Json<Vec<Animal>>)> {
    if batch.count == 0 || batch.count > MAX_BATCH_SIZE {
        return Err(validation_error!(
            "count",
            format!("must be between 1 and {MAX_BATCH_SIZE}")
        ));
    }

    let animals = create_batch(&state.db, batch.animal, batch.count)
        .await
        .map_err(|err| err.to_business_error("animal"))?;
    tracing::info!("Created {} animals in batch", animals.len());

    Ok((StatusCode::CREATED, Json(animals)))
}
