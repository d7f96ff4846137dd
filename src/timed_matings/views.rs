use super::models::{PlugEvent, router as crudrouter};
use crate::common::auth::require_admin;
use crate::common::state::AppState;
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    require_admin(
        crudrouter(&state.db.clone()),
        state,
        PlugEvent::RESOURCE_NAME_PLURAL,
    )
}
