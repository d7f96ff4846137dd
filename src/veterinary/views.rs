use super::conditions::{self, MedicalCondition};
use super::issues::{self, MedicalIssue};
use super::treatments::{self, MedicalTreatment};
use crate::common::auth::require_admin;
use crate::common::state::AppState;
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    let db = state.db.clone();
    OpenApiRouter::new()
        .nest(
            "/api/medical_conditions",
            require_admin(conditions::router(&db), state, MedicalCondition::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/medical_treatments",
            require_admin(treatments::router(&db), state, MedicalTreatment::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/medical_issues",
            require_admin(issues::router(&db), state, MedicalIssue::RESOURCE_NAME_PLURAL),
        )
}
