use super::{
    diets::{self, Diet},
    environments::{self, Environment},
    implantations::{self, Implantation},
    pharmaceuticals::{self, Pharmaceutical},
    researchers::{self, Researcher},
    transplantations::{self, Transplantation},
    vendors::{self, Vendor},
};
use crate::common::auth::require_admin;
use crate::common::state::AppState;
use crudcrate::CRUDResource;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    let db = state.db.clone();
    OpenApiRouter::new()
        .nest(
            "/api/researchers",
            require_admin(researchers::router(&db), state, Researcher::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/vendors",
            require_admin(vendors::router(&db), state, Vendor::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/diets",
            require_admin(diets::router(&db), state, Diet::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/environments",
            require_admin(environments::router(&db), state, Environment::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/implantations",
            require_admin(implantations::router(&db), state, Implantation::RESOURCE_NAME_PLURAL),
        )
        .nest(
            "/api/pharmaceuticals",
            require_admin(
                pharmaceuticals::router(&db),
                state,
                Pharmaceutical::RESOURCE_NAME_PLURAL,
            ),
        )
        .nest(
            "/api/transplantations",
            require_admin(
                transplantations::router(&db),
                state,
                Transplantation::RESOURCE_NAME_PLURAL,
            ),
        )
}
