use crate::common::state::AppState;
use crate::config::Config;
use crate::{
    animals, api_v1, breedings, cages, experiments, exports, parameters, reports, strains, studies,
    timed_matings, veterinary,
};
use axum::{Router, extract::DefaultBodyLimit};
use axum_keycloak_auth::{Url, instance::KeycloakAuthInstance, instance::KeycloakConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// Builds the application router with every resource, the read-only
/// surfaces and the Scalar documentation at `/api/docs`.
///
/// # Errors
/// Fails when the configured Keycloak URL cannot be parsed.
pub fn build_router(db: &DatabaseConnection, config: &Config) -> anyhow::Result<Router> {
    #[derive(OpenApi)]
    #[openapi(
        modifiers(&SecurityAddon),
        security(
            ("bearerAuth" = [])
        )
    )]
    struct ApiDoc;

    struct SecurityAddon;

    impl utoipa::Modify for SecurityAddon {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            if let Some(components) = openapi.components.as_mut() {
                components.add_security_scheme(
                    "bearerAuth",
                    utoipa::openapi::security::SecurityScheme::Http(
                        utoipa::openapi::security::HttpBuilder::new()
                            .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }
    }

    let keycloak_instance: Option<Arc<KeycloakAuthInstance>> = if config.keycloak_url.is_empty() {
        // Skip Keycloak initialization for tests
        None
    } else {
        Some(Arc::new(KeycloakAuthInstance::new(
            KeycloakConfig::builder()
                .server(Url::parse(&config.keycloak_url)?)
                .realm(String::from(&config.keycloak_realm))
                .build(),
        )))
    };

    let app_state: AppState = AppState::new(db.clone(), config.clone(), keycloak_instance);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .nest("/api/strains", strains::views::router(&app_state))
        .nest("/api/animals", animals::views::router(&app_state))
        .nest("/api/breedings", breedings::views::router(&app_state))
        .nest("/api/cages", cages::views::router(&app_state))
        .nest("/api/plug_events", timed_matings::views::router(&app_state))
        .merge(parameters::views::router(&app_state))
        .merge(experiments::views::router(&app_state))
        .merge(studies::views::router(&app_state))
        .merge(veterinary::views::router(&app_state))
        .nest("/api/reports", reports::views::router(&app_state))
        .nest("/api/exports", exports::views::router(&app_state))
        .nest("/api/v1", api_v1::views::router(&app_state))
        .split_for_parts();

    Ok(router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024)))
}
