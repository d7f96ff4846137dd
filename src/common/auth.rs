use crate::common::state::AppState;
use axum_keycloak_auth::{PassthroughMode, layer::KeycloakAuthLayer};
use utoipa_axum::router::OpenApiRouter;

/// A Keycloak realm role as it appears in the token.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Role(String);

impl axum_keycloak_auth::role::Role for Role {}

impl Role {
    /// The role allowed to create, update and delete records (`ADMIN_ROLE`).
    pub fn administrator(state: &AppState) -> Self {
        Role(state.config.admin_role.clone())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role(value)
    }
}

fn keycloak_layer(state: &AppState, required_roles: Vec<Role>) -> Option<KeycloakAuthLayer<Role>> {
    state.keycloak_auth_instance.clone().map(|instance| {
        KeycloakAuthLayer::<Role>::builder()
            .instance(instance)
            .passthrough_mode(PassthroughMode::Block)
            .persist_raw_claims(false)
            .expected_audiences(vec![String::from("account")])
            .required_roles(required_roles)
            .build()
    })
}

/// Every route of `router` requires the administrator role.
pub fn require_admin(router: OpenApiRouter, state: &AppState, resource: &str) -> OpenApiRouter {
    if let Some(layer) = keycloak_layer(state, vec![Role::administrator(state)]) {
        router.layer(layer)
    } else {
        if !state.config.tests_running {
            tracing::warn!("Mutating routes of {resource} router are not protected");
        }
        router
    }
}

/// Every route of `router` requires a valid token, whatever its roles.
pub fn require_user(router: OpenApiRouter, state: &AppState, resource: &str) -> OpenApiRouter {
    if let Some(layer) = keycloak_layer(state, vec![]) {
        router.layer(layer)
    } else {
        if !state.config.tests_running {
            tracing::warn!("Read-only routes of {resource} router are not protected");
        }
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, test_helpers::setup_test_db};

    #[tokio::test]
    async fn test_administrator_follows_config() {
        let mut config = Config::for_tests();
        config.admin_role = "colony-manager".to_string();
        let state = AppState::new(setup_test_db().await, config, None);

        assert_eq!(Role::administrator(&state), Role::from("colony-manager".to_string()));
        assert_ne!(Role::administrator(&state), Role::from("mousedb-admin".to_string()));
        assert_eq!(Role::administrator(&state).to_string(), "colony-manager");
    }
}
