use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

pub const DEFAULT_ADMIN_ROLE: &str = "mousedb-admin";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: Option<String>,
    pub app_name: String,
    pub keycloak_ui_id: String,
    pub keycloak_url: String,
    pub keycloak_realm: String,
    pub deployment: String,
    pub admin_role: String,
    pub listen_addr: String,
    /// Age in days after which an animal should have been weaned and ear tagged
    pub wean_age_days: i64,
    /// Age in days after which an animal should have been genotyped
    pub genotype_age_days: i64,
    pub tests_running: bool,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn days_or(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads the configuration from the environment (and `.env` if present).
    ///
    /// # Errors
    /// Returns an error naming the first required variable that is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load from .env file if available
        let required = |key: &str| {
            env::var(key).map_err(|_| anyhow::anyhow!("{key} must be set"))
        };

        let db_url = match env::var("DB_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "{}://{}:{}@{}:{}/{}",
                var_or("DB_PREFIX", "postgresql"),
                required("DB_USER")?,
                required("DB_PASSWORD")?,
                required("DB_HOST")?,
                var_or("DB_PORT", "5432"),
                required("DB_NAME")?,
            ),
        };

        Ok(Config {
            app_name: required("APP_NAME")?,
            keycloak_ui_id: required("KEYCLOAK_UI_ID")?,
            keycloak_url: required("KEYCLOAK_URL")?,
            keycloak_realm: required("KEYCLOAK_REALM")?,
            deployment: required("DEPLOYMENT")
                .map_err(|_| anyhow::anyhow!("DEPLOYMENT must be set, this can be local, dev, stage, or prod"))?,
            admin_role: var_or("ADMIN_ROLE", DEFAULT_ADMIN_ROLE),
            listen_addr: var_or("LISTEN_ADDR", "0.0.0.0:3000"),
            wean_age_days: days_or("WEAN_AGE", 21),
            genotype_age_days: days_or("GENOTYPE_AGE", 14),
            tests_running: false,
            db_url: Some(db_url),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "mousedb-api-test".to_string(),
            keycloak_ui_id: "test-ui".to_string(),
            keycloak_url: "http://localhost:8080".to_string(),
            keycloak_realm: "test-realm".to_string(),
            deployment: "test".to_string(),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            wean_age_days: 21,
            genotype_age_days: 14,
            tests_running: true,
            db_url: Some("sqlite::memory:".to_string()),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::Config;
    use crate::routes::build_router;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// Fresh in-memory database with the full schema. A single pooled
    /// connection keeps every query on the same in-memory database.
    pub async fn setup_test_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to connect to test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run database migrations");

        db
    }

    pub async fn setup_test_app() -> Router {
        let db = setup_test_db().await;
        setup_test_app_with_db(&db)
    }

    pub fn setup_test_app_with_db(db: &DatabaseConnection) -> Router {
        let mut config = Config::for_tests();
        // Disable Keycloak for tests by setting the URL to empty
        config.keycloak_url = String::new();
        build_router(db, &config).expect("Failed to build router")
    }
}
