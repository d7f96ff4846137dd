use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use std::fmt;

/// Application errors returned by the hand-written endpoints
#[derive(Debug, Clone)]
pub enum BusinessError {
    /// Invalid user input (400 Bad Request)
    ValidationError { field: String, message: String },
    /// Request is well formed but breaks a colony rule (422 Unprocessable Entity)
    BusinessRuleViolation { rule: String, message: String },
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// Duplicate resource (409 Conflict)
    Duplicate { resource: String, field: String },
    /// Permission denied (403 Forbidden)
    Forbidden { action: String, resource: String },
    /// External service errors (502 Bad Gateway)
    ExternalServiceError { service: String, message: String },
    /// Anything else (500 Internal Server Error)
    InternalError { message: String },
}

impl BusinessError {
    fn status(&self) -> StatusCode {
        match self {
            BusinessError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            BusinessError::BusinessRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BusinessError::NotFound { .. } => StatusCode::NOT_FOUND,
            BusinessError::Duplicate { .. } => StatusCode::CONFLICT,
            BusinessError::Forbidden { .. } => StatusCode::FORBIDDEN,
            BusinessError::ExternalServiceError { .. } => StatusCode::BAD_GATEWAY,
            BusinessError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BusinessError::ValidationError { .. } => "VALIDATION_ERROR",
            BusinessError::BusinessRuleViolation { .. } => "BUSINESS_RULE_VIOLATION",
            BusinessError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            BusinessError::Duplicate { .. } => "DUPLICATE_RESOURCE",
            BusinessError::Forbidden { .. } => "FORBIDDEN",
            BusinessError::ExternalServiceError { .. } => "EXTERNAL_SERVICE_ERROR",
            BusinessError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            BusinessError::ValidationError { .. } => "ValidationError",
            BusinessError::BusinessRuleViolation { .. } => "BusinessRuleViolation",
            BusinessError::NotFound { .. } => "NotFound",
            BusinessError::Duplicate { .. } => "Duplicate",
            BusinessError::Forbidden { .. } => "Forbidden",
            BusinessError::ExternalServiceError { .. } => "ExternalServiceError",
            BusinessError::InternalError { .. } => "InternalError",
        }
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { field, message } => {
                write!(f, "Validation failed for field '{field}': {message}")
            }
            BusinessError::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::Forbidden { action, resource } => {
                write!(f, "Not authorized to {action} {resource}")
            }
            BusinessError::ExternalServiceError { service, message } => {
                write!(f, "External service '{service}' error: {message}")
            }
            BusinessError::InternalError { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for BusinessError {}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        if matches!(self, BusinessError::InternalError { .. }) {
            tracing::error!("{self}");
        }
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "type": self.kind(),
            }
        }));
        (self.status(), body).into_response()
    }
}

/// Turns database errors into [`BusinessError`]s
pub struct ErrorMapper;

impl ErrorMapper {
    /// `context` names the resource being handled, e.g. `"breeding"`.
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        let resource = context.replace('_', " ");
        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource,
                id: Self::extract_id(&msg),
            },
            DbErr::Custom(msg) => {
                if let Some(detail) = msg.strip_prefix("Validation failed:") {
                    let detail = detail.trim();
                    BusinessError::ValidationError {
                        field: detail
                            .split_whitespace()
                            .next()
                            .unwrap_or("unknown")
                            .to_string(),
                        message: detail.to_string(),
                    }
                } else if let Some(field) = Self::null_field(&msg) {
                    BusinessError::ValidationError {
                        field,
                        message: msg,
                    }
                } else if msg.contains("already exists") {
                    BusinessError::Duplicate {
                        resource,
                        field: Self::extract_field(&msg),
                    }
                } else {
                    BusinessError::InternalError { message: msg }
                }
            }
            DbErr::Conn(conn_err) => BusinessError::ExternalServiceError {
                service: "database".to_string(),
                message: conn_err.to_string(),
            },
            DbErr::Exec(_) | DbErr::Query(_) => {
                let msg = err.to_string();
                if msg.contains("UNIQUE constraint") || msg.contains("duplicate key") {
                    BusinessError::Duplicate {
                        resource,
                        field: Self::extract_field(&msg),
                    }
                } else if msg.contains("FOREIGN KEY constraint") || msg.contains("foreign key") {
                    BusinessError::BusinessRuleViolation {
                        rule: "referential integrity".to_string(),
                        message: format!("{resource} references a record that does not exist or is still in use"),
                    }
                } else {
                    BusinessError::InternalError { message: msg }
                }
            }
            _ => BusinessError::InternalError {
                message: err.to_string(),
            },
        }
    }

    fn extract_id(msg: &str) -> String {
        msg.split_whitespace()
            .map(|word| word.trim_matches(|c| c == '\'' || c == '"'))
            .find(|word| uuid::Uuid::parse_str(word).is_ok())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Field named by an update that tries to null a required column
    fn null_field(msg: &str) -> Option<String> {
        if !msg.contains("cannot be set to null") {
            return None;
        }
        msg.split('\'').nth(1).map(str::to_string)
    }

    fn extract_field(msg: &str) -> String {
        ["slug", "name", "barcode", "email"]
            .into_iter()
            .find(|field| msg.contains(field))
            .unwrap_or("field")
            .to_string()
    }
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! business_rule_violation {
    ($rule:expr, $message:expr) => {
        $crate::common::errors::BusinessError::BusinessRuleViolation {
            rule: $rule.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! duplicate_resource {
    ($resource:expr, $field:expr) => {
        $crate::common::errors::BusinessError::Duplicate {
            resource: $resource.to_string(),
            field: $field.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

pub type BusinessResult<T> = Result<T, BusinessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    #[test]
    fn test_validation_error_macro() {
        let err = validation_error!("weaned", "cannot precede born");
        assert!(matches!(err, BusinessError::ValidationError { .. }));
        assert_eq!(
            err.to_string(),
            "Validation failed for field 'weaned': cannot precede born"
        );
    }

    #[test]
    fn test_error_mapper_validation() {
        let db_err = DbErr::Custom("Validation failed: death cannot precede born".to_string());
        match ErrorMapper::map_db_error(db_err, "animal") {
            BusinessError::ValidationError { field, message } => {
                assert_eq!(field, "death");
                assert_eq!(message, "death cannot precede born");
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_mapper_not_found() {
        let id = uuid::Uuid::new_v4();
        let db_err = DbErr::RecordNotFound(format!("Breeding '{id}' not found"));
        match db_err.to_business_error("breeding_cage") {
            BusinessError::NotFound { resource, id: found } => {
                assert_eq!(resource, "breeding cage");
                assert_eq!(found, id.to_string());
            }
            other => panic!("Expected not found error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_mapper_required_field_nulled() {
        let db_err = DbErr::Custom("Field 'genotype' is required and cannot be set to null".to_string());
        match db_err.to_business_error("animal") {
            BusinessError::ValidationError { field, .. } => assert_eq!(field, "genotype"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(validation_error!("born", "bad"), StatusCode::BAD_REQUEST)]
    #[case(business_rule_violation!("plug female", "not in cage"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(not_found!("animal", "1"), StatusCode::NOT_FOUND)]
    #[case(duplicate_resource!("strain", "name"), StatusCode::CONFLICT)]
    #[case(BusinessError::InternalError { message: "boom".into() }, StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_codes(#[case] err: BusinessError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = not_found!("strain", "abc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["error"]["type"], "NotFound");
        assert_eq!(body["error"]["message"], "strain with id 'abc' not found");
    }
}
