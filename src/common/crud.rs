/// CRUD router for a crudcrate resource.
///
/// Listing and batch deletion come from crudcrate. Single record reads,
/// writes and deletes answer with [`BusinessError`](crate::common::errors::BusinessError)
/// bodies, so save hook validation reaches clients as a 400.
///
/// `crate::crud_router!(Animal, AnimalCreate, AnimalUpdate, AnimalList);`
#[macro_export]
macro_rules! crud_router {
    ($resource:ident, $create:ident, $update:ident, $list:ident) => {
        #[allow(dead_code, unused_imports, clippy::pedantic)]
        mod generated_handlers {
            use super::*;
            crudcrate::crud_handlers!($resource, $update, $create, $list);
        }

        fn business_error(err: sea_orm::DbErr) -> $crate::common::errors::BusinessError {
            use $crate::common::errors::DbErrorExt;
            err.to_business_error(<$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR)
        }

        #[utoipa::path(
            get,
            path = "/{id}",
            responses(
                (status = axum::http::StatusCode::OK, description = "The requested resource", body = $resource),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
            ),
            operation_id = format!("get_one_{}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Get one {}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = <$resource as crudcrate::CRUDResource>::RESOURCE_DESCRIPTION
        )]
        pub async fn get_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
        ) -> $crate::common::errors::BusinessResult<axum::Json<$resource>> {
            <$resource as crudcrate::CRUDResource>::get_one(&db, id)
                .await
                .map(axum::Json)
                .map_err(business_error)
        }

        #[utoipa::path(
            post,
            path = "/",
            request_body = $create,
            responses(
                (status = axum::http::StatusCode::CREATED, description = "Resource created", body = $resource),
                (status = axum::http::StatusCode::BAD_REQUEST, description = "Validation failed"),
                (status = axum::http::StatusCode::CONFLICT, description = "Duplicate record"),
            ),
            operation_id = format!("create_one_{}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Create one {}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = <$resource as crudcrate::CRUDResource>::RESOURCE_DESCRIPTION
        )]
        pub async fn create_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::Json(data): axum::Json<$create>,
        ) -> $crate::common::errors::BusinessResult<(axum::http::StatusCode, axum::Json<$resource>)> {
            <$resource as crudcrate::CRUDResource>::create(&db, data)
                .await
                .map(|created| (axum::http::StatusCode::CREATED, axum::Json(created)))
                .map_err(business_error)
        }

        #[utoipa::path(
            put,
            path = "/{id}",
            request_body = $update,
            responses(
                (status = axum::http::StatusCode::OK, description = "Resource updated", body = $resource),
                (status = axum::http::StatusCode::BAD_REQUEST, description = "Validation failed"),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
                (status = axum::http::StatusCode::CONFLICT, description = "Duplicate record"),
            ),
            operation_id = format!("update_one_{}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Update one {}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = <$resource as crudcrate::CRUDResource>::RESOURCE_DESCRIPTION
        )]
        pub async fn update_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
            axum::Json(data): axum::Json<$update>,
        ) -> $crate::common::errors::BusinessResult<axum::Json<$resource>> {
            <$resource as crudcrate::CRUDResource>::update(&db, id, data)
                .await
                .map(axum::Json)
                .map_err(business_error)
        }

        #[utoipa::path(
            delete,
            path = "/{id}",
            responses(
                (status = axum::http::StatusCode::NO_CONTENT, description = "Resource deleted"),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
                (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Resource still referenced"),
            ),
            operation_id = format!("delete_one_{}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Delete one {}", <$resource as crudcrate::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = <$resource as crudcrate::CRUDResource>::RESOURCE_DESCRIPTION
        )]
        pub async fn delete_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<uuid::Uuid>,
        ) -> $crate::common::errors::BusinessResult<axum::http::StatusCode> {
            <$resource as crudcrate::CRUDResource>::delete(&db, id)
                .await
                .map(|_| axum::http::StatusCode::NO_CONTENT)
                .map_err(business_error)
        }

        pub fn router(db: &sea_orm::DatabaseConnection) -> utoipa_axum::router::OpenApiRouter {
            utoipa_axum::router::OpenApiRouter::new()
                .routes(utoipa_axum::routes!(get_one_handler))
                .routes(utoipa_axum::routes!(generated_handlers::get_all_handler))
                .routes(utoipa_axum::routes!(create_one_handler))
                .routes(utoipa_axum::routes!(update_one_handler))
                .routes(utoipa_axum::routes!(delete_one_handler))
                .routes(utoipa_axum::routes!(generated_handlers::delete_many_handler))
                .with_state(db.clone())
        }
    };
}
