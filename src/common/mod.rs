pub mod auth;
pub mod crud;
pub mod errors;
pub mod links;
pub mod models;
pub mod slug;
pub mod state;
pub mod views;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, Iterable, PrimaryKeyToColumn, QueryFilter, Value,
};

/// Value an active model will hold after saving, if it is known.
pub fn current<V: Into<Value>>(value: &ActiveValue<V>) -> Option<&V> {
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
        ActiveValue::NotSet => None,
    }
}

/// Completes a partial update with the stored row so save hooks see every
/// column. Supplied values stay `Set`, the rest come back `Unchanged`.
pub async fn with_stored<A, C>(model: A, db: &C, insert: bool) -> Result<A, DbErr>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    if insert {
        return Ok(model);
    }

    let mut query = <A::Entity as EntityTrait>::find();
    for key in <<A::Entity as EntityTrait>::PrimaryKey as Iterable>::iter() {
        let column = key.into_column();
        match model.get(column) {
            ActiveValue::Set(value) | ActiveValue::Unchanged(value) => {
                query = query.filter(column.eq(value));
            }
            ActiveValue::NotSet => return Ok(model),
        }
    }
    let Some(stored) = query.one(db).await? else {
        return Ok(model);
    };

    let mut merged = stored.into_active_model();
    for column in <<A::Entity as EntityTrait>::Column as Iterable>::iter() {
        if let ActiveValue::Set(value) = model.get(column) {
            merged.set(column, value);
        }
    }
    Ok(merged)
}

/// `DbErr` raised by save hooks; maps to a 400 response.
pub fn invalid(field: &str, message: &str) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("Validation failed: {field} {message}"))
}

#[cfg(test)]
pub mod test_helpers;
#[cfg(test)]
mod tests;
