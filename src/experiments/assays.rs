use crate::common::{current, invalid, slug::slug_or_name, with_stored};
use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use std::collections::HashMap;
use uuid::Uuid;

/// Name of the assay exported as body weights
pub const BODY_WEIGHT: &str = "Body Weight";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "assays")]
#[crudcrate(
    api_struct = "Assay",
    name_singular = "assay",
    name_plural = "assays",
    description = "Kinds of measurement (body weight, blood glucose, ...) and their units.",
    fn_create = create_assay,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub name: String,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable, create_model = false, on_create = String::new())]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[crudcrate(filterable)]
    pub measurement_units: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(Assay, AssayCreate, AssayUpdate, AssayList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::measurements::Entity")]
    Measurements,
}

impl Related<super::measurements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measurements.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self = with_stored(self, db, insert).await?;
        if let Some(name) = current(&self.name).map(|n| n.trim().to_string()) {
            if name.is_empty() {
                return Err(invalid("name", "cannot be blank"));
            }
            let slug = slug_or_name(current(&self.slug).map(String::as_str), &name);
            self.slug = Set(slug);
        }
        Ok(self)
    }
}

async fn create_assay(db: &DatabaseConnection, create_data: AssayCreate) -> Result<Assay, DbErr> {
    let active_model: ActiveModel = create_data.into();
    Ok(active_model.insert(db).await?.into())
}

pub async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Model, DbErr> {
    Entity::find()
        .filter(Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Assay with slug '{slug}' not found")))
}

pub async fn names_by_id<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(Entity::find()
        .filter(Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|assay| (assay.id, assay.name))
        .collect())
}
