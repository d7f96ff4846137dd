use crate::common::{current, with_stored, invalid, slug::slug_or_name};
use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{ActiveValue::Set, IntoActiveModel, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "strains")]
#[crudcrate(
    api_struct = "Strain",
    name_singular = "strain",
    name_plural = "strains",
    description = "Mouse strains. Every animal and breeding cage belongs to one strain; the slug is used in report URLs.",
    fn_create = create_strain,
    fn_update = update_strain,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable)]
    pub name: String,
    /// Generated from the name when left blank
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable, create_model = false, on_create = String::new())]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(filterable)]
    pub source: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(Strain, StrainCreate, StrainUpdate, StrainList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::animals::models::Entity")]
    Animals,
    #[sea_orm(has_many = "crate::breedings::models::Entity")]
    Breedings,
}

impl Related<crate::animals::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Animals.def()
    }
}

impl Related<crate::breedings::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breedings.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self = with_stored(self, db, insert).await?;
        let name = current(&self.name).map(|n| n.trim().to_string());
        if let Some(name) = name {
            if name.is_empty() {
                return Err(invalid("name", "cannot be blank"));
            }
            let slug = slug_or_name(current(&self.slug).map(String::as_str), &name);
            self.name = Set(name);
            self.slug = Set(slug);
        }
        Ok(self)
    }
}

pub(super) async fn create_strain(
    db: &DatabaseConnection,
    create_data: StrainCreate,
) -> Result<Strain, DbErr> {
    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;
    Ok(inserted.into())
}

pub(super) async fn update_strain(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: StrainUpdate,
) -> Result<Strain, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Strain '{id}' not found")))?;

    let updated = update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    Ok(updated.into())
}

/// Strain looked up by its URL slug
pub async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Model, DbErr> {
    Entity::find()
        .filter(Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Strain with slug '{slug}' not found")))
}

/// Strain names keyed by id, for attaching display names to listings.
pub async fn names_by_id<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<std::collections::HashMap<Uuid, String>, DbErr> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }
    Ok(Entity::find()
        .filter(Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|strain| (strain.id, strain.name))
        .collect())
}
