use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "diets")]
#[crudcrate(
    api_struct = "Diet",
    name_singular = "diet",
    name_plural = "diets",
    description = "Animal chow. Contents are percentages of calories."
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub vendor_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub description: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub product_id: Option<String>,
    #[crudcrate(sortable)]
    pub fat_content: Option<i32>,
    #[crudcrate(sortable)]
    pub protein_content: Option<i32>,
    #[crudcrate(sortable)]
    pub carb_content: Option<i32>,
    #[crudcrate(filterable)]
    pub irradiated: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(Diet, DietCreate, DietUpdate, DietList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Vendors,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
