use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "vendors")]
#[crudcrate(
    api_struct = "Vendor",
    name_singular = "vendor",
    name_plural = "vendors",
    description = "Suppliers of diets, implants and pharmaceuticals."
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub name: String,
    pub website: Option<String>,
    pub email: Option<String>,
    /// How to order from this vendor
    pub ordering: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(Vendor, VendorCreate, VendorUpdate, VendorList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::diets::Entity")]
    Diets,
}

impl Related<super::diets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
