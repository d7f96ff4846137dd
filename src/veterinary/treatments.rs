use crate::common::{current, invalid, slug::slugify};
use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "medical_treatments")]
#[crudcrate(
    api_struct = "MedicalTreatment",
    name_singular = "medical_treatment",
    name_plural = "medical_treatments",
    description = "Treatments given for medical conditions.",
    fn_create = create_treatment,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable)]
    pub name: String,
    /// Fixed when the treatment is created
    #[crudcrate(sortable, filterable, create_model = false, update_model = false, on_create = String::new())]
    pub slug: String,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(MedicalTreatment, MedicalTreatmentCreate, MedicalTreatmentUpdate, MedicalTreatmentList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let name = current(&self.name).map(|n| n.trim().to_string());
        match name {
            Some(name) if name.is_empty() => return Err(invalid("name", "cannot be blank")),
            Some(name) if insert => self.slug = Set(slugify(&name)),
            _ => {}
        }
        Ok(self)
    }
}

async fn create_treatment(
    db: &DatabaseConnection,
    create_data: MedicalTreatmentCreate,
) -> Result<MedicalTreatment, DbErr> {
    let active_model: ActiveModel = create_data.into();
    Ok(active_model.insert(db).await?.into())
}
