use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, entity::prelude::*};
use uuid::Uuid;

/// Route of administration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
pub enum Mode {
    #[sea_orm(string_value = "tail vein")]
    #[serde(rename = "tail vein")]
    TailVein,
    #[sea_orm(string_value = "interperitoneal")]
    #[serde(rename = "interperitoneal")]
    Interperitoneal,
    #[sea_orm(string_value = "oral gavage")]
    #[serde(rename = "oral gavage")]
    OralGavage,
    #[sea_orm(string_value = "water")]
    #[serde(rename = "water")]
    Water,
    #[sea_orm(string_value = "food")]
    #[serde(rename = "food")]
    Food,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "pharmaceuticals")]
#[crudcrate(
    api_struct = "Pharmaceutical",
    name_singular = "pharmaceutical",
    name_plural = "pharmaceuticals",
    description = "Drug regimens: dose, how often and by which route.",
    fn_get_one = get_one_pharmaceutical,
    fn_get_all = get_all_pharmaceuticals,
    fn_create = create_pharmaceutical,
    fn_update = update_pharmaceutical,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub drug: String,
    #[crudcrate(sortable, filterable)]
    pub dose: String,
    #[crudcrate(sortable, filterable)]
    pub recurrence: String,
    #[crudcrate(sortable, filterable, enum_field)]
    pub mode: Mode,
    #[crudcrate(sortable, filterable)]
    pub vendor_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(Pharmaceutical, PharmaceuticalCreate, PharmaceuticalUpdate, PharmaceuticalList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn pharmaceutical_label(drug: &str, dose: &str, recurrence: &str) -> String {
    format!("{drug} at {dose}, {recurrence}")
}

impl Pharmaceutical {
    fn labelled(mut self) -> Self {
        self.label = Some(pharmaceutical_label(&self.drug, &self.dose, &self.recurrence));
        self
    }
}

async fn get_one_pharmaceutical(db: &DatabaseConnection, id: Uuid) -> Result<Pharmaceutical, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Pharmaceutical '{id}' not found")))?;
    Ok(Pharmaceutical::from(model).labelled())
}

async fn get_all_pharmaceuticals(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<PharmaceuticalList>, DbErr> {
    Ok(Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|model| {
            let label = pharmaceutical_label(&model.drug, &model.dose, &model.recurrence);
            let mut pharmaceutical = PharmaceuticalList::from(model);
            pharmaceutical.label = Some(label);
            pharmaceutical
        })
        .collect())
}

async fn create_pharmaceutical(
    db: &DatabaseConnection,
    create_data: PharmaceuticalCreate,
) -> Result<Pharmaceutical, DbErr> {
    let active_model: ActiveModel = create_data.into();
    Ok(Pharmaceutical::from(active_model.insert(db).await?).labelled())
}

async fn update_pharmaceutical(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: PharmaceuticalUpdate,
) -> Result<Pharmaceutical, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Pharmaceutical '{id}' not found")))?;
    let updated = update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    Ok(Pharmaceutical::from(updated).labelled())
}

#[cfg(test)]
mod tests {
    use super::pharmaceutical_label;

    #[test]
    fn test_pharmaceutical_label() {
        assert_eq!(
            pharmaceutical_label("Tamoxifen", "1 mg", "daily for 5 days"),
            "Tamoxifen at 1 mg, daily for 5 days"
        );
    }
}
