use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait, entity::prelude::*};
use uuid::Uuid;

pub mod donors {
    crate::link_table!("transplantation_donors", transplantation_id: TransplantationId, animal_id: AnimalId);
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "transplantations")]
#[crudcrate(
    api_struct = "Transplantation",
    name_singular = "transplantation",
    name_plural = "transplantations",
    description = "Tissue transplanted from donor animals.",
    fn_get_one = get_one_transplantation,
    fn_get_all = get_all_transplantations,
    fn_create = create_transplantation,
    fn_update = update_transplantation,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub tissue: String,
    #[crudcrate(sortable)]
    pub transplant_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub donor_ids: Option<Vec<Uuid>>,
}

crate::crud_router!(Transplantation, TransplantationCreate, TransplantationUpdate, TransplantationList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

async fn get_one_transplantation(db: &DatabaseConnection, id: Uuid) -> Result<Transplantation, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Transplantation '{id}' not found")))?;
    let mut transplantation = Transplantation::from(model);
    transplantation.donor_ids = Some(donors::member_ids(db, id).await?);
    Ok(transplantation)
}

async fn get_all_transplantations(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<TransplantationList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut donor_ids = donors::members_by_owner(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut transplantation = TransplantationList::from(model);
            transplantation.donor_ids = Some(donor_ids.remove(&id).unwrap_or_default());
            transplantation
        })
        .collect())
}

async fn create_transplantation(
    db: &DatabaseConnection,
    create_data: TransplantationCreate,
) -> Result<Transplantation, DbErr> {
    let donor_ids = create_data.donor_ids.clone().unwrap_or_default();
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    donors::replace(&txn, inserted.id, &donor_ids).await?;
    txn.commit().await?;

    Transplantation::get_one(db, inserted.id).await
}

async fn update_transplantation(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: TransplantationUpdate,
) -> Result<Transplantation, DbErr> {
    let donor_ids = update_data.donor_ids.clone();

    let txn = db.begin().await?;
    let existing = Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Transplantation '{id}' not found")))?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    if let Some(donor_ids) = donor_ids {
        donors::replace(&txn, id, &donor_ids).await?;
    }
    txn.commit().await?;

    Transplantation::get_one(db, id).await
}
