use crate::common::{current, invalid, slug::slugify};
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{
    ActiveValue::Set, IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait,
    entity::prelude::*,
};
use uuid::Uuid;

pub mod animals {
    crate::link_table!("cohort_animals", cohort_id: CohortId, animal_id: AnimalId);
}

pub mod treatments {
    crate::link_table!("cohort_treatments", cohort_id: CohortId, treatment_id: TreatmentId);
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "cohorts")]
#[crudcrate(
    api_struct = "Cohort",
    name_singular = "cohort",
    name_plural = "cohorts",
    description = "Named groups of animals followed together through one or more treatments.",
    fn_get_one = get_one_cohort,
    fn_get_all = get_all_cohorts,
    fn_create = create_cohort,
    fn_update = update_cohort,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable)]
    pub name: String,
    /// Set from the name when the cohort is created and kept afterwards
    #[crudcrate(sortable, filterable, create_model = false, update_model = false, on_create = String::new())]
    pub slug: String,
    #[crudcrate(sortable)]
    pub start_date: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub end_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub animal_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub treatment_ids: Option<Vec<Uuid>>,
}

crate::crud_router!(Cohort, CohortCreate, CohortUpdate, CohortList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let name = current(&self.name).map(|n| n.trim().to_string());
        if name.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("name", "cannot be blank"));
        }
        if insert {
            if let Some(name) = name {
                self.slug = Set(slugify(&name));
            }
        }
        Ok(self)
    }
}

async fn get_one_cohort(db: &DatabaseConnection, id: Uuid) -> Result<Cohort, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Cohort '{id}' not found")))?;
    let mut cohort = Cohort::from(model);
    cohort.animal_ids = Some(animals::member_ids(db, id).await?);
    cohort.treatment_ids = Some(treatments::member_ids(db, id).await?);
    Ok(cohort)
}

async fn get_all_cohorts(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<CohortList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut animal_ids = animals::members_by_owner(db, &ids).await?;
    let mut treatment_ids = treatments::members_by_owner(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut cohort = CohortList::from(model);
            cohort.animal_ids = Some(animal_ids.remove(&id).unwrap_or_default());
            cohort.treatment_ids = Some(treatment_ids.remove(&id).unwrap_or_default());
            cohort
        })
        .collect())
}

async fn create_cohort(db: &DatabaseConnection, create_data: CohortCreate) -> Result<Cohort, DbErr> {
    let animal_ids = create_data.animal_ids.clone().unwrap_or_default();
    let treatment_ids = create_data.treatment_ids.clone().unwrap_or_default();
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    animals::replace(&txn, inserted.id, &animal_ids).await?;
    treatments::replace(&txn, inserted.id, &treatment_ids).await?;
    txn.commit().await?;

    Cohort::get_one(db, inserted.id).await
}

async fn update_cohort(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: CohortUpdate,
) -> Result<Cohort, DbErr> {
    let animal_ids = update_data.animal_ids.clone();
    let treatment_ids = update_data.treatment_ids.clone();

    let txn = db.begin().await?;
    let existing = Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Cohort '{id}' not found")))?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    if let Some(animal_ids) = animal_ids {
        animals::replace(&txn, id, &animal_ids).await?;
    }
    if let Some(treatment_ids) = treatment_ids {
        treatments::replace(&txn, id, &treatment_ids).await?;
    }
    txn.commit().await?;

    Cohort::get_one(db, id).await
}
