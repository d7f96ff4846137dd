use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait, entity::prelude::*};
use uuid::Uuid;

pub mod strains {
    crate::link_table!("study_strains", study_id: StudyId, strain_id: StrainId);
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "studies")]
#[crudcrate(
    api_struct = "Study",
    name_singular = "study",
    name_plural = "studies",
    description = "Studies group experiments and treatments on a set of strains.",
    fn_get_one = get_one_study,
    fn_get_all = get_all_studies,
    fn_create = create_study,
    fn_update = update_study,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub description: String,
    #[crudcrate(sortable)]
    pub start_date: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub stop_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub strain_ids: Option<Vec<Uuid>>,
}

crate::crud_router!(Study, StudyCreate, StudyUpdate, StudyList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::experiments::models::Entity")]
    Experiments,
}

impl Related<crate::experiments::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_study<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, DbErr> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Study '{id}' not found")))
}

/// API representations of `models` with their strains
pub async fn describe_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<Study>, DbErr> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut strain_ids = strains::members_by_owner(db, &ids).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut study = Study::from(model);
            study.strain_ids = Some(strain_ids.remove(&id).unwrap_or_default());
            study
        })
        .collect())
}

async fn get_one_study(db: &DatabaseConnection, id: Uuid) -> Result<Study, DbErr> {
    let model = find_study(db, id).await?;
    let mut study = Study::from(model);
    study.strain_ids = Some(strains::member_ids(db, id).await?);
    Ok(study)
}

async fn get_all_studies(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<StudyList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut strain_ids = strains::members_by_owner(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut study = StudyList::from(model);
            study.strain_ids = Some(strain_ids.remove(&id).unwrap_or_default());
            study
        })
        .collect())
}

async fn create_study(db: &DatabaseConnection, create_data: StudyCreate) -> Result<Study, DbErr> {
    let strain_ids = create_data.strain_ids.clone().unwrap_or_default();
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    strains::replace(&txn, inserted.id, &strain_ids).await?;
    txn.commit().await?;

    Study::get_one(db, inserted.id).await
}

async fn update_study(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: StudyUpdate,
) -> Result<Study, DbErr> {
    let strain_ids = update_data.strain_ids.clone();

    let txn = db.begin().await?;
    let existing = find_study(&txn, id).await?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    if let Some(strain_ids) = strain_ids {
        strains::replace(&txn, id, &strain_ids).await?;
    }
    txn.commit().await?;

    Study::get_one(db, id).await
}
