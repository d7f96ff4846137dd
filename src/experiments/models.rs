use super::services::{experiment_label, is_valid_time};
use crate::common::{current, invalid};
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait, entity::prelude::*};
use uuid::Uuid;

pub mod researchers {
    crate::link_table!("experiment_researchers", experiment_id: ExperimentId, researcher_id: ResearcherId);
}

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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum FeedingState {
    #[sea_orm(string_value = "fed")]
    Fed,
    #[sea_orm(string_value = "fasted")]
    Fasted,
}

impl FeedingState {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedingState::Fed => "fed",
            FeedingState::Fasted => "fasted",
        }
    }
}

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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Injection {
    #[sea_orm(string_value = "Insulin")]
    Insulin,
    #[sea_orm(string_value = "Glucose")]
    Glucose,
    #[sea_orm(string_value = "Pyruvate")]
    Pyruvate,
    #[sea_orm(string_value = "Glucagon")]
    Glucagon,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "experiments")]
#[crudcrate(
    api_struct = "Experiment",
    name_singular = "experiment",
    name_plural = "experiments",
    description = "Experiments group measurements taken on one day under the same feeding state and injection.",
    fn_get_one = get_one_experiment,
    fn_get_all = get_all_experiments,
    fn_create = create_experiment,
    fn_update = update_experiment,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable)]
    pub date: NaiveDate,
    /// Start time as `HH:MM`
    #[crudcrate(sortable)]
    pub time: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub experiment_code: Option<String>,
    #[crudcrate(sortable, filterable, enum_field)]
    pub feeding_state: FeedingState,
    /// Hours of fasting before the experiment
    #[crudcrate(sortable, filterable)]
    pub fasting_time: Option<i32>,
    #[crudcrate(sortable)]
    pub injection: Option<Injection>,
    pub concentration: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub study_id: Option<Uuid>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub researcher_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(Experiment, ExperimentCreate, ExperimentUpdate, ExperimentList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::studies::models::Entity",
        from = "Column::StudyId",
        to = "crate::studies::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Studies,
    #[sea_orm(has_many = "super::measurements::Entity")]
    Measurements,
}

impl Related<crate::studies::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Studies.def()
    }
}

impl Related<super::measurements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measurements.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(Some(time)) = current(&self.time) {
            if !is_valid_time(time) {
                return Err(invalid("time", "must be formatted as HH:MM"));
            }
        }
        Ok(self)
    }
}

impl Experiment {
    fn labelled(mut self) -> Self {
        self.label = Some(experiment_label(self.date, self.feeding_state.as_str()));
        self
    }
}

pub async fn find_experiment<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, DbErr> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Experiment '{id}' not found")))
}

/// API representations of `models` with their researchers, fetched in one query
pub async fn describe_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<Experiment>, DbErr> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut researcher_ids = researchers::members_by_owner(db, &ids).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut experiment = Experiment::from(model).labelled();
            experiment.researcher_ids = Some(researcher_ids.remove(&id).unwrap_or_default());
            experiment
        })
        .collect())
}

/// Experiments of a study, newest first
pub async fn for_study<C: ConnectionTrait>(db: &C, study_id: Uuid) -> Result<Vec<Experiment>, DbErr> {
    let models = Entity::find()
        .filter(Column::StudyId.eq(study_id))
        .order_by_desc(Column::Date)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    describe_all(db, models).await
}

async fn get_one_experiment(db: &DatabaseConnection, id: Uuid) -> Result<Experiment, DbErr> {
    let model = find_experiment(db, id).await?;
    let mut experiment = Experiment::from(model).labelled();
    experiment.researcher_ids = Some(researchers::member_ids(db, id).await?);
    Ok(experiment)
}

async fn get_all_experiments(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<ExperimentList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    // Newest experiments first unless asked otherwise
    query = if matches!(order_column, Column::Id) {
        query.order_by_desc(Column::Date).order_by_asc(Column::Id)
    } else {
        query.order_by(order_column, order_direction)
    };
    let models = query.offset(offset).limit(limit).all(db).await?;

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut researcher_ids = researchers::members_by_owner(db, &ids).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let label = experiment_label(model.date, model.feeding_state.as_str());
            let mut experiment = ExperimentList::from(model);
            experiment.label = Some(label);
            experiment.researcher_ids = Some(researcher_ids.remove(&id).unwrap_or_default());
            experiment
        })
        .collect())
}

async fn create_experiment(
    db: &DatabaseConnection,
    create_data: ExperimentCreate,
) -> Result<Experiment, DbErr> {
    let researcher_ids = create_data.researcher_ids.clone().unwrap_or_default();
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    researchers::replace(&txn, inserted.id, &researcher_ids).await?;
    txn.commit().await?;

    Experiment::get_one(db, inserted.id).await
}

async fn update_experiment(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: ExperimentUpdate,
) -> Result<Experiment, DbErr> {
    let researcher_ids = update_data.researcher_ids.clone();

    let txn = db.begin().await?;
    let existing = find_experiment(&txn, id).await?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    if let Some(researcher_ids) = researcher_ids {
        researchers::replace(&txn, id, &researcher_ids).await?;
    }
    txn.commit().await?;

    Experiment::get_one(db, id).await
}
