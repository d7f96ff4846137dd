use super::models::{self as experiments, find_experiment};
use super::services::{age_at, parse_values};
use crate::animals::models as animals;
use crate::animals::services::animal_label;
use crate::common::{current, invalid};
use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{
    ActiveValue::Set, IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait,
    entity::prelude::*,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "measurements")]
#[crudcrate(
    api_struct = "Measurement",
    name_singular = "measurement",
    name_plural = "measurements",
    description = "One assay result for one animal in an experiment. Values are comma-separated numbers; several values form a time course.",
    fn_get_one = get_one_measurement,
    fn_get_all = get_all_measurements,
    fn_create = create_measurement,
    fn_update = update_measurement,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub animal_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub experiment_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub assay_id: Uuid,
    pub values: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    /// Age of the animal on the experiment date
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub age_days: Option<i64>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(Measurement, MeasurementCreate, MeasurementUpdate, MeasurementList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::animals::models::Entity",
        from = "Column::AnimalId",
        to = "crate::animals::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Animals,
    #[sea_orm(
        belongs_to = "super::models::Entity",
        from = "Column::ExperimentId",
        to = "super::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Experiments,
    #[sea_orm(
        belongs_to = "super::assays::Entity",
        from = "Column::AssayId",
        to = "super::assays::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Assays,
}

impl Related<crate::animals::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Animals.def()
    }
}

impl Related<super::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiments.def()
    }
}

impl Related<super::assays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assays.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(Some(values)) = current(&self.values) {
            if !values.trim().is_empty() {
                parse_values(values).map_err(|message| invalid("values", &message))?;
            }
        }
        Ok(self)
    }
}

/// Animals, strains, experiments and assays referenced by a set of
/// measurements, loaded once for labelling and exports.
#[derive(Default)]
pub struct MeasurementContext {
    pub animals: HashMap<Uuid, animals::Model>,
    pub strain_names: HashMap<Uuid, String>,
    pub experiments: HashMap<Uuid, experiments::Model>,
    pub assay_names: HashMap<Uuid, String>,
}

impl MeasurementContext {
    pub async fn load<C: ConnectionTrait>(db: &C, measurements: &[Model]) -> Result<Self, DbErr> {
        if measurements.is_empty() {
            return Ok(Self::default());
        }
        let animal_ids: Vec<Uuid> = measurements.iter().map(|m| m.animal_id).collect();
        let experiment_ids: Vec<Uuid> = measurements.iter().map(|m| m.experiment_id).collect();

        let animals: HashMap<Uuid, animals::Model> = animals::Entity::find()
            .filter(animals::Column::Id.is_in(animal_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|animal| (animal.id, animal))
            .collect();
        let strain_names =
            crate::strains::models::names_by_id(db, animals.values().map(|a| a.strain_id)).await?;
        let experiments = experiments::Entity::find()
            .filter(experiments::Column::Id.is_in(experiment_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|experiment| (experiment.id, experiment))
            .collect();
        let assay_names =
            super::assays::names_by_id(db, measurements.iter().map(|m| m.assay_id)).await?;

        Ok(Self {
            animals,
            strain_names,
            experiments,
            assay_names,
        })
    }

    pub fn animal(&self, measurement: &Model) -> Option<&animals::Model> {
        self.animals.get(&measurement.animal_id)
    }

    pub fn strain_name(&self, measurement: &Model) -> Option<&str> {
        self.animal(measurement)
            .and_then(|animal| self.strain_names.get(&animal.strain_id))
            .map(String::as_str)
    }

    pub fn assay_name(&self, measurement: &Model) -> Option<&str> {
        self.assay_names.get(&measurement.assay_id).map(String::as_str)
    }

    pub fn experiment(&self, measurement: &Model) -> Option<&experiments::Model> {
        self.experiments.get(&measurement.experiment_id)
    }

    pub fn age_days(&self, measurement: &Model) -> Option<i64> {
        let experiment = self.experiment(measurement)?;
        age_at(experiment.date, self.animal(measurement)?.born)
    }

    pub fn animal_label(&self, measurement: &Model) -> String {
        let strain = self.strain_name(measurement).unwrap_or("Unknown strain");
        let ear_tag = self.animal(measurement).and_then(|animal| animal.ear_tag);
        animal_label(strain, ear_tag, Some(measurement.animal_id))
    }

    pub fn label(&self, measurement: &Model) -> String {
        let assay = self.assay_name(measurement).unwrap_or("Unknown assay");
        format!("{} {assay}", self.animal_label(measurement))
    }

    fn describe(&self, model: Model) -> Measurement {
        let age_days = self.age_days(&model);
        let label = self.label(&model);
        let mut measurement = Measurement::from(model);
        measurement.age_days = age_days;
        measurement.label = Some(label);
        measurement
    }
}

/// API representations of `models` with label and age
pub async fn describe_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<Measurement>, DbErr> {
    let context = MeasurementContext::load(db, &models).await?;
    Ok(models
        .into_iter()
        .map(|model| context.describe(model))
        .collect())
}

async fn get_one_measurement(db: &DatabaseConnection, id: Uuid) -> Result<Measurement, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Measurement '{id}' not found")))?;
    let context = MeasurementContext::load(db, std::slice::from_ref(&model)).await?;
    Ok(context.describe(model))
}

async fn get_all_measurements(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<MeasurementList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    let context = MeasurementContext::load(db, &models).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let age_days = context.age_days(&model);
            let label = context.label(&model);
            let mut measurement = MeasurementList::from(model);
            measurement.age_days = age_days;
            measurement.label = Some(label);
            measurement
        })
        .collect())
}

async fn create_measurement(
    db: &DatabaseConnection,
    create_data: MeasurementCreate,
) -> Result<Measurement, DbErr> {
    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;
    Measurement::get_one(db, inserted.id).await
}

async fn update_measurement(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: MeasurementUpdate,
) -> Result<Measurement, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Measurement '{id}' not found")))?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    Measurement::get_one(db, id).await
}

/// One row of a bulk measurement upload
#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct NewMeasurement {
    pub animal_id: Uuid,
    pub assay_id: Uuid,
    pub values: Option<String>,
}

/// Adds all `entries` to the experiment, or none of them when one fails.
pub async fn add_to_experiment(
    db: &DatabaseConnection,
    experiment_id: Uuid,
    entries: Vec<NewMeasurement>,
) -> Result<Vec<Measurement>, DbErr> {
    let txn = db.begin().await?;
    find_experiment(&txn, experiment_id).await?;

    let now = Utc::now();
    let mut created = Vec::with_capacity(entries.len());
    for entry in entries {
        let measurement = ActiveModel {
            id: Set(Uuid::new_v4()),
            animal_id: Set(entry.animal_id),
            experiment_id: Set(experiment_id),
            assay_id: Set(entry.assay_id),
            values: Set(entry.values),
            created_at: Set(now),
            last_updated: Set(now),
        };
        created.push(measurement.insert(&txn).await?);
    }
    txn.commit().await?;

    describe_all(db, created).await
}
