//! Flat CSV renditions of colony data for analysis in spreadsheets.
use crate::animals::models::{self as animals, today};
use crate::animals::services::age_in_days;
use crate::breedings::models::{self as breedings, describe_all};
use crate::experiments::assays::{self, BODY_WEIGHT};
use crate::experiments::measurements::{self, MeasurementContext};
use crate::experiments::models::find_experiment;
use crate::strains::models::names_by_id;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

pub const AGING_HEADER: [&str; 6] = ["Animal", "Strain", "Genotype", "Age", "Death", "Alive"];
pub const LITTERS_HEADER: [&str; 3] = ["Born", "Breeding", "Strain"];
pub const BODY_WEIGHTS_HEADER: [&str; 8] = [
    "Animal", "Genotype", "Assay", "Value", "Strain", "Age", "Cage", "Feeding",
];
pub const EXPERIMENT_HEADER: [&str; 5] = ["Animal", "Genotype", "Age", "Assay", "Values"];

#[derive(Debug, Serialize)]
pub struct AgingRow {
    pub animal: Option<i32>,
    pub strain: String,
    pub genotype: String,
    pub age: Option<i64>,
    /// Cause of death
    pub death: Option<&'static str>,
    pub alive: bool,
}

#[derive(Debug, Serialize)]
pub struct LitterRow {
    pub born: Option<NaiveDate>,
    pub breeding: Option<String>,
    pub strain: String,
}

#[derive(Debug, Serialize)]
pub struct BodyWeightRow {
    pub animal: String,
    pub genotype: String,
    pub assay: String,
    pub value: Option<String>,
    pub strain: String,
    pub age: Option<i64>,
    pub cage: Option<i32>,
    pub feeding: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ExperimentRow {
    pub animal: String,
    pub genotype: String,
    pub age: Option<i64>,
    pub assay: String,
    pub values: Option<String>,
}

/// Writes `header` followed by one record per row. Missing values become
/// empty fields.
pub fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("Failed to flush CSV: {}", err.error()))
}

fn strain_of(names: &HashMap<Uuid, String>, strain_id: Uuid) -> String {
    names.get(&strain_id).cloned().unwrap_or_default()
}

pub async fn aging_rows<C: ConnectionTrait>(db: &C) -> Result<Vec<AgingRow>, DbErr> {
    let animals = animals::Entity::find()
        .order_by_asc(animals::Column::StrainId)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    let names = names_by_id(db, animals.iter().map(|a| a.strain_id)).await?;
    let today = today();

    Ok(animals
        .into_iter()
        .map(|animal| AgingRow {
            animal: animal.ear_tag,
            strain: strain_of(&names, animal.strain_id),
            age: age_in_days(animal.born, animal.death, today),
            death: animal.cause_of_death.map(animals::CauseOfDeath::as_str),
            alive: animal.alive,
            genotype: animal.genotype,
        })
        .collect())
}

pub async fn litter_rows<C: ConnectionTrait>(db: &C) -> Result<Vec<LitterRow>, DbErr> {
    let animals = animals::Entity::find()
        .order_by_asc(animals::Column::Born)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    let names = names_by_id(db, animals.iter().map(|a| a.strain_id)).await?;

    let mut breeding_ids: Vec<Uuid> = animals.iter().filter_map(|a| a.breeding_id).collect();
    breeding_ids.sort_unstable();
    breeding_ids.dedup();
    let breeding_models = breedings::Entity::find()
        .filter(breedings::Column::Id.is_in(breeding_ids))
        .all(db)
        .await?;
    let breeding_labels: HashMap<Uuid, String> = describe_all(db, breeding_models)
        .await?
        .into_iter()
        .filter_map(|breeding| Some((breeding.id, breeding.label?)))
        .collect();

    Ok(animals
        .into_iter()
        .map(|animal| LitterRow {
            born: animal.born,
            breeding: animal
                .breeding_id
                .and_then(|id| breeding_labels.get(&id).cloned()),
            strain: strain_of(&names, animal.strain_id),
        })
        .collect())
}

/// Every measurement of the body weight assay; nothing when the assay is not set up
pub async fn body_weight_rows<C: ConnectionTrait>(db: &C) -> Result<Vec<BodyWeightRow>, DbErr> {
    let Some(assay) = assays::Entity::find()
        .filter(assays::Column::Name.eq(BODY_WEIGHT))
        .one(db)
        .await?
    else {
        return Ok(vec![]);
    };
    let models = measurements::Entity::find()
        .filter(measurements::Column::AssayId.eq(assay.id))
        .order_by_asc(measurements::Column::CreatedAt)
        .order_by_asc(measurements::Column::Id)
        .all(db)
        .await?;
    let context = MeasurementContext::load(db, &models).await?;
    let today = today();

    Ok(models
        .iter()
        .map(|measurement| {
            let animal = context.animal(measurement);
            BodyWeightRow {
                animal: context.animal_label(measurement),
                genotype: animal.map(|a| a.genotype.clone()).unwrap_or_default(),
                assay: assay.name.clone(),
                value: measurement.values.clone(),
                strain: context.strain_name(measurement).unwrap_or_default().to_string(),
                age: animal.and_then(|a| age_in_days(a.born, a.death, today)),
                cage: animal.and_then(|a| a.cage),
                feeding: context
                    .experiment(measurement)
                    .map(|experiment| experiment.feeding_state.as_str()),
            }
        })
        .collect())
}

/// Measurements of one experiment, with the animals' age on the experiment date
pub async fn experiment_rows<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Vec<ExperimentRow>, DbErr> {
    find_experiment(db, id).await?;
    let models = measurements::Entity::find()
        .filter(measurements::Column::ExperimentId.eq(id))
        .order_by_asc(measurements::Column::CreatedAt)
        .order_by_asc(measurements::Column::Id)
        .all(db)
        .await?;
    let context = MeasurementContext::load(db, &models).await?;

    Ok(models
        .iter()
        .map(|measurement| ExperimentRow {
            animal: context.animal_label(measurement),
            genotype: context
                .animal(measurement)
                .map(|a| a.genotype.clone())
                .unwrap_or_default(),
            age: context.age_days(measurement),
            assay: context.assay_name(measurement).unwrap_or_default().to_string(),
            values: measurement.values.clone(),
        })
        .collect())
}
