use super::models::{AnimalFilter, AnimalResource, MeasurementFilter, Meta, Page, StrainFilter};
use crate::animals::models::{self as animals, display_all};
use crate::experiments::assays::{self, Assay};
use crate::experiments::measurements::{self, Measurement};
use crate::experiments::models::{self as experiments, Experiment};
use crate::strains::models::{self as strains, Strain};
use crate::studies::models::{self as studies, Study};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Select,
};
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_LIMIT: u64 = 20;

/// Page size to query (`None` for everything) and the metadata to report
pub fn window(limit: Option<u64>, offset: Option<u64>, total_count: u64) -> (Option<u64>, Meta) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let meta = Meta {
        limit,
        offset: offset.unwrap_or(0),
        total_count,
    };
    ((limit > 0).then_some(limit), meta)
}

async fn paginate<C, E>(
    db: &C,
    select: Select<E>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<(Meta, Vec<E::Model>), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let total_count = select.clone().count(db).await?;
    let (limit, meta) = window(limit, offset, total_count);
    // SQLite rejects OFFSET without LIMIT
    let limit = limit.unwrap_or(i64::MAX.unsigned_abs());
    let models = select.offset(meta.offset).limit(limit).all(db).await?;
    Ok((meta, models))
}

fn not_found(resource: &str, id: Uuid) -> DbErr {
    DbErr::RecordNotFound(format!("{resource} '{id}' not found"))
}

pub fn animal_condition(filter: &AnimalFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(cage) = filter.cage {
        condition = condition.add(animals::Column::Cage.eq(cage));
    }
    if let Some(gender) = filter.gender {
        condition = condition.add(animals::Column::Gender.eq(gender));
    }
    if let Some(genotype) = &filter.genotype {
        condition = condition.add(animals::Column::Genotype.eq(genotype.as_str()));
    }
    if let Some(background) = filter.background {
        condition = condition.add(animals::Column::Background.eq(background));
    }
    if let Some(alive) = filter.alive {
        condition = condition.add(animals::Column::Alive.eq(alive));
    }
    if let Some(ear_tag) = filter.ear_tag {
        condition = condition.add(animals::Column::EarTag.eq(ear_tag));
    }
    if let Some(slug) = &filter.strain {
        condition = condition.add(
            animals::Column::StrainId.in_subquery(
                strains::Entity::find()
                    .select_only()
                    .column(strains::Column::Id)
                    .filter(strains::Column::Slug.eq(slug.as_str()))
                    .into_query(),
            ),
        );
    }
    if let Some(date) = filter.born_after {
        condition = condition.add(animals::Column::Born.gt(date));
    }
    if let Some(date) = filter.born_before {
        condition = condition.add(animals::Column::Born.lt(date));
    }
    if let Some(cause) = filter.cause_of_death {
        condition = condition.add(animals::Column::CauseOfDeath.eq(cause));
    }
    condition
}

async fn animal_resources<C: ConnectionTrait>(
    db: &C,
    models: Vec<animals::Model>,
) -> Result<Vec<AnimalResource>, DbErr> {
    let mut strain_ids: Vec<Uuid> = models.iter().map(|m| m.strain_id).collect();
    strain_ids.sort_unstable();
    strain_ids.dedup();
    let strains: HashMap<Uuid, strains::Model> = strains::Entity::find()
        .filter(strains::Column::Id.is_in(strain_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|strain| (strain.id, strain))
        .collect();

    Ok(display_all(db, models)
        .await?
        .into_iter()
        .map(|animal| AnimalResource {
            strain: strains.get(&animal.strain_id).cloned().map(Strain::from),
            animal,
        })
        .collect())
}

pub async fn animal_page<C: ConnectionTrait>(db: &C, filter: &AnimalFilter) -> Result<Page<AnimalResource>, DbErr> {
    let select = animals::Entity::find()
        .filter(animal_condition(filter))
        .order_by_asc(animals::Column::StrainId)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id);
    let (meta, models) = paginate(db, select, filter.limit, filter.offset).await?;
    Ok(Page {
        meta,
        objects: animal_resources(db, models).await?,
    })
}

pub async fn animal<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<AnimalResource, DbErr> {
    let model = animals::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Animal", id))?;
    animal_resources(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| not_found("Animal", id))
}

pub async fn strain_page<C: ConnectionTrait>(db: &C, filter: &StrainFilter) -> Result<Page<Strain>, DbErr> {
    let mut select = strains::Entity::find().order_by_asc(strains::Column::Name);
    if let Some(name) = &filter.name {
        select = select.filter(strains::Column::Name.eq(name.as_str()));
    }
    let (meta, models) = paginate(db, select, filter.limit, filter.offset).await?;
    Ok(Page {
        meta,
        objects: models.into_iter().map(Strain::from).collect(),
    })
}

pub async fn strain<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Strain, DbErr> {
    strains::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(Strain::from)
        .ok_or_else(|| not_found("Strain", id))
}

/// `year` must already be a valid calendar year range.
pub async fn measurement_page<C: ConnectionTrait>(
    db: &C,
    filter: &MeasurementFilter,
    year: Option<(NaiveDate, NaiveDate)>,
) -> Result<Page<Measurement>, DbErr> {
    let mut select = measurements::Entity::find()
        .order_by_asc(measurements::Column::CreatedAt)
        .order_by_asc(measurements::Column::Id);
    if let Some(slug) = &filter.assay {
        select = select.filter(
            measurements::Column::AssayId.in_subquery(
                assays::Entity::find()
                    .select_only()
                    .column(assays::Column::Id)
                    .filter(assays::Column::Slug.eq(slug.as_str()))
                    .into_query(),
            ),
        );
    }
    if let Some((start, end)) = year {
        select = select.filter(
            measurements::Column::ExperimentId.in_subquery(
                experiments::Entity::find()
                    .select_only()
                    .column(experiments::Column::Id)
                    .filter(experiments::Column::Date.gte(start))
                    .filter(experiments::Column::Date.lt(end))
                    .into_query(),
            ),
        );
    }
    let (meta, models) = paginate(db, select, filter.limit, filter.offset).await?;
    Ok(Page {
        meta,
        objects: measurements::describe_all(db, models).await?,
    })
}

pub async fn measurement<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Measurement, DbErr> {
    let model = measurements::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| not_found("Measurement", id))?;
    measurements::describe_all(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| not_found("Measurement", id))
}

pub async fn assay_page<C: ConnectionTrait>(db: &C, limit: Option<u64>, offset: Option<u64>) -> Result<Page<Assay>, DbErr> {
    let select = assays::Entity::find().order_by_asc(assays::Column::Name);
    let (meta, models) = paginate(db, select, limit, offset).await?;
    Ok(Page {
        meta,
        objects: models.into_iter().map(Assay::from).collect(),
    })
}

pub async fn assay<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Assay, DbErr> {
    assays::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(Assay::from)
        .ok_or_else(|| not_found("Assay", id))
}

pub async fn experiment_page<C: ConnectionTrait>(
    db: &C,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Page<Experiment>, DbErr> {
    let select = experiments::Entity::find()
        .order_by_desc(experiments::Column::Date)
        .order_by_asc(experiments::Column::Id);
    let (meta, models) = paginate(db, select, limit, offset).await?;
    Ok(Page {
        meta,
        objects: experiments::describe_all(db, models).await?,
    })
}

pub async fn experiment<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Experiment, DbErr> {
    let model = experiments::find_experiment(db, id).await?;
    experiments::describe_all(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| not_found("Experiment", id))
}

pub async fn study_page<C: ConnectionTrait>(db: &C, limit: Option<u64>, offset: Option<u64>) -> Result<Page<Study>, DbErr> {
    let select = studies::Entity::find()
        .order_by_asc(studies::Column::Description)
        .order_by_asc(studies::Column::Id);
    let (meta, models) = paginate(db, select, limit, offset).await?;
    Ok(Page {
        meta,
        objects: studies::describe_all(db, models).await?,
    })
}

pub async fn study<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Study, DbErr> {
    let model = studies::find_study(db, id).await?;
    studies::describe_all(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| not_found("Study", id))
}
