use crate::animals::models::{Animal, Background, CauseOfDeath, Gender};
use crate::strains::models::Strain;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct Meta {
    /// Page size applied, 0 when everything was returned
    pub limit: u64,
    pub offset: u64,
    /// Matching records before pagination
    pub total_count: u64,
}

#[derive(Serialize, ToSchema)]
pub struct Page<T> {
    pub meta: Meta,
    pub objects: Vec<T>,
}

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    /// Page size, 20 by default; 0 returns every record
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Animal with its strain embedded
#[derive(Serialize, ToSchema)]
pub struct AnimalResource {
    #[serde(flatten)]
    pub animal: Animal,
    pub strain: Option<Strain>,
}

#[derive(Default, Deserialize, IntoParams)]
pub struct AnimalFilter {
    pub cage: Option<i32>,
    pub gender: Option<Gender>,
    pub genotype: Option<String>,
    pub background: Option<Background>,
    pub alive: Option<bool>,
    pub ear_tag: Option<i32>,
    /// Strain slug
    pub strain: Option<String>,
    /// Born strictly after this date
    pub born_after: Option<NaiveDate>,
    /// Born strictly before this date
    pub born_before: Option<NaiveDate>,
    pub cause_of_death: Option<CauseOfDeath>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Default, Deserialize, IntoParams)]
pub struct MeasurementFilter {
    /// Assay slug
    pub assay: Option<String>,
    /// Year of the experiment
    pub year: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Default, Deserialize, IntoParams)]
pub struct StrainFilter {
    pub name: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}
