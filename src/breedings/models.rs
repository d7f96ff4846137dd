use super::services::{breeding_label, parse_cage_numbers};
use crate::animals::models::{self as animals, Animal, Background, Gender, display_all};
use crate::common::{current, with_stored};
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{
    ActiveValue::Set, IntoActiveModel, Iterable, QueryOrder, QuerySelect, TransactionTrait,
    entity::prelude::*,
};
use uuid::Uuid;

pub mod females {
    crate::link_table!("breeding_females", breeding_id: BreedingId, animal_id: AnimalId);
}

pub mod males {
    crate::link_table!("breeding_males", breeding_id: BreedingId, animal_id: AnimalId);
}

/// Genotypes of the parents, stored by their short code
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
pub enum CrossType {
    #[sea_orm(string_value = "WT vs HET")]
    #[serde(rename = "WT vs HET")]
    WtVsHet,
    #[sea_orm(string_value = "HET vs HET")]
    #[serde(rename = "HET vs HET")]
    HetVsHet,
    #[sea_orm(string_value = "KO vs HET")]
    #[serde(rename = "KO vs HET")]
    KoVsHet,
    #[sea_orm(string_value = "KO vs WT")]
    #[serde(rename = "KO vs WT")]
    KoVsWt,
    #[sea_orm(string_value = "WT vs WT")]
    #[serde(rename = "WT vs WT")]
    WtVsWt,
    #[sea_orm(string_value = "KO vs KO")]
    #[serde(rename = "KO vs KO")]
    KoVsKo,
}

impl CrossType {
    pub fn code(self) -> &'static str {
        match self {
            CrossType::WtVsHet => "WT vs HET",
            CrossType::HetVsHet => "HET vs HET",
            CrossType::KoVsHet => "KO vs HET",
            CrossType::KoVsWt => "KO vs WT",
            CrossType::WtVsWt => "WT vs WT",
            CrossType::KoVsKo => "KO vs KO",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CrossType::WtVsHet => "Backcross",
            CrossType::HetVsHet => "Intercross",
            CrossType::KoVsHet => "Knockout vs Heterozygote",
            CrossType::KoVsWt => "Generate Hets",
            CrossType::WtVsWt => "Wild-Type Only",
            CrossType::KoVsKo => "Knockout Only",
        }
    }

    /// Accepts either the display name or the stored code, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        CrossType::iter().find(|cross| {
            cross.display_name().eq_ignore_ascii_case(name) || cross.code().eq_ignore_ascii_case(name)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "breedings")]
#[crudcrate(
    api_struct = "Breeding",
    name_singular = "breeding",
    name_plural = "breedings",
    description = "Breeding cages. The cage field may list several cage numbers separated by commas; genotype, background, backcross and generation describe the pups.",
    fn_get_one = get_one_breeding,
    fn_get_all = get_all_breedings,
    fn_create = create_breeding,
    fn_update = update_breeding,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub name: Option<String>,
    /// Strain of the progeny
    #[crudcrate(sortable, filterable)]
    pub strain_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub cage: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub rack: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub rack_position: Option<String>,
    #[crudcrate(sortable)]
    pub start_date: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub end_date: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub cross_type: Option<CrossType>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(sortable, filterable, create_model = false, on_create = true)]
    pub active: bool,
    #[crudcrate(sortable, filterable)]
    pub timed_mating: bool,
    #[crudcrate(sortable, filterable)]
    pub genotype: String,
    #[crudcrate(sortable, filterable, enum_field)]
    pub background: Background,
    #[crudcrate(sortable, filterable)]
    pub backcross: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub generation: Option<i32>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    /// Replaces the stored females when given on update
    #[crudcrate(non_db_attr = true, default = None)]
    pub female_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub male_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub strain_name: Option<String>,
}

crate::crud_router!(Breeding, BreedingCreate, BreedingUpdate, BreedingList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::strains::models::Entity",
        from = "Column::StrainId",
        to = "crate::strains::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Strains,
    #[sea_orm(has_many = "crate::animals::models::Entity")]
    Pups,
}

impl Related<crate::strains::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Strains.def()
    }
}

impl Related<crate::animals::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pups.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self = with_stored(self, db, insert).await?;
        let ended = current(&self.end_date).copied().flatten().is_some();
        if ended && current(&self.active).copied() != Some(false) {
            self.active = Set(false);
        }
        if current(&self.genotype).is_some_and(|genotype| genotype.trim().is_empty()) {
            self.genotype = Set("N.D.".to_string());
        }
        Ok(self)
    }
}

impl Breeding {
    fn with_display(mut self, strain_name: Option<String>) -> Self {
        let strain = strain_name.as_deref().unwrap_or("Unknown strain");
        self.label = Some(breeding_label(strain, self.cage.as_deref(), self.start_date));
        self.strain_name = strain_name;
        self
    }
}

/// First cage number of the breeding, where pups are housed
pub fn first_cage(model: &Model) -> Option<i32> {
    model
        .cage
        .as_deref()
        .and_then(|cage| parse_cage_numbers(cage).first().copied())
}

pub async fn find_breeding<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, DbErr> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Breeding '{id}' not found")))
}

/// API representations of `models` with members and display fields
pub async fn describe_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<Breeding>, DbErr> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut female_ids = females::members_by_owner(db, &ids).await?;
    let mut male_ids = males::members_by_owner(db, &ids).await?;
    let names =
        crate::strains::models::names_by_id(db, models.iter().map(|m| m.strain_id)).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let strain_name = names.get(&model.strain_id).cloned();
            let mut breeding = Breeding::from(model).with_display(strain_name);
            breeding.female_ids = Some(female_ids.remove(&id).unwrap_or_default());
            breeding.male_ids = Some(male_ids.remove(&id).unwrap_or_default());
            breeding
        })
        .collect())
}

async fn get_one_breeding(db: &DatabaseConnection, id: Uuid) -> Result<Breeding, DbErr> {
    let model = find_breeding(db, id).await?;
    describe_all(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound(format!("Breeding '{id}' not found")))
}

async fn get_all_breedings(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<BreedingList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    query = if matches!(order_column, Column::Id) {
        query.order_by_desc(Column::StartDate).order_by_asc(Column::Id)
    } else {
        query.order_by(order_column, order_direction)
    };
    let models = query.offset(offset).limit(limit).all(db).await?;

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut female_ids = females::members_by_owner(db, &ids).await?;
    let mut male_ids = males::members_by_owner(db, &ids).await?;
    let names =
        crate::strains::models::names_by_id(db, models.iter().map(|m| m.strain_id)).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let strain_name = names.get(&model.strain_id).cloned();
            let strain = strain_name.as_deref().unwrap_or("Unknown strain");
            let label = breeding_label(strain, model.cage.as_deref(), model.start_date);
            let id = model.id;
            let mut breeding = BreedingList::from(model);
            breeding.label = Some(label);
            breeding.strain_name = strain_name;
            breeding.female_ids = Some(female_ids.remove(&id).unwrap_or_default());
            breeding.male_ids = Some(male_ids.remove(&id).unwrap_or_default());
            breeding
        })
        .collect())
}

async fn create_breeding(
    db: &DatabaseConnection,
    create_data: BreedingCreate,
) -> Result<Breeding, DbErr> {
    let female_ids = create_data.female_ids.clone().unwrap_or_default();
    let male_ids = create_data.male_ids.clone().unwrap_or_default();
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    females::replace(&txn, inserted.id, &female_ids).await?;
    males::replace(&txn, inserted.id, &male_ids).await?;
    txn.commit().await?;

    Breeding::get_one(db, inserted.id).await
}

async fn update_breeding(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: BreedingUpdate,
) -> Result<Breeding, DbErr> {
    let female_ids = update_data.female_ids.clone();
    let male_ids = update_data.male_ids.clone();

    let txn = db.begin().await?;
    let existing = find_breeding(&txn, id).await?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    // Omitted member lists are left as stored
    if let Some(female_ids) = female_ids {
        females::replace(&txn, id, &female_ids).await?;
    }
    if let Some(male_ids) = male_ids {
        males::replace(&txn, id, &male_ids).await?;
    }
    txn.commit().await?;

    Breeding::get_one(db, id).await
}

/// Alive pups of the breeding that have not been weaned yet
pub async fn unweaned_pups(db: &DatabaseConnection, id: Uuid) -> Result<Vec<Animal>, DbErr> {
    find_breeding(db, id).await?;
    let pups = animals::Entity::find()
        .filter(animals::Column::BreedingId.eq(id))
        .filter(animals::Column::Alive.eq(true))
        .filter(animals::Column::Weaned.is_null())
        .order_by_asc(animals::Column::Born)
        .order_by_asc(animals::Column::EarTag)
        .all(db)
        .await?;
    display_all(db, pups).await
}

/// Breeding males ordered by ear tag; the first one decides the male location.
pub async fn breeding_males<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Vec<animals::Model>, DbErr> {
    let ids = males::member_ids(db, id).await?;
    if ids.is_empty() {
        return Ok(vec![]);
    }
    animals::Entity::find()
        .filter(animals::Column::Id.is_in(ids))
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await
}

/// Stores `count` pups housed in the breeding's first cage and inheriting
/// its strain, background, genotype, backcross and generation.
pub async fn create_pups(
    db: &DatabaseConnection,
    breeding: &Model,
    count: u32,
    gender: Gender,
    born: NaiveDate,
    weaned: Option<NaiveDate>,
) -> Result<Vec<Animal>, DbErr> {
    let now = Utc::now();
    let template = animals::ActiveModel {
        cage: Set(first_cage(breeding)),
        rack: Set(breeding.rack.clone()),
        rack_position: Set(breeding.rack_position.clone()),
        strain_id: Set(breeding.strain_id),
        background: Set(breeding.background),
        genotype: Set(breeding.genotype.clone()),
        gender: Set(gender),
        born: Set(Some(born)),
        weaned: Set(weaned),
        backcross: Set(breeding.backcross),
        generation: Set(breeding.generation),
        breeding_id: Set(Some(breeding.id)),
        alive: Set(true),
        created_at: Set(now),
        last_updated: Set(now),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let mut pups = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut pup = template.clone();
        pup.id = Set(Uuid::new_v4());
        pups.push(pup.insert(&txn).await?);
    }
    txn.commit().await?;

    display_all(db, pups).await
}
