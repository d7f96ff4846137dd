use super::services::{age_in_days, animal_label, derive_alive, validate_dates, validate_parents};
use crate::common::{current, with_stored, invalid};
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{
    ActiveValue::Set, IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait,
    entity::prelude::*,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
pub enum Background {
    #[sea_orm(string_value = "C57BL/6-BA")]
    #[serde(rename = "C57BL/6-BA")]
    C57Bl6Ba,
    #[sea_orm(string_value = "C57BL/6-LY5.2")]
    #[serde(rename = "C57BL/6-LY5.2")]
    C57Bl6Ly52,
    #[sea_orm(string_value = "Mixed")]
    Mixed,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(5))")]
pub enum Gender {
    #[sea_orm(string_value = "M")]
    #[serde(rename = "M")]
    Male,
    #[sea_orm(string_value = "F")]
    #[serde(rename = "F")]
    Female,
    #[sea_orm(string_value = "N.D.")]
    #[serde(rename = "N.D.")]
    NotDetermined,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(25))")]
pub enum CauseOfDeath {
    #[sea_orm(string_value = "Unknown")]
    Unknown,
    #[sea_orm(string_value = "Sacrificed")]
    Sacrificed,
    #[sea_orm(string_value = "Accidental")]
    Accidental,
}

impl Background {
    pub fn as_str(self) -> &'static str {
        match self {
            Background::C57Bl6Ba => "C57BL/6-BA",
            Background::C57Bl6Ly52 => "C57BL/6-LY5.2",
            Background::Mixed => "Mixed",
        }
    }
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::NotDetermined => "N.D.",
        }
    }
}

impl CauseOfDeath {
    pub fn as_str(self) -> &'static str {
        match self {
            CauseOfDeath::Unknown => "Unknown",
            CauseOfDeath::Sacrificed => "Sacrificed",
            CauseOfDeath::Accidental => "Accidental",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "animals")]
#[crudcrate(
    api_struct = "Animal",
    name_singular = "animal",
    name_plural = "animals",
    description = "Individual mice. Death dates mark an animal as no longer alive; age is derived from the birth date.",
    fn_get_one = get_one_animal,
    fn_get_all = get_all_animals,
    fn_create = create_animal,
    fn_update = update_animal,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    /// Ear tag number (MouseID)
    #[crudcrate(sortable, filterable)]
    pub ear_tag: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub cage: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub rack: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub rack_position: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub strain_id: Uuid,
    #[crudcrate(sortable, filterable, enum_field)]
    pub background: Background,
    #[crudcrate(sortable, filterable)]
    pub genotype: String,
    #[crudcrate(sortable, filterable, enum_field)]
    pub gender: Gender,
    #[crudcrate(sortable)]
    pub born: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub weaned: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub death: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub cause_of_death: Option<CauseOfDeath>,
    #[crudcrate(sortable, filterable)]
    pub backcross: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub generation: Option<i32>,
    #[crudcrate(sortable, filterable)]
    pub breeding_id: Option<Uuid>,
    #[crudcrate(filterable, list_model = false)]
    pub father_id: Option<Uuid>,
    #[crudcrate(filterable, list_model = false)]
    pub mother_id: Option<Uuid>,
    #[crudcrate(list_model = false)]
    pub markings: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(sortable, filterable, create_model = false, on_create = true)]
    pub alive: bool,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub age_days: Option<i64>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub strain_name: Option<String>,
}

crate::crud_router!(Animal, AnimalCreate, AnimalUpdate, AnimalList);

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
    #[sea_orm(
        belongs_to = "crate::breedings::models::Entity",
        from = "Column::BreedingId",
        to = "crate::breedings::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Breedings,
}

impl Related<crate::strains::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Strains.def()
    }
}

impl Related<crate::breedings::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breedings.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self = with_stored(self, db, insert).await?;
        let death = current(&self.death).copied().flatten();
        if let Some(alive) = current(&self.alive).copied() {
            let derived = derive_alive(death, alive);
            if derived != alive {
                self.alive = Set(derived);
            }
        }

        if current(&self.genotype).is_some_and(|genotype| genotype.trim().is_empty()) {
            self.genotype = Set("N.D.".to_string());
        }

        validate_dates(
            current(&self.born).copied().flatten(),
            current(&self.weaned).copied().flatten(),
            death,
        )
        .map_err(|(field, message)| invalid(field, message))?;

        if let Some(id) = current(&self.id).copied() {
            validate_parents(
                id,
                current(&self.father_id).copied().flatten(),
                current(&self.mother_id).copied().flatten(),
            )
            .map_err(|(field, message)| invalid(field, message))?;
        }

        Ok(self)
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl Animal {
    /// Fills in the display fields from the strain name.
    pub fn with_display(mut self, strain_name: Option<String>) -> Self {
        let strain = strain_name.as_deref().unwrap_or("Unknown strain");
        self.label = Some(animal_label(strain, self.ear_tag, Some(self.id)));
        self.age_days = age_in_days(self.born, self.death, today());
        self.strain_name = strain_name;
        self
    }
}

/// API representations of `models` with display fields, strain names fetched in one query
pub async fn display_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<Animal>, DbErr> {
    let names = crate::strains::models::names_by_id(db, models.iter().map(|m| m.strain_id)).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let strain_name = names.get(&model.strain_id).cloned();
            Animal::from(model).with_display(strain_name)
        })
        .collect())
}

async fn get_one_animal(db: &DatabaseConnection, id: Uuid) -> Result<Animal, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Animal '{id}' not found")))?;

    let strain_name = model
        .find_related(crate::strains::models::Entity)
        .one(db)
        .await?
        .map(|strain| strain.name);

    Ok(Animal::from(model).with_display(strain_name))
}

async fn get_all_animals(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<AnimalList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    // Unsorted listings follow colony order: strain, then ear tag
    query = if matches!(order_column, Column::Id) {
        query
            .order_by_asc(Column::StrainId)
            .order_by_asc(Column::EarTag)
            .order_by_asc(Column::Id)
    } else {
        query.order_by(order_column, order_direction)
    };

    let models = query.offset(offset).limit(limit).all(db).await?;
    let names: HashMap<Uuid, String> =
        crate::strains::models::names_by_id(db, models.iter().map(|m| m.strain_id)).await?;

    let today = today();
    Ok(models
        .into_iter()
        .map(|model| {
            let strain_name = names.get(&model.strain_id).cloned();
            let strain = strain_name.as_deref().unwrap_or("Unknown strain");
            let label = animal_label(strain, model.ear_tag, Some(model.id));
            let age_days = age_in_days(model.born, model.death, today);
            let mut animal = AnimalList::from(model);
            animal.label = Some(label);
            animal.age_days = age_days;
            animal.strain_name = strain_name;
            animal
        })
        .collect())
}

async fn create_animal(db: &DatabaseConnection, create_data: AnimalCreate) -> Result<Animal, DbErr> {
    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;
    Animal::get_one(db, inserted.id).await
}

async fn update_animal(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: AnimalUpdate,
) -> Result<Animal, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Animal '{id}' not found")))?;

    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;

    Animal::get_one(db, id).await
}

/// Stores `count` copies of one animal template in a single transaction.
pub async fn create_batch(
    db: &DatabaseConnection,
    template: AnimalCreate,
    count: u32,
) -> Result<Vec<Animal>, DbErr> {
    let template: ActiveModel = template.into();
    let txn = db.begin().await?;
    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut animal = template.clone();
        animal.id = Set(Uuid::new_v4());
        created.push(animal.insert(&txn).await?);
    }
    txn.commit().await?;

    display_all(db, created).await
}
