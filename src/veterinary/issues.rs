use crate::animals::models as animals;
use crate::animals::services::animal_label;
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, entity::prelude::*};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "medical_issues")]
#[crudcrate(
    api_struct = "MedicalIssue",
    name_singular = "medical_issue",
    name_plural = "medical_issues",
    description = "A medical condition diagnosed on one animal and how it was treated.",
    fn_get_one = get_one_issue,
    fn_get_all = get_all_issues,
    fn_create = create_issue,
    fn_update = update_issue,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub animal_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub condition_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub treatment_id: Option<Uuid>,
    /// Date of diagnosis
    #[crudcrate(sortable)]
    pub diagnosis: Option<NaiveDate>,
    #[crudcrate(sortable, filterable)]
    pub code: Option<String>,
    #[crudcrate(sortable)]
    pub treatment_start: Option<NaiveDate>,
    #[crudcrate(sortable)]
    pub treatment_end: Option<NaiveDate>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(MedicalIssue, MedicalIssueCreate, MedicalIssueUpdate, MedicalIssueList);

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
        belongs_to = "super::conditions::Entity",
        from = "Column::ConditionId",
        to = "super::conditions::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Conditions,
}

impl Related<super::conditions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conditions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Labels of the form `"<animal> - <condition>"` keyed by issue id
pub async fn labels<C: ConnectionTrait>(db: &C, issues: &[Model]) -> Result<HashMap<Uuid, String>, DbErr> {
    if issues.is_empty() {
        return Ok(HashMap::new());
    }
    let animal_ids: Vec<Uuid> = issues.iter().map(|issue| issue.animal_id).collect();
    let condition_ids: Vec<Uuid> = issues.iter().map(|issue| issue.condition_id).collect();

    let animals: HashMap<Uuid, animals::Model> = animals::Entity::find()
        .filter(animals::Column::Id.is_in(animal_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|animal| (animal.id, animal))
        .collect();
    let strain_names =
        crate::strains::models::names_by_id(db, animals.values().map(|a| a.strain_id)).await?;
    let conditions: HashMap<Uuid, String> = super::conditions::Entity::find()
        .filter(super::conditions::Column::Id.is_in(condition_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|condition| (condition.id, condition.name))
        .collect();

    Ok(issues
        .iter()
        .map(|issue| {
            let animal = animals.get(&issue.animal_id);
            let strain = animal
                .and_then(|animal| strain_names.get(&animal.strain_id))
                .map_or("Unknown strain", String::as_str);
            let animal = animal_label(strain, animal.and_then(|a| a.ear_tag), Some(issue.animal_id));
            let condition = conditions
                .get(&issue.condition_id)
                .map_or("Unknown condition", String::as_str);
            (issue.id, format!("{animal} - {condition}"))
        })
        .collect())
}

/// API representations of `models` with their labels
pub async fn describe_all<C: ConnectionTrait>(db: &C, models: Vec<Model>) -> Result<Vec<MedicalIssue>, DbErr> {
    let mut labels = labels(db, &models).await?;
    Ok(models
        .into_iter()
        .map(|model| {
            let label = labels.remove(&model.id);
            let mut issue = MedicalIssue::from(model);
            issue.label = label;
            issue
        })
        .collect())
}

async fn get_one_issue(db: &DatabaseConnection, id: Uuid) -> Result<MedicalIssue, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Medical issue '{id}' not found")))?;
    describe_all(db, vec![model])
        .await?
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound(format!("Medical issue '{id}' not found")))
}

async fn get_all_issues(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<MedicalIssueList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    query = if matches!(order_column, Column::Id) {
        query.order_by_desc(Column::Diagnosis).order_by_asc(Column::Id)
    } else {
        query.order_by(order_column, order_direction)
    };
    let models = query.offset(offset).limit(limit).all(db).await?;
    let mut labels = labels(db, &models).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let label = labels.remove(&model.id);
            let mut issue = MedicalIssueList::from(model);
            issue.label = label;
            issue
        })
        .collect())
}

async fn create_issue(
    db: &DatabaseConnection,
    create_data: MedicalIssueCreate,
) -> Result<MedicalIssue, DbErr> {
    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;
    MedicalIssue::get_one(db, inserted.id).await
}

async fn update_issue(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: MedicalIssueUpdate,
) -> Result<MedicalIssue, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Medical issue '{id}' not found")))?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    MedicalIssue::get_one(db, id).await
}
