use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, TransactionTrait, entity::prelude::*};
use uuid::Uuid;

pub mod animals {
    crate::link_table!("treatment_animals", treatment_id: TreatmentId, animal_id: AnimalId);
}

pub mod researchers {
    crate::link_table!("treatment_researchers", treatment_id: TreatmentId, researcher_id: ResearcherId);
}

pub mod implantations {
    crate::link_table!("treatment_implantations", treatment_id: TreatmentId, implantation_id: ImplantationId);
}

pub mod pharmaceuticals {
    crate::link_table!("treatment_pharmaceuticals", treatment_id: TreatmentId, pharmaceutical_id: PharmaceuticalId);
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "treatments")]
#[crudcrate(
    api_struct = "Treatment",
    name_singular = "treatment",
    name_plural = "treatments",
    description = "Treatment groups of a study: the animals, their diet and housing, and any implants, drugs or transplants they received.",
    fn_get_one = get_one_treatment,
    fn_get_all = get_all_treatments,
    fn_create = create_treatment,
    fn_update = update_treatment,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub name: String,
    #[crudcrate(sortable, filterable)]
    pub study_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub diet_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub environment_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub transplantation_id: Option<Uuid>,
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
    pub researcher_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub implantation_ids: Option<Vec<Uuid>>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None)]
    pub pharmaceutical_ids: Option<Vec<Uuid>>,
}

crate::crud_router!(Treatment, TreatmentCreate, TreatmentUpdate, TreatmentList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::models::Entity",
        from = "Column::StudyId",
        to = "super::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Studies,
}

impl Related<super::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Studies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Member ids of the four treatment link tables; `None` keeps what is stored.
struct Members {
    animal_ids: Option<Vec<Uuid>>,
    researcher_ids: Option<Vec<Uuid>>,
    implantation_ids: Option<Vec<Uuid>>,
    pharmaceutical_ids: Option<Vec<Uuid>>,
}

impl Members {
    async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Self, DbErr> {
        Ok(Self {
            animal_ids: Some(animals::member_ids(db, id).await?),
            researcher_ids: Some(researchers::member_ids(db, id).await?),
            implantation_ids: Some(implantations::member_ids(db, id).await?),
            pharmaceutical_ids: Some(pharmaceuticals::member_ids(db, id).await?),
        })
    }

    async fn store<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> Result<(), DbErr> {
        if let Some(ids) = &self.animal_ids {
            animals::replace(db, id, ids).await?;
        }
        if let Some(ids) = &self.researcher_ids {
            researchers::replace(db, id, ids).await?;
        }
        if let Some(ids) = &self.implantation_ids {
            implantations::replace(db, id, ids).await?;
        }
        if let Some(ids) = &self.pharmaceutical_ids {
            pharmaceuticals::replace(db, id, ids).await?;
        }
        Ok(())
    }
}

async fn get_one_treatment(db: &DatabaseConnection, id: Uuid) -> Result<Treatment, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Treatment '{id}' not found")))?;
    let members = Members::load(db, id).await?;

    let mut treatment = Treatment::from(model);
    treatment.animal_ids = members.animal_ids;
    treatment.researcher_ids = members.researcher_ids;
    treatment.implantation_ids = members.implantation_ids;
    treatment.pharmaceutical_ids = members.pharmaceutical_ids;
    Ok(treatment)
}

async fn get_all_treatments(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<TreatmentList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by(order_column, order_direction)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut animal_ids = animals::members_by_owner(db, &ids).await?;
    let mut researcher_ids = researchers::members_by_owner(db, &ids).await?;
    let mut implantation_ids = implantations::members_by_owner(db, &ids).await?;
    let mut pharmaceutical_ids = pharmaceuticals::members_by_owner(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut treatment = TreatmentList::from(model);
            treatment.animal_ids = Some(animal_ids.remove(&id).unwrap_or_default());
            treatment.researcher_ids = Some(researcher_ids.remove(&id).unwrap_or_default());
            treatment.implantation_ids = Some(implantation_ids.remove(&id).unwrap_or_default());
            treatment.pharmaceutical_ids = Some(pharmaceutical_ids.remove(&id).unwrap_or_default());
            treatment
        })
        .collect())
}

async fn create_treatment(
    db: &DatabaseConnection,
    create_data: TreatmentCreate,
) -> Result<Treatment, DbErr> {
    let members = Members {
        animal_ids: create_data.animal_ids.clone(),
        researcher_ids: create_data.researcher_ids.clone(),
        implantation_ids: create_data.implantation_ids.clone(),
        pharmaceutical_ids: create_data.pharmaceutical_ids.clone(),
    };
    let active_model: ActiveModel = create_data.into();

    let txn = db.begin().await?;
    let inserted = active_model.insert(&txn).await?;
    members.store(&txn, inserted.id).await?;
    txn.commit().await?;

    Treatment::get_one(db, inserted.id).await
}

async fn update_treatment(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: TreatmentUpdate,
) -> Result<Treatment, DbErr> {
    let members = Members {
        animal_ids: update_data.animal_ids.clone(),
        researcher_ids: update_data.researcher_ids.clone(),
        implantation_ids: update_data.implantation_ids.clone(),
        pharmaceutical_ids: update_data.pharmaceutical_ids.clone(),
    };

    let txn = db.begin().await?;
    let existing = Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Treatment '{id}' not found")))?;
    update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(&txn)
        .await?;
    members.store(&txn, id).await?;
    txn.commit().await?;

    Treatment::get_one(db, id).await
}
