use super::conditions::{self, MedicalCondition};
use super::issues::{self, MedicalIssue};
use super::treatments::{self, MedicalTreatment};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct VeterinaryOverview {
    pub issues: Vec<MedicalIssue>,
    pub conditions: Vec<MedicalCondition>,
    pub treatments: Vec<MedicalTreatment>,
}

/// Every medical issue (most recent diagnosis first) with the known
/// conditions and treatments
pub async fn overview<C: ConnectionTrait>(db: &C) -> Result<VeterinaryOverview, DbErr> {
    let issue_models = issues::Entity::find()
        .order_by_desc(issues::Column::Diagnosis)
        .order_by_asc(issues::Column::Id)
        .all(db)
        .await?;
    let conditions = conditions::Entity::find()
        .order_by_asc(conditions::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(MedicalCondition::from)
        .collect();
    let treatments = treatments::Entity::find()
        .order_by_asc(treatments::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(MedicalTreatment::from)
        .collect();

    Ok(VeterinaryOverview {
        issues: issues::describe_all(db, issue_models).await?,
        conditions,
        treatments,
    })
}
