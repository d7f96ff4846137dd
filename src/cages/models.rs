use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "cages")]
#[crudcrate(
    api_struct = "Cage",
    name_singular = "cage",
    name_plural = "cages",
    description = "Physical cages identified by their barcode. Animals refer to cages by number; see the cage reports for occupancy.",
    fn_get_one = get_one_cage,
    fn_get_all = get_all_cages,
    fn_create = create_cage,
    fn_update = update_cage,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable)]
    pub barcode: i32,
    #[crudcrate(sortable, filterable)]
    pub rack: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub rack_position: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(Cage, CageCreate, CageUpdate, CageList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Cage {
    fn labelled(mut self) -> Self {
        self.label = Some(self.barcode.to_string());
        self
    }
}

async fn get_one_cage(db: &DatabaseConnection, id: Uuid) -> Result<Cage, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Cage '{id}' not found")))?;
    Ok(Cage::from(model).labelled())
}

async fn get_all_cages(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<CageList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    query = if matches!(order_column, Column::Id) {
        query.order_by_asc(Column::Barcode)
    } else {
        query.order_by(order_column, order_direction)
    };

    Ok(query
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|model| {
            let label = model.barcode.to_string();
            let mut cage = CageList::from(model);
            cage.label = Some(label);
            cage
        })
        .collect())
}

async fn create_cage(db: &DatabaseConnection, create_data: CageCreate) -> Result<Cage, DbErr> {
    let active_model: ActiveModel = create_data.into();
    Ok(Cage::from(active_model.insert(db).await?).labelled())
}

async fn update_cage(db: &DatabaseConnection, id: Uuid, update_data: CageUpdate) -> Result<Cage, DbErr> {
    let existing = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Cage '{id}' not found")))?;
    let updated = update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    Ok(Cage::from(updated).labelled())
}
