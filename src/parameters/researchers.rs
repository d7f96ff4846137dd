use crate::common::{current, with_stored, invalid, slug::slug_or_name};
use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{ActiveValue::Set, QueryOrder, QuerySelect, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "researchers")]
#[crudcrate(
    api_struct = "Researcher",
    name_singular = "researcher",
    name_plural = "researchers",
    description = "People performing experiments and treatments.",
    fn_get_all = get_all_researchers,
    fn_create = create_researcher,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub first_name: String,
    #[crudcrate(sortable, filterable)]
    pub last_name: String,
    /// Generated from the full name when left blank
    #[crudcrate(sortable, filterable, create_model = false, on_create = String::new())]
    pub name_slug: String,
    #[crudcrate(sortable, filterable)]
    pub email: Option<String>,
    #[crudcrate(sortable, filterable, create_model = false, on_create = true)]
    pub active: bool,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
}

crate::crud_router!(Researcher, ResearcherCreate, ResearcherUpdate, ResearcherList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self = with_stored(self, db, insert).await?;
        let first = current(&self.first_name).map(|name| name.trim().to_string());
        let last = current(&self.last_name).map(|name| name.trim().to_string());
        if let (Some(first), Some(last)) = (first, last) {
            if first.is_empty() && last.is_empty() {
                return Err(invalid("name", "cannot be blank"));
            }
            let full_name = format!("{first} {last}");
            let slug = slug_or_name(current(&self.name_slug).map(String::as_str), &full_name);
            self.name_slug = Set(slug);
        }
        Ok(self)
    }
}

async fn create_researcher(
    db: &DatabaseConnection,
    create_data: ResearcherCreate,
) -> Result<Researcher, DbErr> {
    let active_model: ActiveModel = create_data.into();
    Ok(active_model.insert(db).await?.into())
}

async fn get_all_researchers(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<ResearcherList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    query = if matches!(order_column, Column::Id) {
        query
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
    } else {
        query.order_by(order_column, order_direction)
    };

    Ok(query
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(ResearcherList::from)
        .collect())
}
