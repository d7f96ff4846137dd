use crate::common::{current, with_stored};
use chrono::{DateTime, NaiveDate, Utc};
use crudcrate::{CRUDResource, EntityToModels, traits::MergeIntoActiveModel};
use sea_orm::{ActiveValue::Set, IntoActiveModel, QueryOrder, QuerySelect, entity::prelude::*};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "plug_events")]
#[crudcrate(
    api_struct = "PlugEvent",
    name_singular = "plug_event",
    name_plural = "plug_events",
    description = "Timed matings. A plug event records the plugged female of a breeding cage and the embryo counts once she is sacrificed.",
    fn_get_one = get_one_plug_event,
    fn_get_all = get_all_plug_events,
    fn_create = create_plug_event,
    fn_update = update_plug_event,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub breeding_id: Option<Uuid>,
    #[crudcrate(sortable)]
    pub plug_date: NaiveDate,
    #[crudcrate(sortable, filterable)]
    pub plug_female_id: Option<Uuid>,
    #[crudcrate(sortable, filterable)]
    pub plug_male_id: Option<Uuid>,
    #[crudcrate(sortable)]
    pub sacrifice_date: Option<NaiveDate>,
    #[crudcrate(sortable, filterable)]
    pub researcher_id: Option<Uuid>,
    pub wt_alive: Option<i32>,
    pub het_alive: Option<i32>,
    pub ko_alive: Option<i32>,
    pub wt_dead: Option<i32>,
    pub het_dead: Option<i32>,
    pub ko_dead: Option<i32>,
    #[crudcrate(sortable, filterable, create_model = false, on_create = true)]
    pub active: bool,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(list_model = false)]
    pub notes: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub label: Option<String>,
}

crate::crud_router!(PlugEvent, PlugEventCreate, PlugEventUpdate, PlugEventList);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::breedings::models::Entity",
        from = "Column::BreedingId",
        to = "crate::breedings::models::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Breedings,
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
        // Sacrificed females close the event
        let sacrificed = current(&self.sacrifice_date).copied().flatten().is_some();
        if sacrificed && current(&self.active).copied() != Some(false) {
            self.active = Set(false);
        }
        Ok(self)
    }
}

pub fn plug_event_label(id: Uuid) -> String {
    format!("Plug Event - {id}")
}

impl PlugEvent {
    fn labelled(mut self) -> Self {
        self.label = Some(plug_event_label(self.id));
        self
    }
}

pub async fn find_plug_event<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Model, DbErr> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Plug event '{id}' not found")))
}

async fn get_one_plug_event(db: &DatabaseConnection, id: Uuid) -> Result<PlugEvent, DbErr> {
    Ok(PlugEvent::from(find_plug_event(db, id).await?).labelled())
}

async fn get_all_plug_events(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    order_column: Column,
    order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<PlugEventList>, DbErr> {
    let mut query = Entity::find().filter(condition.clone());
    // Most recent plugs first
    query = if matches!(order_column, Column::Id) {
        query.order_by_desc(Column::PlugDate).order_by_asc(Column::Id)
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
            let label = plug_event_label(model.id);
            let mut event = PlugEventList::from(model);
            event.label = Some(label);
            event
        })
        .collect())
}

async fn create_plug_event(
    db: &DatabaseConnection,
    create_data: PlugEventCreate,
) -> Result<PlugEvent, DbErr> {
    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;
    Ok(PlugEvent::from(inserted).labelled())
}

async fn update_plug_event(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: PlugEventUpdate,
) -> Result<PlugEvent, DbErr> {
    let existing = find_plug_event(db, id).await?;
    let updated = update_data
        .merge_into_activemodel(existing.into_active_model())?
        .update(db)
        .await?;
    Ok(PlugEvent::from(updated).labelled())
}

/// Plug event for one breeding cage, as recorded from the cage view
pub async fn record_for_breeding<C: ConnectionTrait>(
    db: &C,
    breeding_id: Uuid,
    plug_date: NaiveDate,
    plug_female_id: Option<Uuid>,
    plug_male_id: Option<Uuid>,
    researcher_id: Option<Uuid>,
    notes: Option<String>,
) -> Result<PlugEvent, DbErr> {
    let now = chrono::Utc::now();
    let event = ActiveModel {
        id: Set(Uuid::new_v4()),
        breeding_id: Set(Some(breeding_id)),
        plug_date: Set(plug_date),
        plug_female_id: Set(plug_female_id),
        plug_male_id: Set(plug_male_id),
        researcher_id: Set(researcher_id),
        active: Set(true),
        notes: Set(notes),
        created_at: Set(now),
        last_updated: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(PlugEvent::from(event).labelled())
}

/// Plug events whose plugged female belongs to `strain_id`, newest first
pub async fn for_strain<C: ConnectionTrait>(db: &C, strain_id: Uuid) -> Result<Vec<PlugEvent>, DbErr> {
    use crate::animals::models as animals;

    let females: Vec<Uuid> = animals::Entity::find()
        .select_only()
        .column(animals::Column::Id)
        .filter(animals::Column::StrainId.eq(strain_id))
        .into_tuple()
        .all(db)
        .await?;
    if females.is_empty() {
        return Ok(vec![]);
    }

    Ok(Entity::find()
        .filter(Column::PlugFemaleId.is_in(females))
        .order_by_desc(Column::PlugDate)
        .all(db)
        .await?
        .into_iter()
        .map(|model| PlugEvent::from(model).labelled())
        .collect())
}
