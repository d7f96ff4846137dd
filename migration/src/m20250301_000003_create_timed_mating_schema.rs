use crate::helpers::{drop_table, id, timestamp};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(PlugEvents::Table)
            .if_not_exists()
            .col(id(PlugEvents::Id))
            .col(ColumnDef::new(PlugEvents::BreedingId).uuid())
            .col(ColumnDef::new(PlugEvents::PlugDate).date().not_null())
            .col(ColumnDef::new(PlugEvents::PlugFemaleId).uuid())
            .col(ColumnDef::new(PlugEvents::PlugMaleId).uuid())
            .col(ColumnDef::new(PlugEvents::SacrificeDate).date())
            .col(ColumnDef::new(PlugEvents::ResearcherId).uuid());

        for count in [
            PlugEvents::WtAlive,
            PlugEvents::HetAlive,
            PlugEvents::KoAlive,
            PlugEvents::WtDead,
            PlugEvents::HetDead,
            PlugEvents::KoDead,
        ] {
            table.col(ColumnDef::new(count).integer());
        }

        table
            .col(
                ColumnDef::new(PlugEvents::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(PlugEvents::Notes).text())
            .col(timestamp(PlugEvents::CreatedAt))
            .col(timestamp(PlugEvents::LastUpdated))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_plug_events_breeding_id")
                    .from(PlugEvents::Table, PlugEvents::BreedingId)
                    .to(Alias::new("breedings"), Alias::new("id"))
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_plug_events_plug_female_id")
                    .from(PlugEvents::Table, PlugEvents::PlugFemaleId)
                    .to(Alias::new("animals"), Alias::new("id"))
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_plug_events_plug_male_id")
                    .from(PlugEvents::Table, PlugEvents::PlugMaleId)
                    .to(Alias::new("animals"), Alias::new("id"))
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_plug_events_researcher_id")
                    .from(PlugEvents::Table, PlugEvents::ResearcherId)
                    .to(Alias::new("researchers"), Alias::new("id"))
                    .on_delete(ForeignKeyAction::SetNull)
                    .on_update(ForeignKeyAction::NoAction),
            );

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(drop_table("plug_events")).await
    }
}

#[derive(DeriveIden)]
enum PlugEvents {
    Table,
    Id,
    BreedingId,
    PlugDate,
    PlugFemaleId,
    PlugMaleId,
    SacrificeDate,
    ResearcherId,
    WtAlive,
    HetAlive,
    KoAlive,
    WtDead,
    HetDead,
    KoDead,
    Active,
    Notes,
    CreatedAt,
    LastUpdated,
}
