use crate::helpers::{drop_table, id, link_table, timestamp};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Strains::Table)
                    .if_not_exists()
                    .col(id(Strains::Id))
                    .col(ColumnDef::new(Strains::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Strains::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Strains::Source).text())
                    .col(ColumnDef::new(Strains::Comments).text())
                    .col(timestamp(Strains::CreatedAt))
                    .col(timestamp(Strains::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Breedings::Table)
                    .if_not_exists()
                    .col(id(Breedings::Id))
                    .col(ColumnDef::new(Breedings::Name).string())
                    .col(ColumnDef::new(Breedings::StrainId).uuid().not_null())
                    .col(ColumnDef::new(Breedings::Cage).string())
                    .col(ColumnDef::new(Breedings::Rack).string())
                    .col(ColumnDef::new(Breedings::RackPosition).string())
                    .col(ColumnDef::new(Breedings::StartDate).date())
                    .col(ColumnDef::new(Breedings::EndDate).date())
                    .col(ColumnDef::new(Breedings::CrossType).string())
                    .col(ColumnDef::new(Breedings::Notes).text())
                    .col(
                        ColumnDef::new(Breedings::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Breedings::TimedMating)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Breedings::Genotype)
                            .string()
                            .not_null()
                            .default("N.D."),
                    )
                    .col(
                        ColumnDef::new(Breedings::Background)
                            .string()
                            .not_null()
                            .default("Mixed"),
                    )
                    .col(ColumnDef::new(Breedings::Backcross).integer())
                    .col(ColumnDef::new(Breedings::Generation).integer())
                    .col(timestamp(Breedings::CreatedAt))
                    .col(timestamp(Breedings::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breedings_strain_id")
                            .from(Breedings::Table, Breedings::StrainId)
                            .to(Strains::Table, Strains::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Animals::Table)
                    .if_not_exists()
                    .col(id(Animals::Id))
                    .col(ColumnDef::new(Animals::EarTag).integer())
                    .col(ColumnDef::new(Animals::Cage).integer())
                    .col(ColumnDef::new(Animals::Rack).string())
                    .col(ColumnDef::new(Animals::RackPosition).string())
                    .col(ColumnDef::new(Animals::StrainId).uuid().not_null())
                    .col(ColumnDef::new(Animals::Background).string().not_null())
                    .col(
                        ColumnDef::new(Animals::Genotype)
                            .string()
                            .not_null()
                            .default("N.D."),
                    )
                    .col(
                        ColumnDef::new(Animals::Gender)
                            .string()
                            .not_null()
                            .default("N.D."),
                    )
                    .col(ColumnDef::new(Animals::Born).date())
                    .col(ColumnDef::new(Animals::Weaned).date())
                    .col(ColumnDef::new(Animals::Death).date())
                    .col(ColumnDef::new(Animals::CauseOfDeath).string())
                    .col(ColumnDef::new(Animals::Backcross).integer())
                    .col(ColumnDef::new(Animals::Generation).integer())
                    .col(ColumnDef::new(Animals::BreedingId).uuid())
                    .col(ColumnDef::new(Animals::FatherId).uuid())
                    .col(ColumnDef::new(Animals::MotherId).uuid())
                    .col(ColumnDef::new(Animals::Markings).string())
                    .col(ColumnDef::new(Animals::Notes).text())
                    .col(
                        ColumnDef::new(Animals::Alive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(Animals::CreatedAt))
                    .col(timestamp(Animals::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animals_strain_id")
                            .from(Animals::Table, Animals::StrainId)
                            .to(Strains::Table, Strains::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animals_breeding_id")
                            .from(Animals::Table, Animals::BreedingId)
                            .to(Breedings::Table, Breedings::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animals_father_id")
                            .from(Animals::Table, Animals::FatherId)
                            .to(Animals::Table, Animals::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_animals_mother_id")
                            .from(Animals::Table, Animals::MotherId)
                            .to(Animals::Table, Animals::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                "breeding_females",
                "breeding_id",
                "breedings",
                "animal_id",
                "animals",
            ))
            .await?;
        manager
            .create_table(link_table(
                "breeding_males",
                "breeding_id",
                "breedings",
                "animal_id",
                "animals",
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cages::Table)
                    .if_not_exists()
                    .col(id(Cages::Id))
                    .col(ColumnDef::new(Cages::Barcode).integer().not_null().unique_key())
                    .col(ColumnDef::new(Cages::Rack).string())
                    .col(ColumnDef::new(Cages::RackPosition).string())
                    .col(timestamp(Cages::CreatedAt))
                    .col(timestamp(Cages::LastUpdated))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "cages",
            "breeding_males",
            "breeding_females",
            "animals",
            "breedings",
            "strains",
        ] {
            manager.drop_table(drop_table(table)).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Strains {
    Table,
    Id,
    Name,
    Slug,
    Source,
    Comments,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Breedings {
    Table,
    Id,
    Name,
    StrainId,
    Cage,
    Rack,
    RackPosition,
    StartDate,
    EndDate,
    CrossType,
    Notes,
    Active,
    TimedMating,
    Genotype,
    Background,
    Backcross,
    Generation,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Animals {
    Table,
    Id,
    EarTag,
    Cage,
    Rack,
    RackPosition,
    StrainId,
    Background,
    Genotype,
    Gender,
    Born,
    Weaned,
    Death,
    CauseOfDeath,
    Backcross,
    Generation,
    BreedingId,
    FatherId,
    MotherId,
    Markings,
    Notes,
    Alive,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Cages {
    Table,
    Id,
    Barcode,
    Rack,
    RackPosition,
    CreatedAt,
    LastUpdated,
}
