use crate::helpers::{drop_table, id, timestamp};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicalConditions::Table)
                    .if_not_exists()
                    .col(id(MedicalConditions::Id))
                    .col(
                        ColumnDef::new(MedicalConditions::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MedicalConditions::Slug).string().not_null())
                    .col(ColumnDef::new(MedicalConditions::Notes).text())
                    .col(timestamp(MedicalConditions::CreatedAt))
                    .col(timestamp(MedicalConditions::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicalTreatments::Table)
                    .if_not_exists()
                    .col(id(MedicalTreatments::Id))
                    .col(
                        ColumnDef::new(MedicalTreatments::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MedicalTreatments::Slug).string().not_null())
                    .col(timestamp(MedicalTreatments::CreatedAt))
                    .col(timestamp(MedicalTreatments::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MedicalIssues::Table)
                    .if_not_exists()
                    .col(id(MedicalIssues::Id))
                    .col(ColumnDef::new(MedicalIssues::AnimalId).uuid().not_null())
                    .col(ColumnDef::new(MedicalIssues::ConditionId).uuid().not_null())
                    .col(ColumnDef::new(MedicalIssues::TreatmentId).uuid())
                    .col(ColumnDef::new(MedicalIssues::Diagnosis).date())
                    .col(ColumnDef::new(MedicalIssues::Code).string_len(25))
                    .col(ColumnDef::new(MedicalIssues::TreatmentStart).date())
                    .col(ColumnDef::new(MedicalIssues::TreatmentEnd).date())
                    .col(timestamp(MedicalIssues::CreatedAt))
                    .col(timestamp(MedicalIssues::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_issues_animal_id")
                            .from(MedicalIssues::Table, MedicalIssues::AnimalId)
                            .to(Alias::new("animals"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_issues_condition_id")
                            .from(MedicalIssues::Table, MedicalIssues::ConditionId)
                            .to(MedicalConditions::Table, MedicalConditions::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_issues_treatment_id")
                            .from(MedicalIssues::Table, MedicalIssues::TreatmentId)
                            .to(MedicalTreatments::Table, MedicalTreatments::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["medical_issues", "medical_treatments", "medical_conditions"] {
            manager.drop_table(drop_table(table)).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MedicalConditions {
    Table,
    Id,
    Name,
    Slug,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum MedicalTreatments {
    Table,
    Id,
    Name,
    Slug,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum MedicalIssues {
    Table,
    Id,
    AnimalId,
    ConditionId,
    TreatmentId,
    Diagnosis,
    Code,
    TreatmentStart,
    TreatmentEnd,
    CreatedAt,
    LastUpdated,
}
