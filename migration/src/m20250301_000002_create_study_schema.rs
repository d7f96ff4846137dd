use crate::helpers::{drop_table, id, link_table, timestamp};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn fk(
    name: &str,
    from_table: impl IntoIden + 'static,
    from_col: impl IntoIden,
    to_table: impl IntoIden + 'static,
    on_delete: ForeignKeyAction,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from_table, from_col)
        .to(to_table, Alias::new("id"))
        .on_delete(on_delete)
        .on_update(ForeignKeyAction::NoAction)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Parameters
        manager
            .create_table(
                Table::create()
                    .table(Researchers::Table)
                    .if_not_exists()
                    .col(id(Researchers::Id))
                    .col(ColumnDef::new(Researchers::FirstName).string().not_null())
                    .col(ColumnDef::new(Researchers::LastName).string().not_null())
                    .col(ColumnDef::new(Researchers::NameSlug).string().not_null())
                    .col(ColumnDef::new(Researchers::Email).string())
                    .col(
                        ColumnDef::new(Researchers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(Researchers::CreatedAt))
                    .col(timestamp(Researchers::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(id(Vendors::Id))
                    .col(ColumnDef::new(Vendors::Name).string().not_null())
                    .col(ColumnDef::new(Vendors::Website).string())
                    .col(ColumnDef::new(Vendors::Email).string())
                    .col(ColumnDef::new(Vendors::Ordering).string())
                    .col(ColumnDef::new(Vendors::Notes).text())
                    .col(timestamp(Vendors::CreatedAt))
                    .col(timestamp(Vendors::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Diets::Table)
                    .if_not_exists()
                    .col(id(Diets::Id))
                    .col(ColumnDef::new(Diets::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Diets::Description).string())
                    .col(ColumnDef::new(Diets::ProductId).string())
                    .col(ColumnDef::new(Diets::FatContent).integer())
                    .col(ColumnDef::new(Diets::ProteinContent).integer())
                    .col(ColumnDef::new(Diets::CarbContent).integer())
                    .col(
                        ColumnDef::new(Diets::Irradiated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Diets::Notes).text())
                    .col(timestamp(Diets::CreatedAt))
                    .col(timestamp(Diets::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_diets_vendor_id",
                        Diets::Table,
                        Diets::VendorId,
                        Vendors::Table,
                        ForeignKeyAction::Restrict,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Environments::Table)
                    .if_not_exists()
                    .col(id(Environments::Id))
                    .col(ColumnDef::new(Environments::Building).string().not_null())
                    .col(ColumnDef::new(Environments::Room).string().not_null())
                    .col(ColumnDef::new(Environments::Temperature).integer())
                    .col(ColumnDef::new(Environments::Humidity).integer())
                    .col(ColumnDef::new(Environments::Notes).text())
                    .col(timestamp(Environments::CreatedAt))
                    .col(timestamp(Environments::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Implantations::Table)
                    .if_not_exists()
                    .col(id(Implantations::Id))
                    .col(ColumnDef::new(Implantations::Implant).string().not_null())
                    .col(ColumnDef::new(Implantations::VendorId).uuid())
                    .col(ColumnDef::new(Implantations::ProductId).string())
                    .col(ColumnDef::new(Implantations::Notes).text())
                    .col(timestamp(Implantations::CreatedAt))
                    .col(timestamp(Implantations::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_implantations_vendor_id",
                        Implantations::Table,
                        Implantations::VendorId,
                        Vendors::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pharmaceuticals::Table)
                    .if_not_exists()
                    .col(id(Pharmaceuticals::Id))
                    .col(ColumnDef::new(Pharmaceuticals::Drug).string().not_null())
                    .col(ColumnDef::new(Pharmaceuticals::Dose).string().not_null())
                    .col(ColumnDef::new(Pharmaceuticals::Recurrence).string().not_null())
                    .col(ColumnDef::new(Pharmaceuticals::Mode).string().not_null())
                    .col(ColumnDef::new(Pharmaceuticals::VendorId).uuid())
                    .col(ColumnDef::new(Pharmaceuticals::Notes).text())
                    .col(timestamp(Pharmaceuticals::CreatedAt))
                    .col(timestamp(Pharmaceuticals::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_pharmaceuticals_vendor_id",
                        Pharmaceuticals::Table,
                        Pharmaceuticals::VendorId,
                        Vendors::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transplantations::Table)
                    .if_not_exists()
                    .col(id(Transplantations::Id))
                    .col(ColumnDef::new(Transplantations::Tissue).string().not_null())
                    .col(ColumnDef::new(Transplantations::TransplantDate).date())
                    .col(ColumnDef::new(Transplantations::Notes).text())
                    .col(timestamp(Transplantations::CreatedAt))
                    .col(timestamp(Transplantations::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                "transplantation_donors",
                "transplantation_id",
                "transplantations",
                "animal_id",
                "animals",
            ))
            .await?;

        // Studies and experiments
        manager
            .create_table(
                Table::create()
                    .table(Studies::Table)
                    .if_not_exists()
                    .col(id(Studies::Id))
                    .col(ColumnDef::new(Studies::Description).string().not_null())
                    .col(ColumnDef::new(Studies::StartDate).date())
                    .col(ColumnDef::new(Studies::StopDate).date())
                    .col(ColumnDef::new(Studies::Notes).text())
                    .col(timestamp(Studies::CreatedAt))
                    .col(timestamp(Studies::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                "study_strains",
                "study_id",
                "studies",
                "strain_id",
                "strains",
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Experiments::Table)
                    .if_not_exists()
                    .col(id(Experiments::Id))
                    .col(ColumnDef::new(Experiments::Date).date().not_null())
                    .col(ColumnDef::new(Experiments::Time).string_len(5))
                    .col(ColumnDef::new(Experiments::Notes).text())
                    .col(ColumnDef::new(Experiments::ExperimentCode).string())
                    .col(
                        ColumnDef::new(Experiments::FeedingState)
                            .string()
                            .not_null()
                            .default("fed"),
                    )
                    .col(ColumnDef::new(Experiments::FastingTime).integer())
                    .col(ColumnDef::new(Experiments::Injection).string())
                    .col(ColumnDef::new(Experiments::Concentration).string())
                    .col(ColumnDef::new(Experiments::StudyId).uuid())
                    .col(timestamp(Experiments::CreatedAt))
                    .col(timestamp(Experiments::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_experiments_study_id",
                        Experiments::Table,
                        Experiments::StudyId,
                        Studies::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                "experiment_researchers",
                "experiment_id",
                "experiments",
                "researcher_id",
                "researchers",
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assays::Table)
                    .if_not_exists()
                    .col(id(Assays::Id))
                    .col(ColumnDef::new(Assays::Name).string().not_null())
                    .col(ColumnDef::new(Assays::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Assays::Notes).text())
                    .col(ColumnDef::new(Assays::MeasurementUnits).string())
                    .col(timestamp(Assays::CreatedAt))
                    .col(timestamp(Assays::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Measurements::Table)
                    .if_not_exists()
                    .col(id(Measurements::Id))
                    .col(ColumnDef::new(Measurements::AnimalId).uuid().not_null())
                    .col(ColumnDef::new(Measurements::ExperimentId).uuid().not_null())
                    .col(ColumnDef::new(Measurements::AssayId).uuid().not_null())
                    .col(ColumnDef::new(Measurements::Values).string())
                    .col(timestamp(Measurements::CreatedAt))
                    .col(timestamp(Measurements::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_measurements_animal_id",
                        Measurements::Table,
                        Measurements::AnimalId,
                        Alias::new("animals"),
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        "fk_measurements_experiment_id",
                        Measurements::Table,
                        Measurements::ExperimentId,
                        Experiments::Table,
                        ForeignKeyAction::Cascade,
                    ))
                    .foreign_key(&mut fk(
                        "fk_measurements_assay_id",
                        Measurements::Table,
                        Measurements::AssayId,
                        Assays::Table,
                        ForeignKeyAction::Restrict,
                    ))
                    .to_owned(),
            )
            .await?;

        // Treatment groups and cohorts
        manager
            .create_table(
                Table::create()
                    .table(Treatments::Table)
                    .if_not_exists()
                    .col(id(Treatments::Id))
                    .col(ColumnDef::new(Treatments::Name).string().not_null())
                    .col(ColumnDef::new(Treatments::StudyId).uuid())
                    .col(ColumnDef::new(Treatments::DietId).uuid())
                    .col(ColumnDef::new(Treatments::EnvironmentId).uuid())
                    .col(ColumnDef::new(Treatments::TransplantationId).uuid())
                    .col(ColumnDef::new(Treatments::Notes).text())
                    .col(timestamp(Treatments::CreatedAt))
                    .col(timestamp(Treatments::LastUpdated))
                    .foreign_key(&mut fk(
                        "fk_treatments_study_id",
                        Treatments::Table,
                        Treatments::StudyId,
                        Studies::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .foreign_key(&mut fk(
                        "fk_treatments_diet_id",
                        Treatments::Table,
                        Treatments::DietId,
                        Diets::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .foreign_key(&mut fk(
                        "fk_treatments_environment_id",
                        Treatments::Table,
                        Treatments::EnvironmentId,
                        Environments::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .foreign_key(&mut fk(
                        "fk_treatments_transplantation_id",
                        Treatments::Table,
                        Treatments::TransplantationId,
                        Transplantations::Table,
                        ForeignKeyAction::SetNull,
                    ))
                    .to_owned(),
            )
            .await?;

        for (table, member_col, member_table) in [
            ("treatment_animals", "animal_id", "animals"),
            ("treatment_researchers", "researcher_id", "researchers"),
            ("treatment_implantations", "implantation_id", "implantations"),
            ("treatment_pharmaceuticals", "pharmaceutical_id", "pharmaceuticals"),
        ] {
            manager
                .create_table(link_table(
                    table,
                    "treatment_id",
                    "treatments",
                    member_col,
                    member_table,
                ))
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Cohorts::Table)
                    .if_not_exists()
                    .col(id(Cohorts::Id))
                    .col(ColumnDef::new(Cohorts::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Cohorts::Slug).string().not_null())
                    .col(ColumnDef::new(Cohorts::StartDate).date())
                    .col(ColumnDef::new(Cohorts::EndDate).date())
                    .col(ColumnDef::new(Cohorts::Notes).text())
                    .col(timestamp(Cohorts::CreatedAt))
                    .col(timestamp(Cohorts::LastUpdated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(link_table(
                "cohort_animals",
                "cohort_id",
                "cohorts",
                "animal_id",
                "animals",
            ))
            .await?;
        manager
            .create_table(link_table(
                "cohort_treatments",
                "cohort_id",
                "cohorts",
                "treatment_id",
                "treatments",
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "cohort_treatments",
            "cohort_animals",
            "cohorts",
            "treatment_pharmaceuticals",
            "treatment_implantations",
            "treatment_researchers",
            "treatment_animals",
            "treatments",
            "measurements",
            "assays",
            "experiment_researchers",
            "experiments",
            "study_strains",
            "studies",
            "transplantation_donors",
            "transplantations",
            "pharmaceuticals",
            "implantations",
            "environments",
            "diets",
            "vendors",
            "researchers",
        ] {
            manager.drop_table(drop_table(table)).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Researchers {
    Table,
    Id,
    FirstName,
    LastName,
    NameSlug,
    Email,
    Active,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    Name,
    Website,
    Email,
    Ordering,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Diets {
    Table,
    Id,
    VendorId,
    Description,
    ProductId,
    FatContent,
    ProteinContent,
    CarbContent,
    Irradiated,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Environments {
    Table,
    Id,
    Building,
    Room,
    Temperature,
    Humidity,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Implantations {
    Table,
    Id,
    Implant,
    VendorId,
    ProductId,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Pharmaceuticals {
    Table,
    Id,
    Drug,
    Dose,
    Recurrence,
    Mode,
    VendorId,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Transplantations {
    Table,
    Id,
    Tissue,
    TransplantDate,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Studies {
    Table,
    Id,
    Description,
    StartDate,
    StopDate,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Experiments {
    Table,
    Id,
    Date,
    Time,
    Notes,
    ExperimentCode,
    FeedingState,
    FastingTime,
    Injection,
    Concentration,
    StudyId,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Assays {
    Table,
    Id,
    Name,
    Slug,
    Notes,
    MeasurementUnits,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Measurements {
    Table,
    Id,
    AnimalId,
    ExperimentId,
    AssayId,
    Values,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Treatments {
    Table,
    Id,
    Name,
    StudyId,
    DietId,
    EnvironmentId,
    TransplantationId,
    Notes,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Cohorts {
    Table,
    Id,
    Name,
    Slug,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
    LastUpdated,
}
