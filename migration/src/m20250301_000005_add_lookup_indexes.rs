use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, column) for the columns the todo lists, reports and
/// filters look records up by.
const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_animals_strain_id", "animals", "strain_id"),
    ("idx_animals_breeding_id", "animals", "breeding_id"),
    ("idx_animals_cage", "animals", "cage"),
    ("idx_animals_born", "animals", "born"),
    ("idx_animals_alive", "animals", "alive"),
    ("idx_animals_ear_tag", "animals", "ear_tag"),
    ("idx_breedings_strain_id", "breedings", "strain_id"),
    ("idx_breedings_active", "breedings", "active"),
    ("idx_breedings_cage", "breedings", "cage"),
    ("idx_plug_events_breeding_id", "plug_events", "breeding_id"),
    ("idx_plug_events_plug_female_id", "plug_events", "plug_female_id"),
    ("idx_measurements_animal_id", "measurements", "animal_id"),
    ("idx_measurements_experiment_id", "measurements", "experiment_id"),
    ("idx_measurements_assay_id", "measurements", "assay_id"),
    ("idx_experiments_date", "experiments", "date"),
    ("idx_experiments_study_id", "experiments", "study_id"),
    ("idx_medical_issues_animal_id", "medical_issues", "animal_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(*name)
                        .table(Alias::new(*table))
                        .col(Alias::new(*column))
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table(Alias::new(*table))
                        .if_exists()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
