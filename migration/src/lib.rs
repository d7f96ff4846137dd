pub use sea_orm_migration::prelude::*;

mod helpers;
mod m20250301_000001_create_colony_schema;
mod m20250301_000002_create_study_schema;
mod m20250301_000003_create_timed_mating_schema;
mod m20250301_000004_create_veterinary_schema;
mod m20250301_000005_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_colony_schema::Migration),
            Box::new(m20250301_000002_create_study_schema::Migration),
            Box::new(m20250301_000003_create_timed_mating_schema::Migration),
            Box::new(m20250301_000004_create_veterinary_schema::Migration),
            Box::new(m20250301_000005_add_lookup_indexes::Migration),
        ]
    }
}
