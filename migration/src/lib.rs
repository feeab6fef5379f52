pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_tenancy_tables;
mod m20260301_000002_create_academic_tables;
mod m20260301_000003_create_finance_tables;
mod m20260301_000004_create_records_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_tenancy_tables::Migration),
            Box::new(m20260301_000002_create_academic_tables::Migration),
            Box::new(m20260301_000003_create_finance_tables::Migration),
            Box::new(m20260301_000004_create_records_tables::Migration),
        ]
    }
}
