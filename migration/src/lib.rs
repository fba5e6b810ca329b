pub use sea_orm_migration::prelude::*;

mod m20250603_000001_baseline_schema;
mod m20250718_000002_add_events_and_news;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250603_000001_baseline_schema::Migration),
            Box::new(m20250718_000002_add_events_and_news::Migration),
        ]
    }
}
