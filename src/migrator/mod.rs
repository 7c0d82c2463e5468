use sea_orm_migration::prelude::*;

mod m20260301_000001_create_farm_tables;
mod m20260301_000002_create_feeding_and_logs;
mod m20260315_000003_link_reminders_to_schedules;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_farm_tables::Migration),
            Box::new(m20260301_000002_create_feeding_and_logs::Migration),
            Box::new(m20260315_000003_link_reminders_to_schedules::Migration),
        ]
    }
}
