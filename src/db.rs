use anyhow::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, Statement};
use sqlx::postgres::PgPoolOptions;
use std::{path::PathBuf, time::Duration};
use tokio::fs;

use crate::entity::{
    Appointments, AuditLogs, Products, Profiles, SaleItems, SalonMembers, Salons, Sales, Services,
    Staff, StaffSchedules,
};

pub type DbPool = sqlx::PgPool;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Raw sqlx pool, used by the seed binary.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Minimal migration runner that executes SQL files in `migrations/` in filename order.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    for file in files {
        tracing::info!(file = %file.display(), "applying migration");
        let sql = fs::read_to_string(&file).await?;
        // Postgres prepared statements cannot contain multiple commands,
        // so split the migration file and run each statement individually.
        for stmt in sql.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            let statement = format!("{stmt};");
            conn.execute(Statement::from_string(backend, statement))
                .await?;
        }
    }

    Ok(())
}

/// Creates every table straight from the entity definitions.
///
/// Used for SQLite databases (tests, local experiments) where the Postgres
/// migration files do not apply.
pub async fn create_tables(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        schema.create_table_from_entity(Profiles),
        schema.create_table_from_entity(Staff),
        schema.create_table_from_entity(Salons),
        schema.create_table_from_entity(SalonMembers),
        schema.create_table_from_entity(Services),
        schema.create_table_from_entity(Products),
        schema.create_table_from_entity(Sales),
        schema.create_table_from_entity(SaleItems),
        schema.create_table_from_entity(Appointments),
        schema.create_table_from_entity(StaffSchedules),
        schema.create_table_from_entity(AuditLogs),
    ];
    for table in tables.iter() {
        conn.execute(backend.build(table)).await?;
    }
    conn.execute(Statement::from_string(
        backend,
        "CREATE UNIQUE INDEX IF NOT EXISTS staff_schedules_salon_staff_date \
         ON staff_schedules (salon_id, staff_id, date)",
    ))
    .await?;

    Ok(())
}
