// ABOUTME: Database storage layer for users, clients, cases, notes and documents
// ABOUTME: Every record query that touches client or case data is filtered by the owning user

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

mod cases;
mod clients;
mod documents;
mod notes;
mod users;

pub use documents::NewDocument;

/// Shared handle to the practice database. Created once at startup and passed
/// through application state.
pub struct Storage {
    pub db: DatabaseConnection,
}

impl Storage {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);

        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        tracing::info!("Database ready");

        Ok(Self { db })
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}
