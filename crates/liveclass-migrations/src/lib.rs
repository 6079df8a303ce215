//! Schema migrations for the liveclass metadata database.
//!
//! Each migration is a versioned, ordered transformation with paired
//! forward (`up`) and reverse (`down`) operations over a Postgres
//! transaction. The [`Migrator`] records applied versions in a tracking
//! table and runs each migration inside its own transaction; any database
//! error aborts the run and propagates unmodified.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use thiserror::Error;

mod m001_rename_audio_metadata_table;
mod plan;

pub use m001_rename_audio_metadata_table::RenameAudioMetadataTable;
pub use plan::{plan_rename, RenameAction, SkipReason};

const TRACKING_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS _liveclass_migrations (
    version BIGINT PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Error type for migration operations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The underlying query failed; the run is aborted.
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    /// The tracking table references a version no registered migration has.
    #[error("no registered migration with version {0}")]
    UnknownVersion(i64),
    /// There is nothing to revert.
    #[error("no migrations have been applied")]
    NothingApplied,
}

/// A single versioned schema transformation.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique, monotonically increasing version.
    fn version(&self) -> i64;

    /// Human-readable migration name.
    fn name(&self) -> &'static str;

    /// Applies the migration.
    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError>;

    /// Reverses the migration.
    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError>;
}

/// Orders and executes migrations, recording applied state.
pub struct Migrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// All migrations for the liveclass database, in application order.
    pub fn new() -> Migrator {
        let mut migrator = Migrator::empty();
        migrator.register(Box::new(RenameAudioMetadataTable));
        migrator
    }

    /// A migrator with no registered migrations.
    pub fn empty() -> Migrator {
        Migrator {
            migrations: Vec::new(),
        }
    }

    /// Registers a migration, keeping the list ordered by version.
    pub fn register(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
        self.migrations.sort_by_key(|migration| migration.version());
    }

    /// Registered versions, in application order.
    pub fn versions(&self) -> Vec<i64> {
        self.migrations
            .iter()
            .map(|migration| migration.version())
            .collect()
    }

    /// Applies every pending migration in version order. Returns how many
    /// were applied.
    pub async fn run(&self, pool: &PgPool) -> Result<usize, MigrationError> {
        self.ensure_tracking_table(pool).await?;
        let applied = self.applied_versions(pool).await?;

        let mut count = 0;
        for migration in &self.migrations {
            if applied.contains(&migration.version()) {
                continue;
            }
            tracing::info!(
                "applying migration {} ({})",
                migration.version(),
                migration.name()
            );
            let mut tx = pool.begin().await?;
            migration.up(&mut tx).await?;
            sqlx::query("INSERT INTO _liveclass_migrations (version, name) VALUES ($1, $2)")
                .bind(migration.version())
                .bind(migration.name())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            count += 1;
        }
        Ok(count)
    }

    /// Reverts the most recently applied migration. Returns its version.
    pub async fn undo(&self, pool: &PgPool) -> Result<i64, MigrationError> {
        self.ensure_tracking_table(pool).await?;
        let latest = self
            .applied_versions(pool)
            .await?
            .pop()
            .ok_or(MigrationError::NothingApplied)?;
        let migration = self
            .migrations
            .iter()
            .find(|migration| migration.version() == latest)
            .ok_or(MigrationError::UnknownVersion(latest))?;

        tracing::info!(
            "reverting migration {} ({})",
            migration.version(),
            migration.name()
        );
        let mut tx = pool.begin().await?;
        migration.down(&mut tx).await?;
        sqlx::query("DELETE FROM _liveclass_migrations WHERE version = $1")
            .bind(latest)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(latest)
    }

    async fn ensure_tracking_table(&self, pool: &PgPool) -> Result<(), MigrationError> {
        sqlx::query(TRACKING_TABLE_DDL).execute(pool).await?;
        Ok(())
    }

    async fn applied_versions(&self, pool: &PgPool) -> Result<Vec<i64>, MigrationError> {
        let rows = sqlx::query("SELECT version FROM _liveclass_migrations ORDER BY version")
            .fetch_all(pool)
            .await?;
        let mut versions = Vec::with_capacity(rows.len());
        for row in &rows {
            versions.push(row.try_get::<i64, _>("version")?);
        }
        Ok(versions)
    }
}

impl Default for Migrator {
    fn default() -> Migrator {
        Migrator::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use sqlx::{Postgres, Transaction};

    use super::{Migration, MigrationError, Migrator};

    struct FakeMigration(i64);

    #[async_trait]
    impl Migration for FakeMigration {
        fn version(&self) -> i64 {
            self.0
        }

        fn name(&self) -> &'static str {
            "fake"
        }

        async fn up(&self, _tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError> {
            Ok(())
        }

        async fn down(&self, _tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError> {
            Ok(())
        }
    }

    #[test]
    fn registration_orders_migrations_by_version() {
        let mut migrator = Migrator::empty();
        migrator.register(Box::new(FakeMigration(3)));
        migrator.register(Box::new(FakeMigration(1)));
        migrator.register(Box::new(FakeMigration(2)));
        assert_eq!(migrator.versions(), vec![1, 2, 3]);
    }

    #[test]
    fn the_default_migrator_carries_the_rename() {
        let migrator = Migrator::new();
        assert_eq!(migrator.versions(), vec![1]);
    }
}
