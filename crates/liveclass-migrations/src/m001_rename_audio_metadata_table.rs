//! Migration 001: rename the `audio_metadata` table to `media_metadata`.
//!
//! The forward operation is guarded twice so re-running it is harmless:
//! when no `audio_metadata` entry exists there is nothing to migrate, and
//! when `media_metadata` already exists the database is treated as already
//! renamed. Both skip paths log at debug and succeed; only the remaining
//! case performs DDL, so this migration's own action either leaves the
//! database unchanged or performs exactly one rename.
//!
//! The reverse operation drops `media_metadata` unconditionally. Any data
//! the relation holds is lost on reversal, and a missing relation surfaces
//! as an error rather than being swallowed.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::plan::{plan_rename, RenameAction, SkipReason};
use crate::{Migration, MigrationError};

/// The legacy relation name.
const LEGACY_NAME: &str = "audio_metadata";
/// The canonical relation name.
const TARGET_NAME: &str = "media_metadata";

// The guards consult pg_database, mirroring the catalog-level existence
// check the service has always shipped with. See DESIGN.md before changing
// this to a table-catalog lookup.
const EXISTENCE_CHECK: &str = "SELECT 1 FROM pg_database WHERE datname = $1";

const RENAME: &str = "ALTER TABLE audio_metadata RENAME TO media_metadata";
// No IF EXISTS: a missing table must surface as an error.
const DROP_TARGET: &str = "DROP TABLE media_metadata";

/// Renames `audio_metadata` to `media_metadata`, skipping when there is
/// nothing to do.
pub struct RenameAudioMetadataTable;

impl RenameAudioMetadataTable {
    async fn catalog_entry_exists(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<bool, MigrationError> {
        let row = sqlx::query(EXISTENCE_CHECK)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl Migration for RenameAudioMetadataTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &'static str {
        "rename_audio_metadata_table"
    }

    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError> {
        let legacy_exists = Self::catalog_entry_exists(tx, LEGACY_NAME).await?;
        // the target is only consulted when there is something to rename
        let target_exists = if legacy_exists {
            Self::catalog_entry_exists(tx, TARGET_NAME).await?
        } else {
            false
        };

        match plan_rename(legacy_exists, target_exists) {
            RenameAction::Skip(SkipReason::LegacyAbsent) => {
                tracing::debug!("{LEGACY_NAME} not found, skipping rename");
                Ok(())
            }
            RenameAction::Skip(SkipReason::TargetExists) => {
                tracing::debug!("{TARGET_NAME} already exists, skipping rename");
                Ok(())
            }
            RenameAction::Rename => {
                sqlx::query(RENAME).execute(&mut **tx).await?;
                Ok(())
            }
        }
    }

    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), MigrationError> {
        sqlx::query(DROP_TARGET).execute(&mut **tx).await?;
        Ok(())
    }
}
