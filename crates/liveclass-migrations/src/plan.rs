//! Pure guard for the `audio_metadata` → `media_metadata` rename.
//!
//! The decision is factored out of the migration so the idempotence logic
//! can be tested without a database.

/// Outcome of the rename guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameAction {
    /// Leave the database untouched.
    Skip(SkipReason),
    /// Perform the rename.
    Rename,
}

/// Why the rename was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The legacy name was not found; there is nothing to migrate.
    LegacyAbsent,
    /// The target name already exists; treat as already migrated.
    TargetExists,
}

/// Decides whether the rename should run.
///
/// The legacy check wins: when the legacy name is absent the outcome is
/// `Skip(LegacyAbsent)` regardless of the target. Either skip outcome is
/// treated as success by the migration, so re-running it is harmless and
/// never produces a duplicate-name collision.
pub const fn plan_rename(legacy_exists: bool, target_exists: bool) -> RenameAction {
    if !legacy_exists {
        RenameAction::Skip(SkipReason::LegacyAbsent)
    } else if target_exists {
        RenameAction::Skip(SkipReason::TargetExists)
    } else {
        RenameAction::Rename
    }
}
