use clap::{Args, Subcommand};
use sqlx::postgres::PgPoolOptions;

use liveclass_migrations::Migrator;

use crate::utils::env::{EnvKey, ServiceEnv};
use crate::{anyhow, Context, Result};

/// Runs or reverts schema migrations against the metadata database.
#[derive(Debug, Args)]
pub struct Migrate {
    #[command(subcommand)]
    command: MigrateCommand,

    /// Postgres connection string; falls back to $LIVECLASS_DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum MigrateCommand {
    /// Apply every pending migration
    Run,
    /// Revert the most recently applied migration
    Undo,
}

impl Migrate {
    pub async fn run(&self, env_store: &ServiceEnv) -> Result<()> {
        let database_url = match &self.database_url {
            Some(url) => url.clone(),
            None => env_store.get(EnvKey::DatabaseUrl)?.ok_or_else(|| {
                anyhow!(
                    "no --database-url was given and ${} is not set",
                    EnvKey::DatabaseUrl
                )
            })?,
        };

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .context("could not connect to the metadata database")?;

        let migrator = Migrator::new();
        match self.command {
            MigrateCommand::Run => {
                let applied = migrator.run(&pool).await?;
                println!("applied {applied} migration(s)");
            }
            MigrateCommand::Undo => {
                let version = migrator.undo(&pool).await?;
                println!("reverted migration {version}");
            }
        }
        Ok(())
    }
}
