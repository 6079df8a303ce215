use clap::{Parser, Subcommand};

use bullhorn::{Level, LEVELS};

use crate::command;
use crate::utils::env::{EnvKey, ServiceEnv};
use crate::{anyhow, Result};

/// Operational tooling for the liveclass backend.
#[derive(Debug, Parser)]
#[command(
    name = "liveclass-ops",
    version,
    about = "
liveclass-ops - backend chores for the liveclass platform

Run the pending schema migrations against the metadata database:

    $ liveclass-ops migrate run

Or check what a deployed GraphQL endpoint says about a class:

    $ liveclass-ops query class-schools --endpoint <URL> --token <TOKEN> --class-id <ID>
"
)]
pub struct LiveclassOps {
    #[command(subcommand)]
    pub command: Command,

    /// Specify the log level
    #[arg(long = "log", short = 'l', global = true, value_parser = parse_level)]
    pub log_level: Option<Level>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Database schema migration commands
    Migrate(command::Migrate),

    /// One-off queries against a running GraphQL API
    Query(command::Query),
}

impl LiveclassOps {
    pub async fn run(&self) -> Result<()> {
        let env_store = ServiceEnv::new();
        let log_level = self.effective_log_level(&env_store)?;
        bullhorn::init(log_level);
        tracing::trace!(command_structure = ?self);

        match &self.command {
            Command::Migrate(cmd) => cmd.run(&env_store).await,
            Command::Query(cmd) => cmd.run(&env_store, log_level).await,
        }
    }

    /// The `--log` flag wins over $LIVECLASS_LOG_LEVEL; both are optional.
    fn effective_log_level(&self, env_store: &ServiceEnv) -> Result<Option<Level>> {
        if self.log_level.is_some() {
            return Ok(self.log_level);
        }
        match env_store.get(EnvKey::LogLevel)? {
            Some(value) => {
                let level = value.parse::<Level>().map_err(|_| {
                    anyhow!(
                        "${} must be one of {}",
                        EnvKey::LogLevel,
                        LEVELS.join(", ")
                    )
                })?;
                Ok(Some(level))
            }
            None => Ok(None),
        }
    }
}

fn parse_level(input: &str) -> std::result::Result<Level, String> {
    input
        .parse::<Level>()
        .map_err(|_| format!("valid log levels are {}", LEVELS.join(", ")))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::LiveclassOps;

    #[test]
    fn the_cli_definition_is_consistent() {
        LiveclassOps::command().debug_assert();
    }

    #[test]
    fn it_parses_a_log_level() {
        use clap::Parser;
        let app = LiveclassOps::parse_from(["liveclass-ops", "--log", "debug", "migrate", "run"]);
        assert_eq!(app.log_level, Some(bullhorn::Level::DEBUG));
    }

    #[test]
    fn it_rejects_an_unknown_log_level() {
        use clap::Parser;
        let result =
            LiveclassOps::try_parse_from(["liveclass-ops", "--log", "silly", "migrate", "run"]);
        assert!(result.is_err());
    }

    #[test]
    fn the_env_var_provides_a_fallback_level() {
        use clap::Parser;

        use crate::utils::env::{EnvKey, ServiceEnv};

        let app = LiveclassOps::parse_from(["liveclass-ops", "migrate", "run"]);
        let mut env_store = ServiceEnv::new();
        env_store.insert(EnvKey::LogLevel, "trace");
        assert_eq!(
            app.effective_log_level(&env_store).unwrap(),
            Some(bullhorn::Level::TRACE)
        );
    }

    #[test]
    fn the_flag_wins_over_the_env_var() {
        use clap::Parser;

        use crate::utils::env::{EnvKey, ServiceEnv};

        let app = LiveclassOps::parse_from(["liveclass-ops", "--log", "warn", "migrate", "run"]);
        let mut env_store = ServiceEnv::new();
        env_store.insert(EnvKey::LogLevel, "trace");
        assert_eq!(
            app.effective_log_level(&env_store).unwrap(),
            Some(bullhorn::Level::WARN)
        );
    }
}
