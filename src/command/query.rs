use clap::{Args, Subcommand};

use bullhorn::{serialize_error, Level};
use liveclass_client::operations::class::schools::{self, ClassSchoolsInput};
use liveclass_client::{headers, ClientError, GraphQLClient};

use crate::utils::env::{EnvKey, ServiceEnv};
use crate::{anyhow, Result};

/// One-off debug queries against a running GraphQL endpoint.
#[derive(Debug, Args)]
pub struct Query {
    #[command(subcommand)]
    command: QueryCommand,
}

#[derive(Debug, Subcommand)]
enum QueryCommand {
    /// Check authorization and list the schools connected to a class
    ClassSchools(ClassSchools),
}

#[derive(Debug, Args)]
struct ClassSchools {
    /// GraphQL endpoint to query; falls back to $LIVECLASS_GRAPHQL_ENDPOINT
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token; falls back to $LIVECLASS_ACCESS_TOKEN
    #[arg(long)]
    token: Option<String>,

    /// Class to look up
    #[arg(long)]
    class_id: String,

    /// Page size for the schools connection
    #[arg(long, default_value_t = 10)]
    first: i64,
}

impl Query {
    pub async fn run(&self, env_store: &ServiceEnv, log_level: Option<Level>) -> Result<()> {
        match &self.command {
            QueryCommand::ClassSchools(args) => args.run(env_store, log_level).await,
        }
    }
}

impl ClassSchools {
    async fn run(&self, env_store: &ServiceEnv, log_level: Option<Level>) -> Result<()> {
        let endpoint = self.resolve(&self.endpoint, EnvKey::GraphqlEndpoint, env_store)?;
        let token = self.resolve(&self.token, EnvKey::AccessToken, env_store)?;

        let client = GraphQLClient::new(&endpoint);
        let request_headers = headers::build(&token)?;
        let input = ClassSchoolsInput {
            class_id: self.class_id.clone(),
            first: self.first,
        };

        match schools::run(input, &client, &request_headers).await {
            Ok(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            // a GraphQL-level failure still carries a printable payload
            Err(error @ ClientError::GraphQl { .. }) => {
                let verbosity = log_level.unwrap_or(Level::ERROR);
                if let Some(details) = serialize_error(Some(&error), verbosity) {
                    eprintln!("{details}");
                }
                Err(anyhow!("the endpoint rejected the query"))
            }
            Err(error) => {
                tracing::debug!(?error);
                Err(anyhow!("could not reach the GraphQL endpoint"))
            }
        }
    }

    fn resolve(
        &self,
        flag: &Option<String>,
        key: EnvKey,
        env_store: &ServiceEnv,
    ) -> Result<String> {
        match flag {
            Some(value) => Ok(value.clone()),
            None => env_store
                .get(key)?
                .ok_or_else(|| anyhow!("no flag was given and ${} is not set", key)),
        }
    }
}
