use graphql_client::*;

use crate::operations::class::schools::types::{ClassSchoolsInput, ClassSchoolsResponse, School};
use crate::{ClientError, GraphQLClient};

use reqwest::header::HeaderMap;

#[derive(GraphQLQuery)]
// The paths are relative to the directory where your `Cargo.toml` is located.
// Both json and the GraphQL schema language are supported as sources for the schema
#[graphql(
    query_path = "src/operations/class/schools/schools_query.graphql",
    schema_path = ".schema/schema.graphql",
    response_derives = "Eq, PartialEq, Debug, Serialize, Deserialize",
    deprecated = "warn"
)]
/// This struct is used to generate the module containing `Variables` and
/// `ResponseData` structs.
/// Snake case of this name is the mod name. i.e. class_schools_query
pub(crate) struct ClassSchoolsQuery;

/// Checks the caller's authorization and fetches the schools connection
/// for one class.
pub async fn run(
    input: ClassSchoolsInput,
    client: &GraphQLClient,
    headers: &HeaderMap,
) -> Result<ClassSchoolsResponse, ClientError> {
    let variables: class_schools_query::Variables = input.into();
    let response_data = client.post::<ClassSchoolsQuery>(variables, headers).await?;
    build_response(response_data)
}

fn build_response(
    data: class_schools_query::ResponseData,
) -> Result<ClassSchoolsResponse, ClientError> {
    let class = data.class.ok_or_else(|| ClientError::MalformedResponse {
        null_field: "class".to_string(),
    })?;

    let schools = class
        .schools
        .map(|connection| {
            connection
                .edges
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter_map(|edge| edge.node)
                .map(|node| School {
                    id: node.id,
                    name: node.name,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ClassSchoolsResponse {
        authorized: data.check_authorization.unwrap_or(false),
        class_id: class.id,
        class_name: class.name,
        schools,
    })
}
