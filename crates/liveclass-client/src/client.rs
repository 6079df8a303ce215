use graphql_client::{Error as GraphQLError, GraphQLQuery, Response as GraphQLResponse};
use reqwest::{header::HeaderMap, Client as ReqwestClient, StatusCode};

use crate::ClientError;

/// Represents a generic GraphQL client for making http requests.
pub struct GraphQLClient {
    endpoint: String,
    client: ReqwestClient,
}

impl GraphQLClient {
    /// Construct a new [`GraphQLClient`] from an `endpoint`.
    pub fn new(endpoint: &str) -> GraphQLClient {
        GraphQLClient {
            endpoint: endpoint.to_string(),
            client: ReqwestClient::new(),
        }
    }

    /// Client method for making a GraphQL request.
    ///
    /// Takes one argument, `variables`. Returns the response data.
    /// Does not retry: a failure aborts the request.
    pub async fn post<Q>(
        &self,
        variables: Q::Variables,
        headers: &HeaderMap,
    ) -> Result<Q::ResponseData, ClientError>
    where
        Q: GraphQLQuery,
    {
        let body = Q::build_query(variables);
        tracing::debug!(endpoint = %self.endpoint, "posting GraphQL operation");
        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers.clone())
            .json(&body)
            .send()
            .await?;
        GraphQLClient::handle_response::<Q>(response).await
    }

    /// This fn tries to parse the JSON response from a GraphQL server. It
    /// will error if the JSON can't be parsed or if there are any graphql
    /// errors in the JSON body (in body.errors). If there are no errors,
    /// but an empty body.data, it will also error, as this shouldn't be
    /// possible.
    ///
    /// If successful, it will return body.data, unwrapped.
    pub(crate) async fn handle_response<Q: GraphQLQuery>(
        response: reqwest::Response,
    ) -> Result<Q::ResponseData, ClientError> {
        let response_status = response.status();
        tracing::debug!(response_status = ?response_status, response_headers = ?response.headers());
        match response.json::<GraphQLResponse<Q::ResponseData>>().await {
            Ok(response_body) => {
                if let Some(response_body_errors) = response_body.errors {
                    handle_graphql_body_errors(response_body_errors)?;
                }
                match response_status {
                    StatusCode::OK => {
                        response_body
                            .data
                            .ok_or_else(|| ClientError::MalformedResponse {
                                null_field: "data".to_string(),
                            })
                    }
                    status_code => Err(ClientError::HandleResponse {
                        msg: status_code.to_string(),
                    }),
                }
            }
            Err(e) => {
                if response_status.is_success() {
                    Err(ClientError::SendRequest(e))
                } else {
                    Err(ClientError::HandleResponse {
                        msg: response_status.to_string(),
                    })
                }
            }
        }
    }
}

fn handle_graphql_body_errors(errors: Vec<GraphQLError>) -> Result<(), ClientError> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!("GraphQL response errors: {:?}", errors);
        Err(ClientError::GraphQl {
            msg: errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<String>>()
                .join("\n"),
        })
    }
}
