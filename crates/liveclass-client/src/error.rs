use thiserror::Error;

/// ClientError represents all possible failures that can occur during a
/// client request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The endpoint answered with GraphQL-level errors.
    #[error("the endpoint responded with: {msg}")]
    GraphQl {
        /// The error messages, one per line.
        msg: String,
    },
    /// Tried to build a [`reqwest::header::HeaderMap`] with an invalid
    /// header value.
    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// Encountered an error handling the received response.
    #[error("encountered an error handling the response: {msg}")]
    HandleResponse {
        /// The error message.
        msg: String,
    },
    /// Encountered an error sending the request.
    #[error("encountered an error while sending a request")]
    SendRequest(#[from] reqwest::Error),
    /// The response arrived without a required field.
    #[error("the response was missing the `{null_field}` field")]
    MalformedResponse {
        /// The name of the null field.
        null_field: String,
    },
}
