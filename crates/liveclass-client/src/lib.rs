//! Client for the liveclass GraphQL API.
//!
//! Operations live under [`operations`], laid out one directory per
//! operation with a `runner` (the query and its execution) and `types`
//! (the crate-facing input/response shapes).

mod client;
mod error;
pub mod headers;
pub mod operations;

pub use client::GraphQLClient;
pub use error::ClientError;
