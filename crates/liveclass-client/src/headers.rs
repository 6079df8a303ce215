//! Header construction for requests to the liveclass graph.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::ClientError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Platform-specific header carrying the live-session token.
pub const LIVE_AUTHORIZATION: &str = "live-authorization";

/// Builds the [`HeaderMap`] for requests to the liveclass graph: JSON
/// content type, a bearer `Authorization` header, and the platform's
/// `live-authorization` header carrying the same token.
///
/// The token headers are marked sensitive so they never show up in
/// request debug output.
pub fn build(token: &str) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    let mut live_token = HeaderValue::from_str(token)?;
    live_token.set_sensitive(true);
    headers.insert(LIVE_AUTHORIZATION, live_token);

    Ok(headers)
}
