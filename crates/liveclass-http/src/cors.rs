//! Cross-origin policy construction for the liveclass HTTP edge.

use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::request::Parts;
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Platform-specific header carrying the live-session token.
pub const LIVE_AUTHORIZATION: HeaderName = HeaderName::from_static("live-authorization");

/// Cross-origin policy for one deployment domain.
///
/// The origin predicate admits `http` or `https`, any subdomain of the
/// configured domain (or the bare domain itself), and an optional port of
/// up to five digits. The domain is escaped before the pattern is built,
/// so regex metacharacters in a domain value match only literally.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origin: Regex,
}

impl CorsPolicy {
    /// Builds the policy for `domain`, e.g. `liveclass.io`.
    pub fn for_domain(domain: &str) -> CorsPolicy {
        let pattern = format!(
            r"^https?://(.+\.)?{}(:\d{{1,5}})?$",
            regex::escape(domain)
        );
        // the domain is escaped, so the pattern is always well-formed
        let origin = Regex::new(&pattern).expect("escaped domain yields a valid pattern");
        CorsPolicy { origin }
    }

    /// Header names browsers may send on cross-origin requests.
    pub fn allowed_headers(&self) -> [HeaderName; 3] {
        [AUTHORIZATION, CONTENT_TYPE, LIVE_AUTHORIZATION]
    }

    /// Cookies and authorization headers are forwarded cross-origin.
    pub const fn credentials(&self) -> bool {
        true
    }

    /// The origin-validation predicate.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.origin.is_match(origin)
    }

    /// Renders the policy as a [`CorsLayer`] for the server stack.
    pub fn layer(&self) -> CorsLayer {
        let origin = self.origin.clone();
        CorsLayer::new()
            .allow_headers(self.allowed_headers())
            .allow_credentials(self.credentials())
            .allow_origin(AllowOrigin::predicate(
                move |value: &HeaderValue, _: &Parts| {
                    value
                        .to_str()
                        .map(|origin_value| origin.is_match(origin_value))
                        .unwrap_or(false)
                },
            ))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use speculoos::prelude::*;

    use super::CorsPolicy;

    #[rstest]
    #[case::bare_domain("https://liveclass.io", true)]
    #[case::plain_http("http://liveclass.io", true)]
    #[case::subdomain("https://app.liveclass.io", true)]
    #[case::nested_subdomain("https://eu.app.liveclass.io", true)]
    #[case::with_port("https://liveclass.io:8080", true)]
    #[case::subdomain_with_port("http://app.liveclass.io:443", true)]
    #[case::port_too_long("https://liveclass.io:123456", false)]
    #[case::wrong_scheme("ftp://liveclass.io", false)]
    #[case::trailing_path("https://liveclass.io/admin", false)]
    #[case::prefixed_domain("https://evil-liveclass.io", false)]
    #[case::suffixed_domain("https://liveclass.io.evil.com", false)]
    fn it_validates_origins(#[case] origin: &str, #[case] allowed: bool) {
        let policy = CorsPolicy::for_domain("liveclass.io");
        assert_that!(policy.allows_origin(origin)).is_equal_to(allowed);
    }

    #[rstest]
    #[case::literal_match("https://sub.a.b+c:8080", true)]
    #[case::bare_literal_match("https://a.b+c", true)]
    #[case::dot_is_not_a_wildcard("https://aXbYc", false)]
    #[case::plus_is_not_a_repeat("https://a.bbbc", false)]
    fn metacharacters_in_the_domain_match_literally(
        #[case] origin: &str,
        #[case] allowed: bool,
    ) {
        let policy = CorsPolicy::for_domain("a.b+c");
        assert_that!(policy.allows_origin(origin)).is_equal_to(allowed);
    }

    #[test]
    fn it_allows_exactly_the_three_request_headers() {
        let policy = CorsPolicy::for_domain("liveclass.io");
        let names: Vec<String> = policy
            .allowed_headers()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect();
        assert_that!(names).is_equal_to(vec![
            "authorization".to_string(),
            "content-type".to_string(),
            "live-authorization".to_string(),
        ]);
    }

    #[test]
    fn credentials_are_always_enabled() {
        let policy = CorsPolicy::for_domain("liveclass.io");
        assert_that!(policy.credentials()).is_true();
    }

    #[test]
    fn it_renders_a_layer() {
        // construction must not panic for a metacharacter-laden domain
        let _ = CorsPolicy::for_domain(r"a-b/c\d^e$f*g").layer();
    }
}
