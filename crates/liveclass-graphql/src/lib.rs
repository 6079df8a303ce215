#![warn(missing_docs)]

//! Provides resolver instrumentation middleware for GraphQL services

use std::{future::Future, pin::Pin, time::Instant};

use tower::{Layer, Service};

/// The schema position of a resolver invocation.
pub trait FieldCoordinate {
    /// Name of the parent type the field sits on, e.g. `Query`.
    fn parent_type(&self) -> &str;
    /// Name of the field being resolved.
    fn field_name(&self) -> &str;
}

/// Minimal request carrying a field coordinate alongside a resolver payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverRequest<T> {
    parent_type: String,
    field_name: String,
    payload: T,
}

impl<T> ResolverRequest<T> {
    /// Constructs a new [`ResolverRequest`]
    pub fn new(parent_type: &str, field_name: &str, payload: T) -> ResolverRequest<T> {
        ResolverRequest {
            parent_type: parent_type.to_string(),
            field_name: field_name.to_string(),
            payload,
        }
    }

    /// Consumes the request and produces the inner payload
    pub fn into_inner(self) -> T {
        self.payload
    }
}

impl<T> FieldCoordinate for ResolverRequest<T> {
    fn parent_type(&self) -> &str {
        &self.parent_type
    }

    fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// [`Layer`] that wraps a resolver service with wall-clock timing
#[derive(Debug, Clone, Default)]
pub struct FieldTimingLayer;

impl FieldTimingLayer {
    /// Constructs a new [`FieldTimingLayer`]
    pub const fn new() -> FieldTimingLayer {
        FieldTimingLayer
    }
}

impl<S> Layer<S> for FieldTimingLayer {
    type Service = FieldTiming<S>;
    fn layer(&self, inner: S) -> Self::Service {
        FieldTiming { inner }
    }
}

/// Middleware that reports the elapsed wall-clock time of each successful
/// resolver invocation as one `debug`-level line of the form
/// `<ParentTypeName>.<FieldName> [<N> ms]`.
///
/// A failure from the inner service propagates untouched and no line is
/// emitted for that invocation.
#[derive(Debug, Clone)]
pub struct FieldTiming<S> {
    inner: S,
}

impl<S> FieldTiming<S> {
    /// Constructs a new [`FieldTiming`]
    pub const fn new(inner: S) -> FieldTiming<S> {
        FieldTiming { inner }
    }
}

impl<S, Req> Service<Req> for FieldTiming<S>
where
    Req: FieldCoordinate,
    S: Service<Req>,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        let coordinate = format!("{}.{}", req.parent_type(), req.field_name());
        let started = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let response = fut.await?;
            let elapsed = started.elapsed().as_millis();
            tracing::debug!("{} [{} ms]", coordinate, elapsed);
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::time::Duration;

    use speculoos::prelude::*;
    use tower::{service_fn, Layer, ServiceExt};
    use tracing_test::traced_test;

    use super::{FieldCoordinate, FieldTimingLayer, ResolverRequest};

    const DELAY_MS: u64 = 50;
    const TOLERANCE_MS: u128 = 100;

    #[tokio::test]
    #[traced_test]
    async fn it_emits_one_line_with_the_elapsed_time() {
        let resolver = service_fn(|req: ResolverRequest<i32>| async move {
            tokio::time::sleep(Duration::from_millis(DELAY_MS)).await;
            Ok::<_, Infallible>(req.into_inner() * 2)
        });
        let service = FieldTimingLayer::new().layer(resolver);

        let request = ResolverRequest::new("Class", "schools", 7);
        let response = service.oneshot(request).await;

        assert_that!(response).is_ok_containing(14);
        logs_assert(|lines: &[&str]| {
            let timing_lines: Vec<&&str> = lines
                .iter()
                .filter(|line| line.contains("Class.schools ["))
                .collect();
            if timing_lines.len() != 1 {
                return Err(format!("expected one timing line, got {}", timing_lines.len()));
            }
            let line = timing_lines[0];
            let millis: u128 = line
                .split('[')
                .nth(1)
                .and_then(|rest| rest.split(' ').next())
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| format!("malformed timing line: {line}"))?;
            if millis < u128::from(DELAY_MS) || millis > u128::from(DELAY_MS) + TOLERANCE_MS {
                return Err(format!("elapsed {millis} ms outside tolerance"));
            }
            Ok(())
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn it_stays_silent_when_the_resolver_fails() {
        let resolver = service_fn(|_req: ResolverRequest<()>| async move {
            Err::<(), anyhow::Error>(anyhow::anyhow!("resolver blew up"))
        });
        let service = FieldTimingLayer::new().layer(resolver);

        let request = ResolverRequest::new("Query", "checkAuthorization", ());
        let response = service.oneshot(request).await;

        assert_that!(response).is_err();
        assert!(!logs_contain("Query.checkAuthorization ["));
    }

    #[test]
    fn resolver_requests_expose_their_coordinate() {
        let request = ResolverRequest::new("Query", "class", ());
        assert_that!(request.parent_type()).is_equal_to("Query");
        assert_that!(request.field_name()).is_equal_to("class");
    }
}
