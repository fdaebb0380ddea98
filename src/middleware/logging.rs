use std::task::{Context, Poll};

use axum::{
    body::{Body, HttpBody},
    extract::{FromRequestParts, Query, RawPathParams},
    http::{request::Parts, Request, Response},
};
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tracing::debug;

use crate::interceptor::{RequestContext, RequestLogger};

/// Largest request body rendered into the start line by default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4096;

/// Applies [`RequestLogger`] to every route of the router it wraps.
///
/// Install it with `Router::route_layer` so matched path parameters are
/// available as call arguments.
///
/// A call counts as completed only when the response status is neither a
/// client nor a server error. Error responses, including extractor
/// rejections where the controller never ran, get no end line.
#[derive(Debug, Clone)]
pub struct RequestLogLayer {
    logger: RequestLogger,
    client_ip_header: Option<String>,
    max_body_bytes: usize,
}

impl Default for RequestLogLayer {
    fn default() -> Self {
        Self {
            logger: RequestLogger::new(),
            client_ip_header: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RequestLogLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the client host from `header` when the request carries it.
    pub fn client_ip_header(mut self, header: impl Into<String>) -> Self {
        self.client_ip_header = Some(header.into());
        self
    }

    /// Bodies larger than `limit` are logged by size instead of content.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService {
            inner,
            logger: self.logger,
            client_ip_header: self.client_ip_header.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestLogService<S> {
    inner: S,
    logger: RequestLogger,
    client_ip_header: Option<String>,
    max_body_bytes: usize,
}

impl<S, ResBody> Service<Request<Body>> for RequestLogService<S>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // The clone is not guaranteed to be ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let logger = self.logger;
        let client_ip_header = self.client_ip_header.clone();
        let max_body_bytes = self.max_body_bytes;

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();
            let ctx = RequestContext::from_parts(&parts, client_ip_header.as_deref());
            let mut args = request_arguments(&mut parts).await;
            let (body_arg, body) = body_argument(body, max_body_bytes).await;
            args.extend(body_arg);

            let record = logger.begin(&ctx, &args);
            let response = inner.call(Request::from_parts(parts, body)).await?;

            let status = response.status();
            if status.is_client_error() || status.is_server_error() {
                debug!(
                    request_id = %record.request_id,
                    status = status.as_u16(),
                    "Call did not complete, skipping end line"
                );
            } else {
                record.finish();
            }

            Ok(response)
        })
    }
}

/// Path parameter values in route order, then query pairs as `key=value`.
async fn request_arguments(parts: &mut Parts) -> Vec<String> {
    let mut args: Vec<String> = match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params.iter().map(|(_, value)| value.to_string()).collect(),
        Err(e) => {
            debug!(error = %e, "No path parameters available");
            Vec::new()
        }
    };

    if parts.uri.query().is_some() {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => {
                args.extend(pairs.into_iter().map(|(key, value)| format!("{key}={value}")));
            }
            Err(e) => debug!(error = %e, "Ignoring unparseable query string"),
        }
    }

    args
}

/// Renders the request body as the trailing argument and hands back a body
/// the inner service can still consume.
///
/// Only bodies whose size is known and within `limit` are buffered. Larger
/// or non UTF-8 bodies are rendered as `<N bytes>`, streamed bodies of
/// unknown size as `<streamed body>`.
async fn body_argument(body: Body, limit: usize) -> (Option<String>, Body) {
    let upper = body.size_hint().upper();

    match upper {
        Some(0) => (None, body),
        Some(size) if size > limit as u64 => (Some(format!("<{size} bytes>")), body),
        Some(_) => match axum::body::to_bytes(body, limit).await {
            Ok(bytes) if bytes.is_empty() => (None, Body::from(bytes)),
            Ok(bytes) => {
                let rendered = match std::str::from_utf8(&bytes) {
                    Ok(text) => text.to_string(),
                    Err(_) => format!("<{} bytes>", bytes.len()),
                };
                (Some(rendered), Body::from(bytes))
            }
            Err(e) => {
                debug!(error = %e, "Failed to buffer request body");
                (None, Body::empty())
            }
        },
        None => (Some("<streamed body>".to_string()), body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_path_params_fall_back_to_query_pairs() {
        // Outside a router there is no matched route, so path params are unavailable.
        let (mut parts, _) = Request::get("/items?name=bolt&sort=price")
            .body(())
            .unwrap()
            .into_parts();

        let args = request_arguments(&mut parts).await;
        assert_eq!(args, vec!["name=bolt", "sort=price"]);
    }

    #[tokio::test]
    async fn buffered_body_is_rendered_and_passed_on() {
        let (arg, body) = body_argument(Body::from(r#"{"name":"nut"}"#), 64).await;
        assert_eq!(arg.as_deref(), Some(r#"{"name":"nut"}"#));

        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"name":"nut"}"#);
    }

    #[tokio::test]
    async fn empty_and_binary_bodies() {
        let (arg, _) = body_argument(Body::empty(), 64).await;
        assert!(arg.is_none());

        let (arg, _) = body_argument(Body::from(vec![0xff, 0xfe, 0x00]), 64).await;
        assert_eq!(arg.as_deref(), Some("<3 bytes>"));
    }
}
