//! Request tracking middleware.
//!
//! # Flow
//!
//! 1. **Extract** the request ID from `X-Request-ID` (or generate a new UUID)
//! 2. **Store** it in request extensions for handler access
//! 3. **Create** an `http_request` span carrying it
//! 4. **Echo** it on the response and log status and latency
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use student_portal_web::middleware::request_id_layer;
//!
//! let app = Router::new()
//!     .route("/api/offerings", get(list_offerings))
//!     .layer(request_id_layer());
//! ```

use axum::{extract::Request, http::HeaderValue, response::Response};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for the request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Create a layer that adds request ID tracking to all requests.
#[must_use]
pub const fn request_id_layer() -> RequestIdLayer {
    RequestIdLayer
}

/// Layer for request ID tracking.
#[derive(Clone, Debug)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware service for request ID tracking.
#[derive(Clone, Debug)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        req.extensions_mut().insert(request_id);

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let started = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = fut.await?;

                #[allow(clippy::cast_possible_truncation)] // Latency in ms fits in u64
                let latency_ms = started.elapsed().as_millis() as u64;
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms,
                    "Request completed"
                );
                metrics::counter!(
                    "http_requests_total",
                    "status" => response.status().as_u16().to_string()
                )
                .increment(1);

                if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
