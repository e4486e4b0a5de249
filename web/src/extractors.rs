//! Custom Axum extractors.
//!
//! # Examples
//!
//! ```ignore
//! use student_portal_web::extractors::RequestId;
//!
//! async fn handler(request_id: RequestId) -> String {
//!     format!("Request ID: {}", request_id.0)
//! }
//! ```

use crate::middleware::REQUEST_ID_HEADER;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Request ID for log correlation.
///
/// Taken from the extension set by [`crate::middleware::request_id_layer`],
/// then from the `X-Request-ID` header, and generated as a fresh UUID v4 as a
/// last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(request_id))
    }
}
