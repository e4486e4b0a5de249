//! Offering listings and details.

use super::{offering_id, parse_query};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
};
use serde::Deserialize;
use student_portal_core::{OfferingFilter, OfferingId, OfferingKind, Registration};
use student_portal_runtime::{CatalogSummary, OfferingView};

/// Query string for `GET /api/offerings`.
#[derive(Debug, Default, Deserialize)]
pub struct ListOfferingsQuery {
    /// `internship`, `seminar` or `tryout`.
    pub kind: Option<OfferingKind>,
    /// Exact category match.
    pub category: Option<String>,
    /// Include inactive offerings.
    #[serde(default)]
    pub include_inactive: bool,
}

impl From<ListOfferingsQuery> for OfferingFilter {
    fn from(query: ListOfferingsQuery) -> Self {
        Self {
            kind: query.kind,
            category: query.category.filter(|c| !c.trim().is_empty()),
            include_inactive: query.include_inactive,
        }
    }
}

/// List offerings with derived availability, soonest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/offerings?kind=seminar&category=&include_inactive=false
/// ```
///
/// # Errors
///
/// 400 for a malformed query, 503 when the store is unavailable.
pub async fn list_offerings(
    State(state): State<AppState>,
    query: Result<Query<ListOfferingsQuery>, QueryRejection>,
) -> Result<Json<Vec<OfferingView>>, AppError> {
    let filter = parse_query(query)?.into();
    Ok(Json(state.catalog.list(filter).await?))
}

/// Totals over the listed offerings.
///
/// # Endpoint
///
/// ```text
/// GET /api/offerings/summary?kind=tryout
/// ```
///
/// # Errors
///
/// 400 for a malformed query, 503 when the store is unavailable.
pub async fn offerings_summary(
    State(state): State<AppState>,
    query: Result<Query<ListOfferingsQuery>, QueryRejection>,
) -> Result<Json<CatalogSummary>, AppError> {
    let filter = parse_query(query)?.into();
    Ok(Json(state.catalog.summary(filter).await?))
}

/// One offering with availability.
///
/// # Endpoint
///
/// ```text
/// GET /api/offerings/:id
/// ```
///
/// # Errors
///
/// 400 for a malformed id, 404 for an unknown one.
pub async fn get_offering(
    State(state): State<AppState>,
    path: Result<Path<OfferingId>, PathRejection>,
) -> Result<Json<OfferingView>, AppError> {
    let id = offering_id(path)?;
    Ok(Json(state.catalog.get(id).await?))
}

/// Registrations of one offering, newest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/offerings/:id/registrations
/// ```
///
/// # Errors
///
/// 400 for a malformed id, 404 for an unknown one.
pub async fn list_registrations(
    State(state): State<AppState>,
    path: Result<Path<OfferingId>, PathRejection>,
) -> Result<Json<Vec<Registration>>, AppError> {
    let id = offering_id(path)?;
    Ok(Json(state.catalog.registrations(id).await?))
}
