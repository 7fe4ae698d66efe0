use axum::{extract::Query, Json};
use service_core::error::{AppError, ErrorCode};

use crate::{
    dtos::ErrorResponse,
    models::{AreaType, SpecialistSearchQuery, SpecialistSearchResponse},
};

/// Search specialists by area and city
#[utoipa::path(
    get,
    path = "/api/specialists",
    params(SpecialistSearchQuery),
    responses(
        (status = 200, description = "Matching specialists", body = SpecialistSearchResponse),
        (status = 400, description = "Unknown area type", body = ErrorResponse)
    ),
    tag = "Specialists",
    security(("bearer_auth" = []))
)]
pub async fn search_specialists(
    Query(query): Query<SpecialistSearchQuery>,
) -> Result<Json<SpecialistSearchResponse>, AppError> {
    let area_type: AreaType = query
        .area_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::bad_request(ErrorCode::InvalidQueries, "Invalid queries"))?;

    let city = query.city.filter(|c| !c.trim().is_empty());

    tracing::debug!(?area_type, city = ?city, "Specialist search");

    // No specialist directory exists yet; the filter is echoed back.
    Ok(Json(SpecialistSearchResponse {
        area_type,
        city,
        specialists: Vec::new(),
    }))
}
