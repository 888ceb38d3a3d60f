use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::domain::services::availability::AvailabilityQuery;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

// Raw string map: a repeated key keeps its last value, and every parse failure
// surfaces as `InvalidInput` rather than an extractor rejection.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = AvailabilityQuery::parse(
        &slug,
        params.get("day").map(String::as_str),
        params.get("time").map(String::as_str),
        params.get("partySize").map(String::as_str),
    )?;

    let availabilities = state.availability_service.check(&query).await
        .inspect_err(|e| {
            if let AppError::SearchFailure(msg) = e {
                info!(slug = %slug, "couldn't find available tables: {}", msg);
            }
        })?;

    Ok(Json(availabilities))
}
