use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    // An unreadable body is an unknown failure, not a client error
    let Json(request) = payload.map_err(|e| AppError::Unknown(e.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        limit = request.limit,
        "Processing recommendation request"
    );

    let recommendations =
        recommendations::get_recommendations(state.store.as_ref(), &state.selector, &request)
            .await?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse { recommendations }))
}
