use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::measurements::{CreateMeasurementProfileRequest, MeasurementProfileResponse};
use crate::ApiResponse;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MeasurementListParams {
    pub customer_id: Uuid,
}

/// Record a new measurement profile
#[utoipa::path(
    post,
    path = "/api/v1/measurements",
    request_body = CreateMeasurementProfileRequest,
    responses(
        (status = 201, description = "Profile created with bumped version", body = crate::ApiResponse<MeasurementProfileResponse>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Measurements"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateMeasurementProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MeasurementProfileResponse>>), ServiceError> {
    let response = state.services.measurements.create_profile(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// List a customer's measurement profiles, newest first
#[utoipa::path(
    get,
    path = "/api/v1/measurements",
    params(MeasurementListParams),
    responses(
        (status = 200, description = "Profiles newest first", body = crate::ApiResponse<Vec<MeasurementProfileResponse>>)
    ),
    tag = "Measurements"
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(params): Query<MeasurementListParams>,
) -> Result<Json<ApiResponse<Vec<MeasurementProfileResponse>>>, ServiceError> {
    let response = state
        .services
        .measurements
        .list_for_customer(params.customer_id)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Measurement profile routes
pub fn measurement_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile))
        .route("/", get(list_profiles))
}
