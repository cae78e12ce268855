use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::shipments::{
    CreateShipmentRequest, RecordScanRequest, ShipmentResponse, ShipmentScanResponse,
};
use crate::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};

/// Create an inter-branch shipment
///
/// Every listed work order receives an automatic OUT scan.
#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment created with OUT scans", body = crate::ApiResponse<ShipmentResponse>),
        (status = 404, description = "Branch or work order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Json(request): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentResponse>>), ServiceError> {
    let response = state.services.shipments.create_shipment(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Record a shipment scan
#[utoipa::path(
    post,
    path = "/api/v1/shipments/scan",
    request_body = RecordScanRequest,
    responses(
        (status = 201, description = "Scan recorded", body = crate::ApiResponse<ShipmentScanResponse>),
        (status = 404, description = "Shipment or work order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Shipments"
)]
pub async fn record_scan(
    State(state): State<AppState>,
    Json(request): Json<RecordScanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentScanResponse>>), ServiceError> {
    let response = state.services.shipments.record_scan(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// List shipments with their scans
#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    responses(
        (status = 200, description = "Shipments, newest first", body = crate::ApiResponse<Vec<ShipmentResponse>>)
    ),
    tag = "Shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ShipmentResponse>>>, ServiceError> {
    let response = state.services.shipments.list_shipments().await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Shipment routes
pub fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_shipment))
        .route("/", get(list_shipments))
        .route("/scan", post(record_scan))
}
