use super::common::PaginationParams;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::payments::{PaymentResponse, RecordPaymentRequest};
use crate::services::work_orders::{
    CreateWorkOrderRequest, WorkOrderDetailResponse, WorkOrderListResponse,
};
use crate::workflow::Status;
use crate::ApiResponse;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "to": "SEWING" }))]
pub struct AdvanceStageRequest {
    /// Target status or stage name (e.g. "SEWING", "READY_FOR_PICKUP").
    pub to: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct WorkOrderListFilter {
    /// Filter by status name
    pub status: Option<String>,
}

/// Create a work order
#[utoipa::path(
    post,
    path = "/api/v1/work-orders",
    request_body = CreateWorkOrderRequest,
    responses(
        (status = 201, description = "Work order created", body = crate::ApiResponse<WorkOrderDetailResponse>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Work Orders"
)]
pub async fn create_work_order(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkOrderDetailResponse>>), ServiceError> {
    let response = state.services.work_orders.create_work_order(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// List work orders
#[utoipa::path(
    get,
    path = "/api/v1/work-orders",
    params(PaginationParams, WorkOrderListFilter),
    responses(
        (status = 200, description = "Work orders page", body = crate::ApiResponse<WorkOrderListResponse>)
    ),
    tag = "Work Orders"
)]
pub async fn list_work_orders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<WorkOrderListFilter>,
) -> Result<Json<ApiResponse<WorkOrderListResponse>>, ServiceError> {
    let status = match filter.status.as_deref() {
        Some(raw) => {
            Some(Status::from_str(raw).map_err(|_| ServiceError::InvalidTarget(raw.to_string()))?)
        }
        None => None,
    };

    let (page, per_page) = pagination.normalized();
    let response = state
        .services
        .work_orders
        .list_work_orders(page, per_page, status)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Get a work order by ID
#[utoipa::path(
    get,
    path = "/api/v1/work-orders/:id",
    params(("id" = Uuid, Path, description = "Work order ID")),
    responses(
        (status = 200, description = "Work order detail", body = crate::ApiResponse<WorkOrderDetailResponse>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Work Orders"
)]
pub async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WorkOrderDetailResponse>>, ServiceError> {
    let response = state
        .services
        .work_orders
        .get_work_order(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;
    Ok(Json(ApiResponse::success(response)))
}

/// Get a work order by its human-readable code
#[utoipa::path(
    get,
    path = "/api/v1/work-orders/by-code/:code",
    params(("code" = String, Path, description = "Order code, e.g. TW-20240915-123456")),
    responses(
        (status = 200, description = "Work order detail", body = crate::ApiResponse<WorkOrderDetailResponse>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Work Orders"
)]
pub async fn get_work_order_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<WorkOrderDetailResponse>>, ServiceError> {
    let response = state
        .services
        .work_orders
        .get_work_order_by_code(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;
    Ok(Json(ApiResponse::success(response)))
}

/// Advance a work order to the next production stage
#[utoipa::path(
    post,
    path = "/api/v1/work-orders/:id/advance",
    params(("id" = Uuid, Path, description = "Work order ID")),
    request_body = AdvanceStageRequest,
    responses(
        (status = 200, description = "Work order advanced", body = crate::ApiResponse<WorkOrderDetailResponse>),
        (status = 400, description = "Illegal transition or unknown target", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent update conflict", body = crate::errors::ErrorResponse)
    ),
    tag = "Work Orders"
)]
pub async fn advance_work_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceStageRequest>,
) -> Result<Json<ApiResponse<WorkOrderDetailResponse>>, ServiceError> {
    let response = state.services.work_orders.advance(id, &request.to).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Record a payment against a work order
#[utoipa::path(
    post,
    path = "/api/v1/work-orders/:id/payments",
    params(("id" = Uuid, Path, description = "Work order ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = crate::ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid amount", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), ServiceError> {
    let response = state.services.payments.record_payment(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// List payments for a work order
#[utoipa::path(
    get,
    path = "/api/v1/work-orders/:id/payments",
    params(("id" = Uuid, Path, description = "Work order ID")),
    responses(
        (status = 200, description = "Payments, oldest first", body = crate::ApiResponse<Vec<PaymentResponse>>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, ServiceError> {
    let response = state.services.payments.list_payments(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Work order routes
pub fn work_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_work_order))
        .route("/", get(list_work_orders))
        .route("/by-code/:code", get(get_work_order_by_code))
        .route("/:id", get(get_work_order))
        .route("/:id/advance", post(advance_work_order))
        .route("/:id/payments", post(record_payment))
        .route("/:id/payments", get(list_payments))
}
