use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::customers::{CreateCustomerRequest, CustomerResponse};
use crate::ApiResponse;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CustomerSearchParams {
    /// Name or phone substring; empty lists the first customers by name
    #[serde(default)]
    pub q: String,
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = crate::ApiResponse<CustomerResponse>),
        (status = 400, description = "Validation failure or duplicate phone", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerResponse>>), ServiceError> {
    let response = state.services.customers.create_customer(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/:id",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer", body = crate::ApiResponse<CustomerResponse>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CustomerResponse>>, ServiceError> {
    let response = state
        .services
        .customers
        .get_customer(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;
    Ok(Json(ApiResponse::success(response)))
}

/// Search customers by name or phone
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(CustomerSearchParams),
    responses(
        (status = 200, description = "Matching customers, capped at 50", body = crate::ApiResponse<Vec<CustomerResponse>>)
    ),
    tag = "Customers"
)]
pub async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<CustomerSearchParams>,
) -> Result<Json<ApiResponse<Vec<CustomerResponse>>>, ServiceError> {
    let response = state.services.customers.search_customers(&params.q).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/", get(search_customers))
        .route("/:id", get(get_customer))
}
