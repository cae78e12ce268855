use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::fabrics::{CreateFabricRequest, FabricResponse, UpdateFabricRequest};
use crate::ApiResponse;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

/// Create a fabric
#[utoipa::path(
    post,
    path = "/api/v1/fabrics",
    request_body = CreateFabricRequest,
    responses(
        (status = 201, description = "Fabric created", body = crate::ApiResponse<FabricResponse>),
        (status = 400, description = "Validation failure or duplicate SKU", body = crate::errors::ErrorResponse)
    ),
    tag = "Fabrics"
)]
pub async fn create_fabric(
    State(state): State<AppState>,
    Json(request): Json<CreateFabricRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FabricResponse>>), ServiceError> {
    let response = state.services.fabrics.create_fabric(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Update a fabric (stock, price, descriptive fields)
#[utoipa::path(
    put,
    path = "/api/v1/fabrics/:id",
    params(("id" = Uuid, Path, description = "Fabric ID")),
    request_body = UpdateFabricRequest,
    responses(
        (status = 200, description = "Fabric updated", body = crate::ApiResponse<FabricResponse>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Fabrics"
)]
pub async fn update_fabric(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFabricRequest>,
) -> Result<Json<ApiResponse<FabricResponse>>, ServiceError> {
    let response = state.services.fabrics.update_fabric(id, request).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// List fabrics
#[utoipa::path(
    get,
    path = "/api/v1/fabrics",
    responses(
        (status = 200, description = "All fabrics ordered by name", body = crate::ApiResponse<Vec<FabricResponse>>)
    ),
    tag = "Fabrics"
)]
pub async fn list_fabrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FabricResponse>>>, ServiceError> {
    let response = state.services.fabrics.list_fabrics().await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Fabric routes
pub fn fabric_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_fabric))
        .route("/", get(list_fabrics))
        .route("/:id", put(update_fabric))
}
