use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier API",
        version = "0.3.0",
        description = r#"
Operations API for a multi-branch tailoring business.

Work orders move through a fixed production workflow (NEW through
CLOSED); each advancement atomically closes the open production tasks
for the current stage and opens tasks for the next one. Payments are an
append-only ledger that keeps the outstanding balance in step.
        "#
    ),
    paths(
        crate::handlers::work_orders::create_work_order,
        crate::handlers::work_orders::list_work_orders,
        crate::handlers::work_orders::get_work_order,
        crate::handlers::work_orders::get_work_order_by_code,
        crate::handlers::work_orders::advance_work_order,
        crate::handlers::work_orders::record_payment,
        crate::handlers::work_orders::list_payments,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::search_customers,
        crate::handlers::fabrics::create_fabric,
        crate::handlers::fabrics::update_fabric,
        crate::handlers::fabrics::list_fabrics,
        crate::handlers::measurements::create_profile,
        crate::handlers::measurements::list_profiles,
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::record_scan,
        crate::handlers::shipments::list_shipments,
    ),
    components(schemas(
        crate::workflow::Status,
        crate::workflow::Stage,
        crate::entities::work_order::Priority,
        crate::entities::payment::PaymentMethod,
        crate::entities::shipment_scan::ScanDirection,
        crate::errors::ErrorResponse,
        crate::handlers::work_orders::AdvanceStageRequest,
        crate::services::work_orders::CreateWorkOrderRequest,
        crate::services::work_orders::CreateWorkOrderItemRequest,
        crate::services::work_orders::WorkOrderResponse,
        crate::services::work_orders::WorkOrderDetailResponse,
        crate::services::work_orders::WorkOrderItemResponse,
        crate::services::work_orders::WorkOrderListResponse,
        crate::services::work_orders::ProductionTaskResponse,
        crate::services::payments::RecordPaymentRequest,
        crate::services::payments::PaymentResponse,
        crate::services::customers::CreateCustomerRequest,
        crate::services::customers::CustomerResponse,
        crate::services::fabrics::CreateFabricRequest,
        crate::services::fabrics::UpdateFabricRequest,
        crate::services::fabrics::FabricResponse,
        crate::services::measurements::CreateMeasurementProfileRequest,
        crate::services::measurements::MeasurementProfileResponse,
        crate::services::shipments::CreateShipmentRequest,
        crate::services::shipments::RecordScanRequest,
        crate::services::shipments::ShipmentResponse,
        crate::services::shipments::ShipmentScanResponse,
    )),
    tags(
        (name = "Work Orders", description = "Order intake and the production workflow"),
        (name = "Payments", description = "Append-only payment ledger"),
        (name = "Customers", description = "Customer directory"),
        (name = "Fabrics", description = "Fabric catalog and stock"),
        (name = "Measurements", description = "Versioned measurement profiles"),
        (name = "Shipments", description = "Inter-branch transfers and scans"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document at
/// /api-docs/openapi.json.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
