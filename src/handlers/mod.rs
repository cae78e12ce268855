pub mod common;
pub mod customers;
pub mod fabrics;
pub mod measurements;
pub mod shipments;
pub mod work_orders;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub work_orders: Arc<crate::services::work_orders::WorkOrderService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub fabrics: Arc<crate::services::fabrics::FabricService>,
    pub measurements: Arc<crate::services::measurements::MeasurementService>,
    pub shipments: Arc<crate::services::shipments::ShipmentService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            work_orders: Arc::new(crate::services::work_orders::WorkOrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            payments: Arc::new(crate::services::payments::PaymentService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            customers: Arc::new(crate::services::customers::CustomerService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            fabrics: Arc::new(crate::services::fabrics::FabricService::new(
                db_pool.clone(),
            )),
            measurements: Arc::new(crate::services::measurements::MeasurementService::new(
                db_pool.clone(),
            )),
            shipments: Arc::new(crate::services::shipments::ShipmentService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
