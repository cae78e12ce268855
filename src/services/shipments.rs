use crate::{
    db::DbPool,
    entities::branch::Entity as BranchEntity,
    entities::shipment::{
        self, ActiveModel as ShipmentActiveModel, Entity as ShipmentEntity, Model as ShipmentModel,
    },
    entities::shipment_scan::{
        self, ActiveModel as ScanActiveModel, Entity as ScanEntity, Model as ScanModel,
        ScanDirection,
    },
    entities::work_order::Entity as WorkOrderEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Name recorded on scans the system performs on the operator's behalf.
const SYSTEM_SCANNER: &str = "System";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// Work orders loaded onto this shipment; each gets an automatic OUT
    /// scan at creation.
    pub work_order_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordScanRequest {
    pub shipment_id: Uuid,
    pub work_order_id: Uuid,
    pub direction: ScanDirection,
    #[validate(length(min = 1, message = "Scanner name is required"))]
    pub scanned_by_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipmentScanResponse {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub work_order_id: Uuid,
    pub direction: ScanDirection,
    pub scanned_by_name: String,
    pub scanned_at: DateTime<Utc>,
}

impl From<ScanModel> for ShipmentScanResponse {
    fn from(model: ScanModel) -> Self {
        Self {
            id: model.id,
            shipment_id: model.shipment_id,
            work_order_id: model.work_order_id,
            direction: model.direction,
            scanned_by_name: model.scanned_by_name,
            scanned_at: model.scanned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShipmentResponse {
    pub id: Uuid,
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub scans: Vec<ShipmentScanResponse>,
}

/// Inter-branch transfers. Scans record the chain of custody of a work
/// order between branches; they never touch order status or the task
/// ledger.
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ShipmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a shipment and one OUT scan per listed work order, in one
    /// transaction.
    #[instrument(skip(self, request), fields(from = %request.from_branch_id, to = %request.to_branch_id))]
    pub async fn create_shipment(
        &self,
        request: CreateShipmentRequest,
    ) -> Result<ShipmentResponse, ServiceError> {
        if request.from_branch_id == request.to_branch_id {
            return Err(ServiceError::ValidationError(
                "Shipment must move between two different branches".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        for branch_id in [request.from_branch_id, request.to_branch_id] {
            BranchEntity::find_by_id(branch_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))?;
        }

        let now = Utc::now();
        let shipment = ShipmentActiveModel {
            id: Set(Uuid::new_v4()),
            from_branch_id: Set(request.from_branch_id),
            to_branch_id: Set(request.to_branch_id),
            date: Set(request.date),
            notes: Set(request.notes),
        }
        .insert(&txn)
        .await?;

        let mut scans = Vec::with_capacity(request.work_order_ids.len());
        for work_order_id in &request.work_order_ids {
            WorkOrderEntity::find_by_id(*work_order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;

            let scan = ScanActiveModel {
                id: Set(Uuid::new_v4()),
                shipment_id: Set(shipment.id),
                work_order_id: Set(*work_order_id),
                direction: Set(ScanDirection::Out),
                scanned_by_name: Set(SYSTEM_SCANNER.to_string()),
                scanned_at: Set(now),
            }
            .insert(&txn)
            .await?;
            scans.push(scan);
        }

        txn.commit().await?;

        info!(shipment_id = %shipment.id, scans = scans.len(), "shipment created");

        for scan in &scans {
            self.emit_scan_event(scan).await;
        }

        Ok(assemble_response(shipment, scans))
    }

    /// Records a manual scan (typically the IN scan at the receiving
    /// branch).
    #[instrument(skip(self, request), fields(shipment_id = %request.shipment_id, work_order_id = %request.work_order_id))]
    pub async fn record_scan(
        &self,
        request: RecordScanRequest,
    ) -> Result<ShipmentScanResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        ShipmentEntity::find_by_id(request.shipment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Shipment not found".to_string()))?;
        WorkOrderEntity::find_by_id(request.work_order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;

        let scan = ScanActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(request.shipment_id),
            work_order_id: Set(request.work_order_id),
            direction: Set(request.direction),
            scanned_by_name: Set(request.scanned_by_name),
            scanned_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(scan_id = %scan.id, "shipment scan recorded");
        self.emit_scan_event(&scan).await;

        Ok(ShipmentScanResponse::from(scan))
    }

    /// Lists shipments, newest first, with their scans.
    #[instrument(skip(self))]
    pub async fn list_shipments(&self) -> Result<Vec<ShipmentResponse>, ServiceError> {
        let db = &*self.db_pool;

        let shipments = ShipmentEntity::find()
            .order_by_desc(shipment::Column::Date)
            .all(db)
            .await?;

        let shipment_ids: Vec<Uuid> = shipments.iter().map(|s| s.id).collect();
        let mut scans = ScanEntity::find()
            .filter(shipment_scan::Column::ShipmentId.is_in(shipment_ids))
            .order_by_asc(shipment_scan::Column::ScannedAt)
            .all(db)
            .await?;

        Ok(shipments
            .into_iter()
            .map(|shipment| {
                let (mine, rest): (Vec<ScanModel>, Vec<ScanModel>) = std::mem::take(&mut scans)
                    .into_iter()
                    .partition(|scan| scan.shipment_id == shipment.id);
                scans = rest;
                assemble_response(shipment, mine)
            })
            .collect())
    }

    async fn emit_scan_event(&self, scan: &ScanModel) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::ShipmentScanned {
                    shipment_id: scan.shipment_id,
                    work_order_id: scan.work_order_id,
                    scanned_at: scan.scanned_at,
                })
                .await
            {
                warn!(error = %e, scan_id = %scan.id, "failed to send shipment scanned event");
            }
        }
    }
}

fn assemble_response(shipment: ShipmentModel, scans: Vec<ScanModel>) -> ShipmentResponse {
    ShipmentResponse {
        id: shipment.id,
        from_branch_id: shipment.from_branch_id,
        to_branch_id: shipment.to_branch_id,
        date: shipment.date,
        notes: shipment.notes,
        scans: scans.into_iter().map(ShipmentScanResponse::from).collect(),
    }
}
