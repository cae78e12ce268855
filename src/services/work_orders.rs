use crate::{
    db::DbPool,
    entities::branch::Entity as BranchEntity,
    entities::customer::Entity as CustomerEntity,
    entities::fabric::Entity as FabricEntity,
    entities::measurement_profile::Entity as ProfileEntity,
    entities::payment::{self, Entity as PaymentEntity},
    entities::production_task::{
        self, ActiveModel as TaskActiveModel, Entity as TaskEntity, Model as TaskModel,
    },
    entities::work_order::{
        self, ActiveModel as WorkOrderActiveModel, Entity as WorkOrderEntity,
        Model as WorkOrderModel, Priority,
    },
    entities::work_order_item::{
        self, ActiveModel as ItemActiveModel, Entity as ItemEntity, Model as ItemModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::payments::PaymentResponse,
    workflow::{self, Stage, Status},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Attempts at regenerating an order code after a uniqueness conflict.
const CODE_RETRY_ATTEMPTS: u32 = 3;

/// Attempts at re-running an advancement or payment that lost a
/// write-write race before surfacing the conflict to the caller.
pub(crate) const CONFLICT_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkOrderItemRequest {
    #[validate(length(min = 1, message = "Garment type is required"))]
    pub garment_type: String,
    pub measurement_profile_id: Uuid,
    pub fabric_id: Option<Uuid>,
    pub price: Decimal,
    pub options_json: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkOrderRequest {
    pub customer_id: Uuid,
    pub branch_id: Uuid,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    pub total: Decimal,
    #[serde(default)]
    pub deposit: Decimal,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<CreateWorkOrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductionTaskResponse {
    pub id: Uuid,
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderItemResponse {
    pub id: Uuid,
    pub garment_type: String,
    pub measurement_profile_id: Uuid,
    pub fabric_id: Option<Uuid>,
    pub price: Decimal,
    pub options_json: Option<serde_json::Value>,
    pub tasks: Vec<ProductionTaskResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderResponse {
    pub id: Uuid,
    pub code: String,
    pub customer_id: Uuid,
    pub branch_id: Uuid,
    pub status: Status,
    /// Production stage the order currently sits in, if its status maps
    /// to one.
    pub current_stage: Option<Stage>,
    pub total: Decimal,
    pub deposit: Decimal,
    pub balance: Decimal,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderDetailResponse {
    #[serde(flatten)]
    pub work_order: WorkOrderResponse,
    pub items: Vec<WorkOrderItemResponse>,
    pub payments: Vec<PaymentResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderListResponse {
    pub work_orders: Vec<WorkOrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Generates a human-readable order code: `TW-YYYYMMDD-NNNNNN`, where the
/// numeric suffix is derived from the sub-second component of `now`.
/// Collisions are possible; the unique index on `work_orders.code` plus
/// retry-on-conflict is what actually guarantees uniqueness.
pub fn generate_order_code(now: DateTime<Utc>) -> String {
    format!(
        "TW-{}-{:06}",
        now.format("%Y%m%d"),
        now.timestamp_millis().rem_euclid(1_000_000)
    )
}

/// Service owning the work-order aggregate: creation, stage advancement
/// and reads. Payments live in [`crate::services::payments`].
#[derive(Clone)]
pub struct WorkOrderService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl WorkOrderService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a work order together with its items and the initial
    /// CUTTING task per item, all in one transaction.
    ///
    /// Production starts at creation even for unconfirmed (NEW) orders;
    /// cutting may begin before the deposit paperwork is settled.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, branch_id = %request.branch_id))]
    pub async fn create_work_order(
        &self,
        request: CreateWorkOrderRequest,
    ) -> Result<WorkOrderDetailResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        if request.total < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Total must not be negative".to_string(),
            ));
        }
        if request.deposit < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Deposit must not be negative".to_string(),
            ));
        }
        if request.deposit > request.total {
            return Err(ServiceError::ValidationError(
                "Deposit must not exceed total".to_string(),
            ));
        }
        for item in &request.items {
            item.validate()
                .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
            if item.price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Item price must not be negative".to_string(),
                ));
            }
        }

        self.check_references(&request).await?;

        let status = if request.deposit > Decimal::ZERO {
            Status::Confirmed
        } else {
            Status::New
        };
        let balance = request.total - request.deposit;

        let mut attempt = 0;
        let (order, items, tasks) = loop {
            attempt += 1;
            let now = Utc::now();
            let code = generate_order_code(now);

            match self
                .insert_order_tree(&request, code.clone(), status, balance, now)
                .await
            {
                Ok(created) => break created,
                Err(ServiceError::DatabaseError(e))
                    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
                        && attempt < CODE_RETRY_ATTEMPTS =>
                {
                    warn!(%code, attempt, "order code collision, regenerating");
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(work_order_id = %order.id, code = %order.code, %status, "work order created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::WorkOrderCreated {
                    work_order_id: order.id,
                    code: order.code.clone(),
                    status,
                })
                .await
            {
                warn!(error = %e, work_order_id = %order.id, "failed to send work order created event");
            }
        }

        Ok(assemble_detail(order, items, tasks, Vec::new()))
    }

    /// Verifies every entity the request points at actually exists.
    async fn check_references(&self, request: &CreateWorkOrderRequest) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        CustomerEntity::find_by_id(request.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;
        BranchEntity::find_by_id(request.branch_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Branch not found".to_string()))?;

        for item in &request.items {
            ProfileEntity::find_by_id(item.measurement_profile_id)
                .one(db)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound("Measurement profile not found".to_string())
                })?;
            if let Some(fabric_id) = item.fabric_id {
                FabricEntity::find_by_id(fabric_id)
                    .one(db)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("Fabric not found".to_string()))?;
            }
        }

        Ok(())
    }

    async fn insert_order_tree(
        &self,
        request: &CreateWorkOrderRequest,
        code: String,
        status: Status,
        balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(WorkOrderModel, Vec<ItemModel>, Vec<TaskModel>), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let order = WorkOrderActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            customer_id: Set(request.customer_id),
            branch_id: Set(request.branch_id),
            status: Set(status),
            total: Set(request.total),
            deposit: Set(request.deposit),
            balance: Set(balance),
            due_date: Set(request.due_date),
            priority: Set(request.priority),
            notes: Set(request.notes.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            version: Set(1),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(request.items.len());
        let mut tasks = Vec::with_capacity(request.items.len());
        for item_request in &request.items {
            let item = ItemActiveModel {
                id: Set(Uuid::new_v4()),
                work_order_id: Set(order.id),
                garment_type: Set(item_request.garment_type.clone()),
                measurement_profile_id: Set(item_request.measurement_profile_id),
                fabric_id: Set(item_request.fabric_id),
                price: Set(item_request.price),
                options_json: Set(item_request.options_json.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;

            let task = TaskActiveModel {
                id: Set(Uuid::new_v4()),
                work_order_item_id: Set(item.id),
                stage: Set(Stage::Cutting),
                started_at: Set(now),
                finished_at: Set(None),
                notes: Set(Some("Started automatically at order creation.".to_string())),
            }
            .insert(&txn)
            .await?;

            items.push(item);
            tasks.push(task);
        }

        txn.commit().await?;
        Ok((order, items, tasks))
    }

    /// Advances a work order to `target`, a status or stage name.
    ///
    /// Conflicting concurrent advancements are retried a bounded number
    /// of times; each retry re-reads and re-validates against the
    /// committed state, so a losing racer surfaces `IllegalTransition`
    /// rather than applying a stale transition twice.
    #[instrument(skip(self), fields(work_order_id = %work_order_id, target = %target))]
    pub async fn advance(
        &self,
        work_order_id: Uuid,
        target: &str,
    ) -> Result<WorkOrderDetailResponse, ServiceError> {
        let to = workflow::parse_target(target)?;

        let mut attempt = 0;
        let (from, detail) = loop {
            attempt += 1;
            match self.advance_once(work_order_id, to).await {
                Ok(result) => break result,
                Err(ServiceError::TransactionConflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {
                    warn!(%work_order_id, attempt, "advance lost a write race, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(%work_order_id, %from, %to, "work order advanced");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::WorkOrderAdvanced {
                    work_order_id,
                    from,
                    to,
                })
                .await
            {
                warn!(error = %e, %work_order_id, "failed to send work order advanced event");
            }
        }

        Ok(detail)
    }

    /// One advancement attempt: reads the current order row and applies
    /// the transition against that snapshot.
    async fn advance_once(
        &self,
        work_order_id: Uuid,
        to: Status,
    ) -> Result<(Status, WorkOrderDetailResponse), ServiceError> {
        let order = WorkOrderEntity::find_by_id(work_order_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;

        self.advance_snapshot(order, to).await
    }

    /// Applies one transition against a previously read order row.
    ///
    /// The whole unit of work (close tasks in the current stage, open
    /// tasks for the next stage, bump the status) commits atomically or
    /// not at all. The version filter on the status update detects a
    /// snapshot gone stale under a concurrent writer; losing writers roll
    /// back everything. The returned detail is assembled inside the
    /// transaction, so it reflects exactly the rows this attempt wrote.
    async fn advance_snapshot(
        &self,
        order: WorkOrderModel,
        to: Status,
    ) -> Result<(Status, WorkOrderDetailResponse), ServiceError> {
        let db = &*self.db_pool;

        let from = order.status;
        if !workflow::can_transition(from, to) {
            return Err(ServiceError::IllegalTransition { from, to });
        }

        let txn = db.begin().await?;

        // One transaction-local instant: task closures and the new tasks'
        // start times across all items must agree.
        let now = Utc::now();

        let items = ItemEntity::find()
            .filter(work_order_item::Column::WorkOrderId.eq(order.id))
            .all(&txn)
            .await?;
        let item_ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();

        if let Some(current_stage) = workflow::stage_for(from) {
            // Open tasks in a different stage than the order's current one
            // should not occur; they are deliberately left untouched.
            TaskEntity::update_many()
                .col_expr(production_task::Column::FinishedAt, Expr::value(Some(now)))
                .filter(production_task::Column::WorkOrderItemId.is_in(item_ids.clone()))
                .filter(production_task::Column::Stage.eq(current_stage))
                .filter(production_task::Column::FinishedAt.is_null())
                .exec(&txn)
                .await?;
        }

        if let Some(next_stage) = workflow::stage_for(to) {
            let new_tasks: Vec<TaskActiveModel> = item_ids
                .iter()
                .map(|item_id| TaskActiveModel {
                    id: Set(Uuid::new_v4()),
                    work_order_item_id: Set(*item_id),
                    stage: Set(next_stage),
                    started_at: Set(now),
                    finished_at: Set(None),
                    notes: Set(None),
                })
                .collect();
            TaskEntity::insert_many(new_tasks).exec(&txn).await?;
        }

        let update_result = WorkOrderEntity::update_many()
            .col_expr(work_order::Column::Status, Expr::value(to))
            .col_expr(work_order::Column::UpdatedAt, Expr::value(Some(now)))
            .col_expr(
                work_order::Column::Version,
                Expr::value(order.version + 1),
            )
            .filter(work_order::Column::Id.eq(order.id))
            .filter(work_order::Column::Version.eq(order.version))
            .exec(&txn)
            .await?;

        if update_result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ServiceError::TransactionConflict(order.id));
        }

        let updated = WorkOrderModel {
            status: to,
            updated_at: Some(now),
            version: order.version + 1,
            ..order
        };
        let detail = load_detail_on(&txn, updated).await?;

        txn.commit().await?;
        Ok((from, detail))
    }

    /// Retrieves a work order with its items, task ledger and payments.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn get_work_order(
        &self,
        work_order_id: Uuid,
    ) -> Result<Option<WorkOrderDetailResponse>, ServiceError> {
        let db = &*self.db_pool;
        let order = WorkOrderEntity::find_by_id(work_order_id).one(db).await?;

        match order {
            Some(order) => Ok(Some(self.load_detail(order).await?)),
            None => Ok(None),
        }
    }

    /// Retrieves a work order by its human-readable code.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn get_work_order_by_code(
        &self,
        code: &str,
    ) -> Result<Option<WorkOrderDetailResponse>, ServiceError> {
        let db = &*self.db_pool;
        let order = WorkOrderEntity::find()
            .filter(work_order::Column::Code.eq(code))
            .one(db)
            .await?;

        match order {
            Some(order) => Ok(Some(self.load_detail(order).await?)),
            None => Ok(None),
        }
    }

    async fn load_detail(
        &self,
        order: WorkOrderModel,
    ) -> Result<WorkOrderDetailResponse, ServiceError> {
        load_detail_on(&*self.db_pool, order).await
    }

    /// Lists work orders, newest first, optionally filtered by status.
    #[instrument(skip(self))]
    pub async fn list_work_orders(
        &self,
        page: u64,
        per_page: u64,
        status: Option<Status>,
    ) -> Result<WorkOrderListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = WorkOrderEntity::find().order_by_desc(work_order::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(work_order::Column::Status.eq(status));
        }

        let paginator = query.paginate(db, per_page);
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(WorkOrderListResponse {
            work_orders: orders.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }
}

async fn load_detail_on<C: ConnectionTrait>(
    db: &C,
    order: WorkOrderModel,
) -> Result<WorkOrderDetailResponse, ServiceError> {
    let items = ItemEntity::find()
        .filter(work_order_item::Column::WorkOrderId.eq(order.id))
        .order_by_asc(work_order_item::Column::CreatedAt)
        .all(db)
        .await?;

    let item_ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
    let tasks = TaskEntity::find()
        .filter(production_task::Column::WorkOrderItemId.is_in(item_ids))
        .order_by_asc(production_task::Column::StartedAt)
        .all(db)
        .await?;

    let payments = PaymentEntity::find()
        .filter(payment::Column::WorkOrderId.eq(order.id))
        .order_by_asc(payment::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(assemble_detail(order, items, tasks, payments))
}

fn model_to_response(order: WorkOrderModel) -> WorkOrderResponse {
    WorkOrderResponse {
        id: order.id,
        code: order.code,
        customer_id: order.customer_id,
        branch_id: order.branch_id,
        status: order.status,
        current_stage: workflow::stage_for(order.status),
        total: order.total,
        deposit: order.deposit,
        balance: order.balance,
        due_date: order.due_date,
        priority: order.priority,
        notes: order.notes,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

fn assemble_detail(
    order: WorkOrderModel,
    items: Vec<ItemModel>,
    tasks: Vec<TaskModel>,
    payments: Vec<PaymentResponse>,
) -> WorkOrderDetailResponse {
    let items = items
        .into_iter()
        .map(|item| {
            let item_tasks = tasks
                .iter()
                .filter(|task| task.work_order_item_id == item.id)
                .map(|task| ProductionTaskResponse {
                    id: task.id,
                    stage: task.stage,
                    started_at: task.started_at,
                    finished_at: task.finished_at,
                    notes: task.notes.clone(),
                })
                .collect();
            WorkOrderItemResponse {
                id: item.id,
                garment_type: item.garment_type,
                measurement_profile_id: item.measurement_profile_id,
                fabric_id: item.fabric_id,
                price: item.price,
                options_json: item.options_json,
                tasks: item_tasks,
            }
        })
        .collect();

    WorkOrderDetailResponse {
        work_order: model_to_response(order),
        items,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn order_code_format() {
        let now = Utc.with_ymd_and_hms(2024, 9, 15, 10, 30, 45).unwrap();
        let code = generate_order_code(now);
        assert!(code.starts_with("TW-20240915-"));
        assert_eq!(code.len(), "TW-20240915-000000".len());
        let suffix = &code["TW-20240915-".len()..];
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn order_code_suffix_tracks_millis() {
        let base = Utc.with_ymd_and_hms(2024, 9, 15, 10, 30, 45).unwrap();
        let a = generate_order_code(base);
        let b = generate_order_code(base + chrono::Duration::milliseconds(1));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn stale_snapshot_conflicts_and_rolls_back() {
        let db = testing::db().await;
        let service = WorkOrderService::new(Arc::new(db.clone()), None);
        let order_id = testing::seed_confirmed_order(&db).await;

        // Snapshot taken before a competing advancement commits.
        let stale = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        service.advance(order_id, "CUTTING").await.unwrap();

        let tasks_before = TaskEntity::find().all(&db).await.unwrap();

        let err = service
            .advance_snapshot(stale, Status::Cutting)
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::TransactionConflict(id) if id == order_id);

        // The losing attempt rolled back: no task rows, status and
        // version untouched.
        let tasks_after = TaskEntity::find().all(&db).await.unwrap();
        assert_eq!(tasks_before.len(), tasks_after.len());
        let order = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, Status::Cutting);
        assert_eq!(order.version, 2);
    }

    #[tokio::test]
    async fn racing_advances_resolve_against_committed_state() {
        let db = testing::db().await;
        let service = WorkOrderService::new(Arc::new(db.clone()), None);
        let order_id = testing::seed_confirmed_order(&db).await;

        // Both racers target CUTTING; the winner commits first. The
        // loser's retry re-reads the committed row and reports the
        // transition CUTTING -> CUTTING as illegal instead of applying
        // it twice.
        service.advance(order_id, "CUTTING").await.unwrap();
        let err = service.advance(order_id, "CUTTING").await.unwrap_err();
        assert_matches!(
            err,
            ServiceError::IllegalTransition {
                from: Status::Cutting,
                to: Status::Cutting,
            }
        );

        // A guard miss against a bumped version resolves the same way
        // end to end: the retry sees version 2 and succeeds.
        let stale = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let detail = service.advance(order_id, "SEWING").await.unwrap();
        assert_eq!(detail.work_order.status, Status::Sewing);
        assert_matches!(
            service.advance_snapshot(stale, Status::Sewing).await,
            Err(ServiceError::TransactionConflict(_))
        );
    }

    #[tokio::test]
    async fn advance_response_reflects_the_committed_write() {
        let db = testing::db().await;
        let service = WorkOrderService::new(Arc::new(db.clone()), None);
        let order_id = testing::seed_confirmed_order(&db).await;

        let detail = service.advance(order_id, "CUTTING").await.unwrap();
        assert_eq!(detail.work_order.status, Status::Cutting);
        assert_eq!(detail.work_order.current_stage, Some(Stage::Cutting));

        // Task rows in the response are the ones the advancement wrote.
        let open: Vec<_> = detail.items[0]
            .tasks
            .iter()
            .filter(|task| task.finished_at.is_none())
            .collect();
        assert_eq!(open.len(), 2);
        assert!(open.iter().all(|task| task.stage == Stage::Cutting));
    }
}
