use crate::{
    db::DbPool,
    entities::payment::{
        self, ActiveModel as PaymentActiveModel, Entity as PaymentEntity, Model as PaymentModel,
        PaymentMethod,
    },
    entities::work_order::{self, Entity as WorkOrderEntity, Model as WorkOrderModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::work_orders::CONFLICT_RETRY_ATTEMPTS,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub txn_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub txn_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentModel> for PaymentResponse {
    fn from(model: PaymentModel) -> Self {
        Self {
            id: model.id,
            work_order_id: model.work_order_id,
            amount: model.amount,
            method: model.method,
            txn_ref: model.txn_ref,
            created_at: model.created_at,
        }
    }
}

/// Append-only payment ledger. Recording a payment recomputes the owning
/// work order's outstanding balance; nothing here touches order status.
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records a payment against a work order and updates its balance.
    ///
    /// The balance is floored at zero: overpayment is capped, not
    /// rejected, and the excess is not tracked.
    #[instrument(skip(self, request), fields(work_order_id = %work_order_id, amount = %request.amount))]
    pub async fn record_payment(
        &self,
        work_order_id: Uuid,
        request: RecordPaymentRequest,
    ) -> Result<PaymentResponse, ServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidAmount(format!(
                "Payment amount must be positive, got {}",
                request.amount
            )));
        }

        let mut attempt = 0;
        let (payment, new_balance) = loop {
            attempt += 1;
            match self.record_payment_once(work_order_id, &request).await {
                Ok(result) => break result,
                Err(ServiceError::TransactionConflict(_)) if attempt < CONFLICT_RETRY_ATTEMPTS => {
                    warn!(%work_order_id, attempt, "payment lost a write race, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(%work_order_id, payment_id = %payment.id, balance = %new_balance, "payment recorded");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::PaymentRecorded {
                    work_order_id,
                    payment_id: payment.id,
                    amount: payment.amount,
                    balance: new_balance,
                })
                .await
            {
                warn!(error = %e, %work_order_id, "failed to send payment recorded event");
            }
        }

        Ok(PaymentResponse::from(payment))
    }

    /// One recording attempt: reads the current order row and records the
    /// payment against that snapshot.
    async fn record_payment_once(
        &self,
        work_order_id: Uuid,
        request: &RecordPaymentRequest,
    ) -> Result<(PaymentModel, Decimal), ServiceError> {
        let order = WorkOrderEntity::find_by_id(work_order_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;

        self.record_snapshot(&order, request).await
    }

    /// Inserts the payment and updates the balance computed from a
    /// previously read order row. The version filter on the balance
    /// update detects a snapshot gone stale under a concurrent writer;
    /// losing writers roll back the payment row too.
    async fn record_snapshot(
        &self,
        order: &WorkOrderModel,
        request: &RecordPaymentRequest,
    ) -> Result<(PaymentModel, Decimal), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let now = Utc::now();
        let new_balance = (order.balance - request.amount).max(Decimal::ZERO);

        let payment = PaymentActiveModel {
            id: Set(Uuid::new_v4()),
            work_order_id: Set(order.id),
            amount: Set(request.amount),
            method: Set(request.method),
            txn_ref: Set(request.txn_ref.clone()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let update_result = WorkOrderEntity::update_many()
            .col_expr(work_order::Column::Balance, Expr::value(new_balance))
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

        txn.commit().await?;
        Ok((payment, new_balance))
    }

    /// Lists payments for a work order, oldest first.
    #[instrument(skip(self), fields(work_order_id = %work_order_id))]
    pub async fn list_payments(
        &self,
        work_order_id: Uuid,
    ) -> Result<Vec<PaymentResponse>, ServiceError> {
        let db = &*self.db_pool;

        // A missing order should read as 404, not an empty ledger.
        WorkOrderEntity::find_by_id(work_order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Work order not found".to_string()))?;

        let payments = PaymentEntity::find()
            .filter(payment::Column::WorkOrderId.eq(work_order_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(payments.into_iter().map(PaymentResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn cash(amount: Decimal) -> RecordPaymentRequest {
        RecordPaymentRequest {
            amount,
            method: PaymentMethod::Cash,
            txn_ref: None,
        }
    }

    #[tokio::test]
    async fn stale_balance_snapshot_conflicts_and_rolls_back() {
        let db = testing::db().await;
        let service = PaymentService::new(Arc::new(db.clone()), None);
        let order_id = testing::seed_confirmed_order(&db).await;

        // Snapshot taken before a competing payment commits.
        let stale = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        service.record_payment(order_id, cash(dec!(50))).await.unwrap();

        let err = service
            .record_snapshot(&stale, &cash(dec!(25)))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::TransactionConflict(id) if id == order_id);

        // The losing attempt rolled back: its payment row is gone and
        // the balance still reflects only the committed payment.
        let rows = service.list_payments(order_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        let order = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.balance, dec!(250.00));

        // A retry re-reads the committed balance and lands on top of it.
        service.record_payment(order_id, cash(dec!(25))).await.unwrap();
        let order = WorkOrderEntity::find_by_id(order_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.balance, dec!(225.00));
        assert_eq!(service.list_payments(order_id).await.unwrap().len(), 2);
    }
}
