use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::Stage;

/// One entry in an item's task ledger. A task with `finished_at == None` is
/// currently open; the orchestrator closes the open task for the outgoing
/// stage before opening one for the incoming stage, so per stage cycle an
/// item holds at most one open task.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub work_order_item_id: Uuid,
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_order_item::Entity",
        from = "Column::WorkOrderItemId",
        to = "super::work_order_item::Column::Id"
    )]
    WorkOrderItem,
}

impl Related<super::work_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
