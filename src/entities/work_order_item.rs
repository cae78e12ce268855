use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub garment_type: String,
    pub measurement_profile_id: Uuid,
    pub fabric_id: Option<Uuid>,
    pub price: Decimal,
    /// Per-item options (embroidery, collar style, notes), free-form.
    pub options_json: Option<Json>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_order::Entity",
        from = "Column::WorkOrderId",
        to = "super::work_order::Column::Id"
    )]
    WorkOrder,
    #[sea_orm(
        belongs_to = "super::fabric::Entity",
        from = "Column::FabricId",
        to = "super::fabric::Column::Id"
    )]
    Fabric,
    #[sea_orm(
        belongs_to = "super::measurement_profile::Entity",
        from = "Column::MeasurementProfileId",
        to = "super::measurement_profile::Column::Id"
    )]
    MeasurementProfile,
    #[sea_orm(has_many = "super::production_task::Entity")]
    ProductionTasks,
}

impl Related<super::work_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrder.def()
    }
}

impl Related<super::fabric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fabric.def()
    }
}

impl Related<super::measurement_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasurementProfile.def()
    }
}

impl Related<super::production_task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionTasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
