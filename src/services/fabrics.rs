use crate::{
    db::DbPool,
    entities::fabric::{
        self, ActiveModel as FabricActiveModel, Entity as FabricEntity, Model as FabricModel,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFabricRequest {
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub color: String,
    pub composition: String,
    pub width_cm: i32,
    pub stock_qty: i32,
    pub price: Decimal,
}

/// Partial update; absent fields are left unchanged. SKU is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateFabricRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub composition: Option<String>,
    pub width_cm: Option<i32>,
    pub stock_qty: Option<i32>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FabricResponse {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub color: String,
    pub composition: String,
    pub width_cm: i32,
    pub stock_qty: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<FabricModel> for FabricResponse {
    fn from(model: FabricModel) -> Self {
        Self {
            id: model.id,
            sku: model.sku,
            name: model.name,
            color: model.color,
            composition: model.composition,
            width_cm: model.width_cm,
            stock_qty: model.stock_qty,
            price: model.price,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct FabricService {
    db_pool: Arc<DbPool>,
}

impl FabricService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(sku = %request.sku))]
    pub async fn create_fabric(
        &self,
        request: CreateFabricRequest,
    ) -> Result<FabricResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        if request.width_cm <= 0 {
            return Err(ServiceError::ValidationError(
                "Width must be positive".to_string(),
            ));
        }
        if request.stock_qty < 0 || request.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock and price must not be negative".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let result = FabricActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(request.sku.clone()),
            name: Set(request.name),
            color: Set(request.color),
            composition: Set(request.composition),
            width_cm: Set(request.width_cm),
            stock_qty: Set(request.stock_qty),
            price: Set(request.price),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await;

        match result {
            Ok(fabric) => {
                info!(fabric_id = %fabric.id, sku = %fabric.sku, "fabric created");
                Ok(FabricResponse::from(fabric))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                ServiceError::ValidationError(format!("SKU '{}' already exists", request.sku)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, request), fields(fabric_id = %fabric_id))]
    pub async fn update_fabric(
        &self,
        fabric_id: Uuid,
        request: UpdateFabricRequest,
    ) -> Result<FabricResponse, ServiceError> {
        let db = &*self.db_pool;

        let fabric = FabricEntity::find_by_id(fabric_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Fabric not found".to_string()))?;

        if let Some(width) = request.width_cm {
            if width <= 0 {
                return Err(ServiceError::ValidationError(
                    "Width must be positive".to_string(),
                ));
            }
        }
        if matches!(request.stock_qty, Some(qty) if qty < 0)
            || matches!(request.price, Some(price) if price < Decimal::ZERO)
        {
            return Err(ServiceError::ValidationError(
                "Stock and price must not be negative".to_string(),
            ));
        }

        let mut active: FabricActiveModel = fabric.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(color) = request.color {
            active.color = Set(color);
        }
        if let Some(composition) = request.composition {
            active.composition = Set(composition);
        }
        if let Some(width_cm) = request.width_cm {
            active.width_cm = Set(width_cm);
        }
        if let Some(stock_qty) = request.stock_qty {
            active.stock_qty = Set(stock_qty);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }

        let updated = active.update(db).await?;
        info!(%fabric_id, "fabric updated");
        Ok(FabricResponse::from(updated))
    }

    /// Lists all fabrics by name.
    #[instrument(skip(self))]
    pub async fn list_fabrics(&self) -> Result<Vec<FabricResponse>, ServiceError> {
        let db = &*self.db_pool;
        let fabrics = FabricEntity::find()
            .order_by_asc(fabric::Column::Name)
            .all(db)
            .await?;
        Ok(fabrics.into_iter().map(FabricResponse::from).collect())
    }
}
