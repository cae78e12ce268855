use crate::{
    db::DbPool,
    entities::customer::Entity as CustomerEntity,
    entities::measurement_profile::{
        self, ActiveModel as ProfileActiveModel, Entity as ProfileEntity, Model as ProfileModel,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMeasurementProfileRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "Garment type is required"))]
    pub garment_type: String,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(length(min = 1, message = "Taker name is required"))]
    pub taken_by_name: String,
    /// Free-form measurement key/value map (e.g. chest, waist, inseam).
    pub data_json: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeasurementProfileResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub garment_type: String,
    pub unit: String,
    pub version: i32,
    pub taken_by_name: String,
    pub taken_at: DateTime<Utc>,
    pub data_json: serde_json::Value,
}

impl From<ProfileModel> for MeasurementProfileResponse {
    fn from(model: ProfileModel) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            garment_type: model.garment_type,
            unit: model.unit,
            version: model.version,
            taken_by_name: model.taken_by_name,
            taken_at: model.taken_at,
            data_json: model.data_json,
        }
    }
}

/// Measurement profiles are versioned per (customer, garment type); a
/// re-measure appends a new profile rather than editing the old one, so
/// existing work orders keep pointing at the numbers they were cut to.
#[derive(Clone)]
pub struct MeasurementService {
    db_pool: Arc<DbPool>,
}

impl MeasurementService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, garment_type = %request.garment_type))]
    pub async fn create_profile(
        &self,
        request: CreateMeasurementProfileRequest,
    ) -> Result<MeasurementProfileResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let txn = db.begin().await?;

        CustomerEntity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;

        let prior = ProfileEntity::find()
            .filter(measurement_profile::Column::CustomerId.eq(request.customer_id))
            .filter(measurement_profile::Column::GarmentType.eq(request.garment_type.clone()))
            .count(&txn)
            .await?;
        let version = i32::try_from(prior).unwrap_or(i32::MAX - 1) + 1;

        let profile = ProfileActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(request.customer_id),
            garment_type: Set(request.garment_type),
            unit: Set(request.unit),
            version: Set(version),
            taken_by_name: Set(request.taken_by_name),
            taken_at: Set(Utc::now()),
            data_json: Set(request.data_json),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(profile_id = %profile.id, version, "measurement profile created");
        Ok(MeasurementProfileResponse::from(profile))
    }

    /// Lists a customer's profiles, newest measurements first.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<MeasurementProfileResponse>, ServiceError> {
        let db = &*self.db_pool;
        let profiles = ProfileEntity::find()
            .filter(measurement_profile::Column::CustomerId.eq(customer_id))
            .order_by_desc(measurement_profile::Column::TakenAt)
            .all(db)
            .await?;
        Ok(profiles
            .into_iter()
            .map(MeasurementProfileResponse::from)
            .collect())
    }
}
