use crate::{
    db::DbPool,
    entities::customer::{
        self, ActiveModel as CustomerActiveModel, Entity as CustomerEntity, Model as CustomerModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Cap on search results; the dashboard search box never pages.
const SEARCH_LIMIT: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    pub alt_phone: Option<String>,
    pub preferred_lang: Option<String>,
    pub default_branch_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub alt_phone: Option<String>,
    pub preferred_lang: Option<String>,
    pub default_branch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerModel> for CustomerResponse {
    fn from(model: CustomerModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            phone: model.phone,
            alt_phone: model.alt_phone,
            preferred_lang: model.preferred_lang,
            default_branch_id: model.default_branch_id,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a customer; phone numbers are unique across branches.
    #[instrument(skip(self, request), fields(phone = %request.phone))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;
        let customer_id = Uuid::new_v4();

        let result = CustomerActiveModel {
            id: Set(customer_id),
            name: Set(request.name),
            phone: Set(request.phone),
            alt_phone: Set(request.alt_phone),
            preferred_lang: Set(request.preferred_lang),
            default_branch_id: Set(request.default_branch_id),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await;

        let customer = match result {
            Ok(customer) => customer,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(ServiceError::ValidationError(
                    "A customer with this phone number already exists".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(%customer_id, "customer created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::CustomerCreated { customer_id }).await {
                warn!(error = %e, %customer_id, "failed to send customer created event");
            }
        }

        Ok(CustomerResponse::from(customer))
    }

    /// Retrieves a customer by id.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn get_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<CustomerResponse>, ServiceError> {
        let db = &*self.db_pool;
        let customer = CustomerEntity::find_by_id(customer_id).one(db).await?;
        Ok(customer.map(CustomerResponse::from))
    }

    /// Searches customers by name or phone substring, name order,
    /// capped at 50 rows. An empty query lists the first 50 customers.
    #[instrument(skip(self))]
    pub async fn search_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut find = CustomerEntity::find();
        let trimmed = query.trim();
        if !trimmed.is_empty() {
            find = find.filter(
                Condition::any()
                    .add(customer::Column::Name.contains(trimmed))
                    .add(customer::Column::Phone.contains(trimmed))
                    .add(customer::Column::AltPhone.contains(trimmed)),
            );
        }

        let customers = find
            .order_by_asc(customer::Column::Name)
            .limit(SEARCH_LIMIT)
            .all(db)
            .await?;

        Ok(customers.into_iter().map(CustomerResponse::from).collect())
    }
}
