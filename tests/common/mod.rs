#![allow(dead_code)]

use std::sync::Arc;

use atelier_api::{
    db::DbPool,
    entities::{branch, customer, fabric, measurement_profile},
    migrator::Migrator,
    services::work_orders::{CreateWorkOrderItemRequest, CreateWorkOrderRequest},
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use uuid::Uuid;

/// Fresh in-memory SQLite database with the full schema applied.
///
/// A single connection keeps every query in the test on the same
/// in-memory database.
pub async fn test_db() -> Arc<DbPool> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    Arc::new(db)
}

pub async fn seed_branch(db: &DbPool, name: &str) -> branch::Model {
    branch::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        area: Set("Downtown".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("failed to seed branch")
}

pub async fn seed_customer(db: &DbPool, branch_id: Uuid) -> customer::Model {
    customer::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Amal Perera".to_string()),
        // Unique per call; the column carries a unique index.
        phone: Set(format!("+94{}", &Uuid::new_v4().simple().to_string()[..9])),
        alt_phone: Set(None),
        preferred_lang: Set(Some("en".to_string())),
        default_branch_id: Set(Some(branch_id)),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("failed to seed customer")
}

pub async fn seed_fabric(db: &DbPool) -> fabric::Model {
    fabric::ActiveModel {
        id: Set(Uuid::new_v4()),
        sku: Set(format!("FB-{}", &Uuid::new_v4().simple().to_string()[..8])),
        name: Set("Super 120s Wool".to_string()),
        color: Set("Charcoal".to_string()),
        composition: Set("100% wool".to_string()),
        width_cm: Set(150),
        stock_qty: Set(40),
        price: Set(Decimal::new(4_500, 2)),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("failed to seed fabric")
}

pub async fn seed_profile(db: &DbPool, customer_id: Uuid) -> measurement_profile::Model {
    measurement_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        garment_type: Set("SUIT_2PC".to_string()),
        unit: Set("cm".to_string()),
        version: Set(1),
        taken_by_name: Set("Nimal".to_string()),
        taken_at: Set(Utc::now()),
        data_json: Set(json!({"chest": 102, "waist": 88, "sleeve": 63})),
    }
    .insert(db)
    .await
    .expect("failed to seed measurement profile")
}

/// Common fixture: one branch, one customer with a profile, one fabric.
pub struct Fixtures {
    pub db: Arc<DbPool>,
    pub branch: branch::Model,
    pub customer: customer::Model,
    pub fabric: fabric::Model,
    pub profile: measurement_profile::Model,
}

pub async fn fixtures() -> Fixtures {
    let db = test_db().await;
    let branch = seed_branch(&db, "Head Office").await;
    let customer = seed_customer(&db, branch.id).await;
    let fabric = seed_fabric(&db).await;
    let profile = seed_profile(&db, customer.id).await;
    Fixtures {
        db,
        branch,
        customer,
        fabric,
        profile,
    }
}

impl Fixtures {
    /// A single-item order request; amounts mirror a typical suit order.
    pub fn order_request(&self, total: Decimal, deposit: Decimal) -> CreateWorkOrderRequest {
        CreateWorkOrderRequest {
            customer_id: self.customer.id,
            branch_id: self.branch.id,
            due_date: Utc::now() + Duration::days(14),
            priority: Default::default(),
            total,
            deposit,
            notes: None,
            items: vec![CreateWorkOrderItemRequest {
                garment_type: "SUIT_2PC".to_string(),
                measurement_profile_id: self.profile.id,
                fabric_id: Some(self.fabric.id),
                price: total,
                options_json: Some(json!({"lapel": "notch", "vents": 2})),
            }],
        }
    }

    /// A two-item order request splitting `total` across the items.
    pub fn two_item_order_request(
        &self,
        total: Decimal,
        deposit: Decimal,
    ) -> CreateWorkOrderRequest {
        let mut request = self.order_request(total, deposit);
        let half = total / Decimal::from(2);
        request.items[0].price = half;
        request.items.push(CreateWorkOrderItemRequest {
            garment_type: "TROUSER".to_string(),
            measurement_profile_id: self.profile.id,
            fabric_id: Some(self.fabric.id),
            price: total - half,
            options_json: None,
        });
        request
    }
}
