// Core services
pub mod customers;
pub mod fabrics;
pub mod measurements;
pub mod payments;
pub mod shipments;
pub mod work_orders;

#[cfg(test)]
pub(crate) mod testing {
    use crate::entities::{branch, customer, measurement_profile};
    use crate::migrator::Migrator;
    use crate::services::work_orders::{
        CreateWorkOrderItemRequest, CreateWorkOrderRequest, WorkOrderService,
    };
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
    use sea_orm_migration::MigratorTrait;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    /// Fresh in-memory SQLite database with the full schema applied.
    /// A single connection keeps every query on the same database.
    pub(crate) async fn db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
        opt.max_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .expect("failed to open in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("failed to run migrations");
        db
    }

    /// Seeds the referenced rows and creates one single-item order with a
    /// deposit, leaving it CONFIRMED with an open CUTTING task. Returns
    /// the order id.
    pub(crate) async fn seed_confirmed_order(db: &DatabaseConnection) -> Uuid {
        let now = Utc::now();

        let branch = branch::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Colombo Branch".to_string()),
            area: Set("Colombo 03".to_string()),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("failed to insert branch");

        let customer = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Nimal Perera".to_string()),
            phone: Set("0771234567".to_string()),
            alt_phone: Set(None),
            preferred_lang: Set(None),
            default_branch_id: Set(Some(branch.id)),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("failed to insert customer");

        let profile = measurement_profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer.id),
            garment_type: Set("SUIT_2PC".to_string()),
            unit: Set("CM".to_string()),
            version: Set(1),
            taken_by_name: Set("Master Cutter".to_string()),
            taken_at: Set(now),
            data_json: Set(json!({ "chest": 102, "waist": 88 })),
        }
        .insert(db)
        .await
        .expect("failed to insert profile");

        let service = WorkOrderService::new(Arc::new(db.clone()), None);
        let detail = service
            .create_work_order(CreateWorkOrderRequest {
                customer_id: customer.id,
                branch_id: branch.id,
                due_date: now + Duration::days(14),
                priority: Default::default(),
                total: dec!(400.00),
                deposit: dec!(100.00),
                notes: None,
                items: vec![CreateWorkOrderItemRequest {
                    garment_type: "SUIT_2PC".to_string(),
                    measurement_profile_id: profile.id,
                    fabric_id: None,
                    price: dec!(400.00),
                    options_json: None,
                }],
            })
            .await
            .expect("failed to create order");

        detail.work_order.id
    }
}
