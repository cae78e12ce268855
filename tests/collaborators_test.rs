mod common;

use assert_matches::assert_matches;
use atelier_api::{
    entities::shipment_scan::ScanDirection,
    errors::ServiceError,
    services::{
        customers::{CreateCustomerRequest, CustomerService},
        fabrics::{CreateFabricRequest, FabricService, UpdateFabricRequest},
        measurements::{CreateMeasurementProfileRequest, MeasurementService},
        shipments::{CreateShipmentRequest, RecordScanRequest, ShipmentService},
        work_orders::WorkOrderService,
    },
    workflow::Status,
};
use chrono::Utc;
use common::{fixtures, seed_branch};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

fn customer_request(phone: &str) -> CreateCustomerRequest {
    CreateCustomerRequest {
        name: "Ruwan Silva".to_string(),
        phone: phone.to_string(),
        alt_phone: None,
        preferred_lang: Some("si".to_string()),
        default_branch_id: None,
    }
}

#[tokio::test]
async fn duplicate_phone_is_rejected() {
    let fx = fixtures().await;
    let customers = CustomerService::new(fx.db.clone(), None);

    customers
        .create_customer(customer_request("+94771234567"))
        .await
        .unwrap();

    let result = customers
        .create_customer(customer_request("+94771234567"))
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn search_matches_name_and_phone_substrings() {
    let fx = fixtures().await;
    let customers = CustomerService::new(fx.db.clone(), None);

    customers
        .create_customer(customer_request("+94775550101"))
        .await
        .unwrap();

    let by_name = customers.search_customers("Ruwan").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Ruwan Silva");

    let by_phone = customers.search_customers("5550101").await.unwrap();
    assert_eq!(by_phone.len(), 1);

    let no_match = customers.search_customers("zzz-nobody").await.unwrap();
    assert!(no_match.is_empty());
}

#[tokio::test]
async fn get_missing_customer_is_none() {
    let fx = fixtures().await;
    let customers = CustomerService::new(fx.db.clone(), None);

    let missing = customers.get_customer(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn fabric_sku_is_unique_and_immutable() {
    let fx = fixtures().await;
    let fabrics = FabricService::new(fx.db.clone());

    let created = fabrics
        .create_fabric(CreateFabricRequest {
            sku: "LN-0042".to_string(),
            name: "Irish Linen".to_string(),
            color: "Ecru".to_string(),
            composition: "100% linen".to_string(),
            width_cm: 140,
            stock_qty: 25,
            price: dec!(32.50),
        })
        .await
        .unwrap();

    let duplicate = fabrics
        .create_fabric(CreateFabricRequest {
            sku: "LN-0042".to_string(),
            name: "Other".to_string(),
            color: "Navy".to_string(),
            composition: "100% linen".to_string(),
            width_cm: 140,
            stock_qty: 5,
            price: dec!(30.00),
        })
        .await;
    assert_matches!(duplicate, Err(ServiceError::ValidationError(_)));

    let updated = fabrics
        .update_fabric(
            created.id,
            UpdateFabricRequest {
                stock_qty: Some(18),
                price: Some(dec!(34.00)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sku, "LN-0042");
    assert_eq!(updated.stock_qty, 18);
    assert_eq!(updated.price, dec!(34.00));
    // Untouched fields survive a partial update.
    assert_eq!(updated.name, "Irish Linen");
}

#[tokio::test]
async fn fabric_validation_rejects_bad_ranges() {
    let fx = fixtures().await;
    let fabrics = FabricService::new(fx.db.clone());

    let result = fabrics
        .create_fabric(CreateFabricRequest {
            sku: "BAD-01".to_string(),
            name: "Bad".to_string(),
            color: "Red".to_string(),
            composition: "poly".to_string(),
            width_cm: 0,
            stock_qty: -1,
            price: dec!(1.00),
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn remeasuring_appends_a_new_profile_version() {
    let fx = fixtures().await;
    let measurements = MeasurementService::new(fx.db.clone());

    // The fixture already seeded SUIT_2PC v1 for this customer.
    let v2 = measurements
        .create_profile(CreateMeasurementProfileRequest {
            customer_id: fx.customer.id,
            garment_type: "SUIT_2PC".to_string(),
            unit: "cm".to_string(),
            taken_by_name: "Nimal".to_string(),
            data_json: json!({"chest": 104, "waist": 90, "sleeve": 63}),
        })
        .await
        .unwrap();
    assert_eq!(v2.version, 2);

    // A different garment type starts its own version sequence.
    let shirt = measurements
        .create_profile(CreateMeasurementProfileRequest {
            customer_id: fx.customer.id,
            garment_type: "SHIRT".to_string(),
            unit: "cm".to_string(),
            taken_by_name: "Nimal".to_string(),
            data_json: json!({"collar": 41, "sleeve": 62}),
        })
        .await
        .unwrap();
    assert_eq!(shirt.version, 1);

    let history = measurements.list_for_customer(fx.customer.id).await.unwrap();
    assert_eq!(history.len(), 3);
}

#[tokio::test]
async fn profile_for_missing_customer_is_not_found() {
    let fx = fixtures().await;
    let measurements = MeasurementService::new(fx.db.clone());

    let result = measurements
        .create_profile(CreateMeasurementProfileRequest {
            customer_id: Uuid::new_v4(),
            garment_type: "SHIRT".to_string(),
            unit: "cm".to_string(),
            taken_by_name: "Nimal".to_string(),
            data_json: json!({}),
        })
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn creating_a_shipment_records_out_scans() {
    let fx = fixtures().await;
    let work_orders = WorkOrderService::new(fx.db.clone(), None);
    let shipments = ShipmentService::new(fx.db.clone(), None);

    let order = work_orders
        .create_work_order(fx.order_request(dec!(250.00), dec!(50.00)))
        .await
        .unwrap();
    let destination = seed_branch(&fx.db, "Kandy Branch").await;

    let shipment = shipments
        .create_shipment(CreateShipmentRequest {
            from_branch_id: fx.branch.id,
            to_branch_id: destination.id,
            date: Utc::now(),
            notes: Some("Evening van".to_string()),
            work_order_ids: vec![order.work_order.id],
        })
        .await
        .unwrap();

    assert_eq!(shipment.scans.len(), 1);
    let scan = &shipment.scans[0];
    assert_eq!(scan.direction, ScanDirection::Out);
    assert_eq!(scan.scanned_by_name, "System");
    assert_eq!(scan.work_order_id, order.work_order.id);
}

#[tokio::test]
async fn shipment_between_same_branch_is_rejected() {
    let fx = fixtures().await;
    let shipments = ShipmentService::new(fx.db.clone(), None);

    let result = shipments
        .create_shipment(CreateShipmentRequest {
            from_branch_id: fx.branch.id,
            to_branch_id: fx.branch.id,
            date: Utc::now(),
            notes: None,
            work_order_ids: vec![],
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn scans_never_touch_the_order_workflow() {
    let fx = fixtures().await;
    let work_orders = WorkOrderService::new(fx.db.clone(), None);
    let shipments = ShipmentService::new(fx.db.clone(), None);

    let order = work_orders
        .create_work_order(fx.order_request(dec!(250.00), dec!(50.00)))
        .await
        .unwrap();
    let destination = seed_branch(&fx.db, "Galle Branch").await;

    let shipment = shipments
        .create_shipment(CreateShipmentRequest {
            from_branch_id: fx.branch.id,
            to_branch_id: destination.id,
            date: Utc::now(),
            notes: None,
            work_order_ids: vec![order.work_order.id],
        })
        .await
        .unwrap();

    let scan = shipments
        .record_scan(RecordScanRequest {
            shipment_id: shipment.id,
            work_order_id: order.work_order.id,
            direction: ScanDirection::In,
            scanned_by_name: "Kasun".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(scan.direction, ScanDirection::In);

    // Status and the task ledger are advanced only through the workflow.
    let after = work_orders
        .get_work_order(order.work_order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.work_order.status, Status::Confirmed);
    assert_eq!(after.items[0].tasks.len(), 1);
    assert!(after.items[0].tasks[0].finished_at.is_none());

    let listed = shipments.list_shipments().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].scans.len(), 2);
}

#[tokio::test]
async fn scan_against_unknown_shipment_is_not_found() {
    let fx = fixtures().await;
    let shipments = ShipmentService::new(fx.db.clone(), None);

    let result = shipments
        .record_scan(RecordScanRequest {
            shipment_id: Uuid::new_v4(),
            work_order_id: Uuid::new_v4(),
            direction: ScanDirection::In,
            scanned_by_name: "Kasun".to_string(),
        })
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}
