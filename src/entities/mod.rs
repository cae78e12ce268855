pub mod branch;
pub mod customer;
pub mod fabric;
pub mod measurement_profile;
pub mod payment;
pub mod production_task;
pub mod shipment;
pub mod shipment_scan;
pub mod work_order;
pub mod work_order_item;
