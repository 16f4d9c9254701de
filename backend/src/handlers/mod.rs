//! HTTP request handlers for the Smart Gear Manufacturing backend

pub mod health;
pub mod inventory;
pub mod material_request;
pub mod notification;
pub mod purchase_order;
pub mod purchase_request;
pub mod scrap;

pub use health::health_check;
pub use inventory::{list_inventory_items, upsert_inventory_item};
pub use material_request::{
    create_material_request, list_material_requests, process_material_request,
};
pub use notification::{list_notifications, mark_notification_read};
pub use purchase_order::{create_purchase_order, list_purchase_orders, receive_purchase_order};
pub use purchase_request::{
    create_purchase_request, delete_all_purchase_requests, delete_purchase_request,
    list_assigned_purchase_requests, list_purchase_requests, update_purchase_request_status,
};
pub use scrap::{create_scrap_record, list_scrap_records};
