//! Business logic services for the Smart Gear Manufacturing backend

pub mod inventory;
pub mod material_request;
pub mod notification;
pub mod purchase_order;
pub mod purchase_request;
pub mod scrap;

pub use inventory::InventoryService;
pub use material_request::MaterialRequestService;
pub use notification::NotificationService;
pub use purchase_order::PurchaseOrderService;
pub use purchase_request::PurchaseRequestService;
pub use scrap::ScrapService;
