//! Purchase request and purchase order state machines

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::material_request::UnknownStatus;

/// Lifecycle of a purchase request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRequestStatus {
    /// Manually created, not yet routed
    Draft,
    /// Auto-spawned from a material request shortfall
    Pending,
    /// Assigned to a purchaser by a planner
    Submitted,
    /// Purchaser has uploaded the vendor order
    PoUploaded,
    /// Goods received, loop closed
    Approved,
}

impl PurchaseRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseRequestStatus::Draft => "draft",
            PurchaseRequestStatus::Pending => "pending",
            PurchaseRequestStatus::Submitted => "submitted",
            PurchaseRequestStatus::PoUploaded => "po_uploaded",
            PurchaseRequestStatus::Approved => "approved",
        }
    }

    /// A planner may still route the request to a purchaser. Once an
    /// order has been uploaded (or the request closed) reassignment is
    /// an invalid transition.
    pub fn can_assign(&self) -> bool {
        matches!(
            self,
            PurchaseRequestStatus::Draft
                | PurchaseRequestStatus::Pending
                | PurchaseRequestStatus::Submitted
        )
    }
}

impl FromStr for PurchaseRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PurchaseRequestStatus::Draft),
            "pending" => Ok(PurchaseRequestStatus::Pending),
            "submitted" => Ok(PurchaseRequestStatus::Submitted),
            "po_uploaded" => Ok(PurchaseRequestStatus::PoUploaded),
            "approved" => Ok(PurchaseRequestStatus::Approved),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Lifecycle of a purchase order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Open,
    Received,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Open => "open",
            PurchaseOrderStatus::Received => "received",
        }
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(PurchaseOrderStatus::Open),
            "received" => Ok(PurchaseOrderStatus::Received),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}
