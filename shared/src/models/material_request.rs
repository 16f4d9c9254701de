//! Material request models and allocation arithmetic

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a material request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRequestStatus {
    /// Created, awaiting inventory review
    Pending,
    /// Allocated stock deducted; shortfall (if any) on order
    InventoryApproved,
    /// Shortfall received via purchase order, loop closed
    Fulfilled,
}

impl MaterialRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialRequestStatus::Pending => "pending",
            MaterialRequestStatus::InventoryApproved => "inventory_approved",
            MaterialRequestStatus::Fulfilled => "fulfilled",
        }
    }
}

impl FromStr for MaterialRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MaterialRequestStatus::Pending),
            "inventory_approved" => Ok(MaterialRequestStatus::InventoryApproved),
            "fulfilled" => Ok(MaterialRequestStatus::Fulfilled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Per-line status on a material request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Pending,
    Allocated,
    ToOrder,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Pending => "pending",
            LineStatus::Allocated => "allocated",
            LineStatus::ToOrder => "to_order",
        }
    }
}

impl FromStr for LineStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LineStatus::Pending),
            "allocated" => Ok(LineStatus::Allocated),
            "to_order" => Ok(LineStatus::ToOrder),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Error for status strings that do not match any known status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// Split of a requested quantity into what current stock covers and what
/// must be procured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationSplit {
    pub allocated: Decimal,
    pub to_order: Decimal,
}

/// Plan an allocation against on-hand stock without reserving it.
///
/// Invariant: `allocated + to_order == requested` and
/// `allocated <= on_hand` for every non-negative input.
pub fn reserve_plan(on_hand: Decimal, requested: Decimal) -> AllocationSplit {
    let allocated = on_hand.min(requested).max(Decimal::ZERO);
    AllocationSplit {
        allocated,
        to_order: requested - allocated,
    }
}

/// One item's share of an allocation outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationLine {
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: Decimal,
}

/// Breakdown returned to the requester: what is ready to dispatch from
/// stock and what has been routed to procurement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationResult {
    pub available: Vec<AllocationLine>,
    pub to_order: Vec<AllocationLine>,
}

impl AllocationResult {
    pub fn has_shortfall(&self) -> bool {
        !self.to_order.is_empty()
    }

    pub fn push_available(&mut self, item_id: Option<Uuid>, item_name: &str, quantity: Decimal) {
        if quantity > Decimal::ZERO {
            self.available.push(AllocationLine {
                item_id,
                item_name: item_name.to_string(),
                quantity,
            });
        }
    }

    pub fn push_to_order(&mut self, item_id: Option<Uuid>, item_name: &str, quantity: Decimal) {
        if quantity > Decimal::ZERO {
            self.to_order.push(AllocationLine {
                item_id,
                item_name: item_name.to_string(),
                quantity,
            });
        }
    }
}
