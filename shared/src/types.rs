//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organizational roles gating every workflow operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    InventoryHead,
    MaintenanceHead,
    ProductionHead,
    ScmHead,
    ScmPlanner,
    ScmPurchaser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::InventoryHead => "inventory_head",
            Role::MaintenanceHead => "maintenance_head",
            Role::ProductionHead => "production_head",
            Role::ScmHead => "scm_head",
            Role::ScmPlanner => "scm_planner",
            Role::ScmPurchaser => "scm_purchaser",
        }
    }

    /// Department-head roles that can be assigned work in the supply chain
    pub fn department_heads() -> &'static [Role] {
        &[
            Role::InventoryHead,
            Role::MaintenanceHead,
            Role::ProductionHead,
            Role::ScmHead,
            Role::ScmPlanner,
            Role::ScmPurchaser,
        ]
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "inventory_head" => Ok(Role::InventoryHead),
            "maintenance_head" => Ok(Role::MaintenanceHead),
            "production_head" => Ok(Role::ProductionHead),
            "scm_head" => Ok(Role::ScmHead),
            "scm_planner" => Ok(Role::ScmPlanner),
            "scm_purchaser" => Ok(Role::ScmPurchaser),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role strings that do not match any known role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Entity kinds a notification can point at (weak reference, lookup-only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RelatedType {
    #[serde(rename = "MR")]
    MaterialRequest,
    #[serde(rename = "PR")]
    PurchaseRequest,
    #[serde(rename = "PO")]
    PurchaseOrder,
}

impl RelatedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedType::MaterialRequest => "MR",
            RelatedType::PurchaseRequest => "PR",
            RelatedType::PurchaseOrder => "PO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Admin,
            Role::User,
            Role::InventoryHead,
            Role::MaintenanceHead,
            Role::ProductionHead,
            Role::ScmHead,
            Role::ScmPlanner,
            Role::ScmPurchaser,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("warehouse_wizard".parse::<Role>().is_err());
    }

    #[test]
    fn test_department_heads_excludes_plain_users() {
        let heads = Role::department_heads();
        assert!(!heads.contains(&Role::User));
        assert!(!heads.contains(&Role::Admin));
        assert_eq!(heads.len(), 6);
    }
}
