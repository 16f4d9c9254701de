//! Role-based access policy for the supply-chain workflow
//!
//! Every HTTP operation is gated on the caller's role. The policy is kept
//! here as pure functions so the role matrix can be tested without a
//! running server.

use crate::types::Role;

/// Anyone may list inventory; writing is restricted
pub fn can_manage_inventory(role: Role) -> bool {
    matches!(role, Role::InventoryHead | Role::ScmHead)
}

pub fn can_view_material_requests(role: Role) -> bool {
    matches!(
        role,
        Role::InventoryHead | Role::ScmHead | Role::ProductionHead | Role::ScmPlanner
    )
}

/// Only the manufacturing department raises material requests
pub fn can_create_material_request(role: Role) -> bool {
    role == Role::ProductionHead
}

pub fn can_process_material_request(role: Role) -> bool {
    matches!(role, Role::InventoryHead | Role::ScmHead)
}

pub fn can_view_purchase_requests(role: Role) -> bool {
    matches!(role, Role::ScmPlanner | Role::ScmHead | Role::ScmPurchaser)
}

pub fn can_create_purchase_request(role: Role) -> bool {
    matches!(role, Role::ScmPlanner | Role::ScmHead)
}

pub fn can_update_purchase_request(role: Role) -> bool {
    matches!(role, Role::ScmPlanner | Role::ScmHead | Role::ScmPurchaser)
}

pub fn can_delete_purchase_request(role: Role) -> bool {
    matches!(role, Role::ScmPlanner | Role::ScmHead)
}

pub fn can_view_assigned_purchase_requests(role: Role) -> bool {
    role == Role::ScmPurchaser
}

pub fn can_view_purchase_orders(role: Role) -> bool {
    matches!(role, Role::ScmPurchaser | Role::ScmHead | Role::ScmPlanner)
}

pub fn can_create_purchase_order(role: Role) -> bool {
    matches!(role, Role::ScmPurchaser | Role::ScmHead)
}

pub fn can_receive_purchase_order(role: Role) -> bool {
    matches!(role, Role::ScmPurchaser | Role::ScmHead)
}

pub fn can_manage_scrap_records(role: Role) -> bool {
    matches!(
        role,
        Role::InventoryHead | Role::ProductionHead | Role::ScmHead | Role::ScmPlanner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 8] = [
        Role::Admin,
        Role::User,
        Role::InventoryHead,
        Role::MaintenanceHead,
        Role::ProductionHead,
        Role::ScmHead,
        Role::ScmPlanner,
        Role::ScmPurchaser,
    ];

    /// Check a predicate grants exactly the listed roles and no others
    fn assert_exactly(pred: fn(Role) -> bool, allowed: &[Role]) {
        for role in ALL_ROLES {
            assert_eq!(
                pred(role),
                allowed.contains(&role),
                "unexpected policy answer for {role}"
            );
        }
    }

    #[test]
    fn test_inventory_write_policy() {
        assert_exactly(can_manage_inventory, &[Role::InventoryHead, Role::ScmHead]);
    }

    #[test]
    fn test_material_request_policy() {
        assert_exactly(can_create_material_request, &[Role::ProductionHead]);
        assert_exactly(
            can_process_material_request,
            &[Role::InventoryHead, Role::ScmHead],
        );
        assert_exactly(
            can_view_material_requests,
            &[
                Role::InventoryHead,
                Role::ScmHead,
                Role::ProductionHead,
                Role::ScmPlanner,
            ],
        );
    }

    #[test]
    fn test_purchase_request_policy() {
        assert_exactly(
            can_view_purchase_requests,
            &[Role::ScmPlanner, Role::ScmHead, Role::ScmPurchaser],
        );
        assert_exactly(
            can_create_purchase_request,
            &[Role::ScmPlanner, Role::ScmHead],
        );
        assert_exactly(
            can_delete_purchase_request,
            &[Role::ScmPlanner, Role::ScmHead],
        );
        assert_exactly(can_view_assigned_purchase_requests, &[Role::ScmPurchaser]);
    }

    #[test]
    fn test_purchase_order_policy() {
        assert_exactly(
            can_view_purchase_orders,
            &[Role::ScmPurchaser, Role::ScmHead, Role::ScmPlanner],
        );
        assert_exactly(
            can_create_purchase_order,
            &[Role::ScmPurchaser, Role::ScmHead],
        );
        assert_exactly(
            can_receive_purchase_order,
            &[Role::ScmPurchaser, Role::ScmHead],
        );
    }

    #[test]
    fn test_scrap_policy() {
        assert_exactly(
            can_manage_scrap_records,
            &[
                Role::InventoryHead,
                Role::ProductionHead,
                Role::ScmHead,
                Role::ScmPlanner,
            ],
        );
    }
}
