//! Access policy tests
//!
//! Role-based checks guarding the supply chain workflow endpoints.
//! Every check is a pure function of the caller's role, so the matrix
//! is verified exhaustively.

use shared::access;
use shared::types::Role;

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

/// Assert a check passes for exactly the listed roles
fn assert_exactly(check: fn(Role) -> bool, allowed: &[Role]) {
    for role in ALL_ROLES {
        assert_eq!(
            check(role),
            allowed.contains(&role),
            "unexpected access outcome for {role}"
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Only production raises material requests
    #[test]
    fn test_material_request_creation_is_production_only() {
        assert_exactly(
            access::can_create_material_request,
            &[Role::ProductionHead],
        );
    }

    /// Inventory and SCM heads approve requests
    #[test]
    fn test_material_request_processing_roles() {
        assert_exactly(
            access::can_process_material_request,
            &[Role::InventoryHead, Role::ScmHead],
        );
    }

    /// The request list is visible to the workflow participants
    #[test]
    fn test_material_request_visibility() {
        assert_exactly(
            access::can_view_material_requests,
            &[
                Role::InventoryHead,
                Role::ProductionHead,
                Role::ScmHead,
                Role::ScmPlanner,
            ],
        );
    }

    /// Stock levels are managed by inventory and the SCM head
    #[test]
    fn test_inventory_management_roles() {
        assert_exactly(
            access::can_manage_inventory,
            &[Role::InventoryHead, Role::ScmHead],
        );
    }

    /// Planners and the SCM head route purchase requests
    #[test]
    fn test_purchase_request_creation_roles() {
        assert_exactly(
            access::can_create_purchase_request,
            &[Role::ScmHead, Role::ScmPlanner],
        );
    }

    /// The assigned purchaser participates in status updates
    #[test]
    fn test_purchase_request_update_roles() {
        assert_exactly(
            access::can_update_purchase_request,
            &[Role::ScmHead, Role::ScmPlanner, Role::ScmPurchaser],
        );
    }

    /// Only purchasers have a personal assignment queue
    #[test]
    fn test_assigned_queue_is_purchaser_only() {
        assert_exactly(
            access::can_view_assigned_purchase_requests,
            &[Role::ScmPurchaser],
        );
    }

    /// Deleting purchase requests is a planning-side operation
    #[test]
    fn test_purchase_request_deletion_roles() {
        assert_exactly(
            access::can_delete_purchase_request,
            &[Role::ScmHead, Role::ScmPlanner],
        );
    }

    /// Purchasers register and receive purchase orders; the SCM head
    /// can step in on both
    #[test]
    fn test_purchase_order_roles() {
        assert_exactly(
            access::can_create_purchase_order,
            &[Role::ScmHead, Role::ScmPurchaser],
        );
        assert_exactly(
            access::can_receive_purchase_order,
            &[Role::ScmHead, Role::ScmPurchaser],
        );
    }

    /// Unprivileged roles are locked out of every workflow mutation
    #[test]
    fn test_plain_user_has_no_workflow_access() {
        for check in [
            access::can_manage_inventory,
            access::can_create_material_request,
            access::can_process_material_request,
            access::can_create_purchase_request,
            access::can_update_purchase_request,
            access::can_delete_purchase_request,
            access::can_create_purchase_order,
            access::can_receive_purchase_order,
        ] {
            assert!(!check(Role::User));
            assert!(!check(Role::MaintenanceHead));
        }
    }

    /// Roles parse from their storage strings
    #[test]
    fn test_role_parsing() {
        for role in ALL_ROLES {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("supervisor".parse::<Role>().is_err());
    }
}
