//! Permission Definitions
//!
//! Avaliador de permissões por hierarquia de papéis.
//!
//! ## Princípios
//! - Operações básicas (catálogo, encomendas próprias) exigem apenas login
//! - Cada acção administrativa tem um papel mínimo fixo
//! - A decisão é sempre `has_role(papel_do_utilizador, papel_mínimo)` —
//!   não há listas de permissões por utilizador

use shared::models::{Role, has_role};

// === Papéis mínimos por acção ===

/// Gestão de produtos (criar/editar/desactivar)
pub const MIN_ROLE_MANAGE_PRODUCTS: Role = Role::Staff;
/// Gestão de categorias
pub const MIN_ROLE_MANAGE_CATEGORIES: Role = Role::Staff;
/// Ajustes de estoque
pub const MIN_ROLE_ADJUST_STOCK: Role = Role::Staff;
/// Ver todas as encomendas (não apenas as próprias)
pub const MIN_ROLE_VIEW_ALL_ORDERS: Role = Role::Staff;
/// Alterar o estado de encomendas
pub const MIN_ROLE_MANAGE_ORDERS: Role = Role::Staff;
/// Confirmar pagamentos por transferência
pub const MIN_ROLE_CONFIRM_PAYMENTS: Role = Role::Staff;
/// Cancelar encomendas de qualquer cliente
pub const MIN_ROLE_CANCEL_ANY_ORDER: Role = Role::Staff;
/// Ver relatórios e métricas
pub const MIN_ROLE_VIEW_REPORTS: Role = Role::Staff;
/// Exportar relatórios
pub const MIN_ROLE_EXPORT_REPORTS: Role = Role::Admin;
/// Gerir utilizadores (listar, activar/desactivar)
pub const MIN_ROLE_MANAGE_USERS: Role = Role::Admin;
/// Gerir definições do sistema
pub const MIN_ROLE_MANAGE_SETTINGS: Role = Role::Admin;
/// Alterar papéis de utilizadores
pub const MIN_ROLE_CHANGE_ROLES: Role = Role::SuperAdmin;

// === Predicados nomeados ===

pub fn can_manage_products(role: Role) -> bool {
    has_role(role, MIN_ROLE_MANAGE_PRODUCTS)
}

pub fn can_manage_categories(role: Role) -> bool {
    has_role(role, MIN_ROLE_MANAGE_CATEGORIES)
}

pub fn can_adjust_stock(role: Role) -> bool {
    has_role(role, MIN_ROLE_ADJUST_STOCK)
}

pub fn can_view_all_orders(role: Role) -> bool {
    has_role(role, MIN_ROLE_VIEW_ALL_ORDERS)
}

pub fn can_manage_orders(role: Role) -> bool {
    has_role(role, MIN_ROLE_MANAGE_ORDERS)
}

pub fn can_confirm_payments(role: Role) -> bool {
    has_role(role, MIN_ROLE_CONFIRM_PAYMENTS)
}

pub fn can_cancel_any_order(role: Role) -> bool {
    has_role(role, MIN_ROLE_CANCEL_ANY_ORDER)
}

pub fn can_view_reports(role: Role) -> bool {
    has_role(role, MIN_ROLE_VIEW_REPORTS)
}

pub fn can_export_reports(role: Role) -> bool {
    has_role(role, MIN_ROLE_EXPORT_REPORTS)
}

pub fn can_manage_users(role: Role) -> bool {
    has_role(role, MIN_ROLE_MANAGE_USERS)
}

pub fn can_manage_settings(role: Role) -> bool {
    has_role(role, MIN_ROLE_MANAGE_SETTINGS)
}

pub fn can_change_roles(role: Role) -> bool {
    has_role(role, MIN_ROLE_CHANGE_ROLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_has_no_admin_powers() {
        assert!(!can_manage_products(Role::Customer));
        assert!(!can_view_all_orders(Role::Customer));
        assert!(!can_view_reports(Role::Customer));
        assert!(!can_manage_users(Role::Customer));
        assert!(!can_change_roles(Role::Customer));
    }

    #[test]
    fn test_staff_powers() {
        assert!(can_manage_products(Role::Staff));
        assert!(can_manage_orders(Role::Staff));
        assert!(can_view_reports(Role::Staff));
        assert!(!can_manage_users(Role::Staff));
        assert!(!can_export_reports(Role::Staff));
        assert!(!can_change_roles(Role::Staff));
    }

    #[test]
    fn test_admin_powers() {
        assert!(can_manage_users(Role::Admin));
        assert!(can_export_reports(Role::Admin));
        assert!(can_manage_settings(Role::Admin));
        assert!(!can_change_roles(Role::Admin));
    }

    #[test]
    fn test_super_admin_has_everything() {
        assert!(can_manage_products(Role::SuperAdmin));
        assert!(can_manage_users(Role::SuperAdmin));
        assert!(can_change_roles(Role::SuperAdmin));
    }
}
