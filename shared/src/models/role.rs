//! Role Model
//!
//! Hierarquia fixa de papéis: CUSTOMER < STAFF < ADMIN < SUPER_ADMIN.
//! O nível de privilégio de um papel é a sua posição na declaração do enum,
//! por isso a comparação de privilégio é simplesmente `Ord`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Papel de um utilizador (conjunto fixo, totalmente ordenado)
///
/// A ordem de declaração É a ordem de privilégio — não reordenar variantes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    Customer,
    Staff,
    Admin,
    SuperAdmin,
}

/// Todos os papéis, por privilégio crescente
pub const ALL_ROLES: &[Role] = &[Role::Customer, Role::Staff, Role::Admin, Role::SuperAdmin];

impl Role {
    /// Literal usado na API e na base de dados
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Staff => "STAFF",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Nível de privilégio (posição na hierarquia, base zero)
    pub const fn level(&self) -> usize {
        *self as usize
    }

    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Erro de conversão para literais fora do conjunto de papéis
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "STAFF" => Ok(Role::Staff),
            "ADMIN" => Ok(Role::Admin),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Verifica se o papel do utilizador atinge o papel mínimo exigido
///
/// Função pura, sem efeitos. Assume que ambos os argumentos já foram
/// validados como membros do conjunto (ver [`is_valid_role`]) — a validação
/// de literais desconhecidos acontece na fronteira, não aqui.
#[inline]
pub fn has_role(user_role: Role, required: Role) -> bool {
    user_role >= required
}

/// Teste de pertença ao conjunto de papéis (validação de fronteira)
pub fn is_valid_role(value: &str) -> bool {
    Role::from_str(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_role_reflexive() {
        for role in ALL_ROLES {
            assert!(has_role(*role, *role), "{role} must meet itself");
        }
    }

    #[test]
    fn test_super_admin_meets_everything() {
        for role in ALL_ROLES {
            assert!(has_role(Role::SuperAdmin, *role));
        }
    }

    #[test]
    fn test_customer_does_not_meet_admin() {
        assert!(!has_role(Role::Customer, Role::Admin));
        assert!(!has_role(Role::Customer, Role::Staff));
        assert!(!has_role(Role::Staff, Role::Admin));
        assert!(!has_role(Role::Admin, Role::SuperAdmin));
    }

    #[test]
    fn test_ordering_matches_declaration() {
        assert!(Role::Customer < Role::Staff);
        assert!(Role::Staff < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
        assert_eq!(Role::Customer.level(), 0);
        assert_eq!(Role::SuperAdmin.level(), 3);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("SUPER_ADMIN".parse::<Role>(), Ok(Role::SuperAdmin));
        assert_eq!("CUSTOMER".parse::<Role>(), Ok(Role::Customer));
        assert!("GERENTE".parse::<Role>().is_err());
        assert!(is_valid_role("STAFF"));
        assert!(!is_valid_role("staff")); // literais são case-sensitive
    }

    #[test]
    fn test_serde_literals() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"SUPER_ADMIN\""
        );
        let role: Role = serde_json::from_str("\"STAFF\"").unwrap();
        assert_eq!(role, Role::Staff);
        assert!(serde_json::from_str::<Role>("\"MANAGER\"").is_err());
    }
}
