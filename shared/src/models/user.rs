//! User Model

use super::role::Role;
use serde::{Deserialize, Serialize};

/// User entity (linha da tabela `utilizador`)
///
/// O hash da password nunca sai do servidor — ver [`UserPublic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// User view returned by the API (sem password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub criado_em: i64,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            email: u.email,
            telefone: u.telefone,
            role: u.role,
            is_active: u.is_active,
            criado_em: u.criado_em,
        }
    }
}

/// Registo de conta (storefront)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegister {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub password: String,
}

/// Update user payload (admin)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub is_active: Option<bool>,
}

/// Role reassignment payload (apenas SUPER_ADMIN)
#[derive(Debug, Clone, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: token + perfil
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserPublic,
}
