//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity (linha da tabela `categoria`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub nome: String,
    pub descricao: Option<String>,
    pub sort_order: Option<i64>,
}

/// Update category payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}
