//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (linha da tabela `produto`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    /// Category reference
    pub categoria_id: i64,
    /// Preço unitário em kwanzas (AOA)
    pub preco: f64,
    /// Unidade de venda (kg, saco, caixa, unidade, ...)
    pub unidade: String,
    pub estoque: i64,
    /// URL/chave da imagem no storage externo
    pub imagem: Option<String>,
    pub is_active: bool,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub nome: String,
    pub descricao: Option<String>,
    pub categoria_id: i64,
    pub preco: f64,
    pub unidade: Option<String>,
    pub estoque: Option<i64>,
    pub imagem: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub categoria_id: Option<i64>,
    pub preco: Option<f64>,
    pub unidade: Option<String>,
    pub estoque: Option<i64>,
    pub imagem: Option<String>,
    pub is_active: Option<bool>,
}
