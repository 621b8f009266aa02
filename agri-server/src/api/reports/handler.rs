//! Reports API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::report as report_repo;
use crate::utils::AppResult;
use crate::utils::time;

// ============================================================================
// Response Types
// ============================================================================

/// Contagem de encomendas por estado
#[derive(Debug, Clone, Serialize)]
pub struct StateCount {
    pub estado: String,
    pub total: i64,
}

/// Ponto da série de receita diária
#[derive(Debug, Clone, Serialize)]
pub struct RevenuePoint {
    pub dia: String,
    pub valor: f64,
}

/// Produto mais vendido
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub nome: String,
    pub vendidos: i64,
}

/// Resumo do dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub receita: f64,
    pub encomendas: i64,
    pub clientes: i64,
    pub ticket_medio: f64,
    pub por_estado: Vec<StateCount>,
    pub receita_diaria: Vec<RevenuePoint>,
    pub mais_vendidos: Vec<TopProduct>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuery {
    /// Data inicial (YYYY-MM-DD); omissão: últimos 30 dias
    pub start_date: Option<String>,
    /// Data final (YYYY-MM-DD), inclusiva
    pub end_date: Option<String>,
}

/// Número de produtos no top de vendas
const TOP_PRODUCTS_LIMIT: u32 = 10;

/// GET /api/relatorios/resumo - métricas do período
pub async fn overview(
    State(state): State<ServerState>,
    Query(query): Query<OverviewQuery>,
) -> AppResult<Json<OverviewResponse>> {
    let tz = state.business_tz();
    let hoje = chrono::Utc::now().with_timezone(&tz).date_naive();

    let end = match &query.end_date {
        Some(d) => time::parse_date(d)?,
        None => hoje,
    };
    let start = match &query.start_date {
        Some(d) => time::parse_date(d)?,
        None => end - chrono::Duration::days(30),
    };

    let de = time::day_start_millis(start, tz);
    let ate = time::day_end_millis(end, tz);

    let receita = report_repo::revenue(&state.db, de, ate).await?;
    let por_estado = report_repo::orders_by_state(&state.db, de, ate).await?;
    let clientes = report_repo::distinct_customers(&state.db, de, ate).await?;
    let diaria = report_repo::daily_revenue(&state.db, de, ate).await?;
    let top = report_repo::top_products(&state.db, de, ate, TOP_PRODUCTS_LIMIT).await?;

    let encomendas: i64 = por_estado.iter().map(|(_, n)| n).sum();
    let pagas: i64 = por_estado
        .iter()
        .filter(|(estado, _)| !matches!(estado.as_str(), "PENDENTE" | "CANCELADO"))
        .map(|(_, n)| n)
        .sum();
    let ticket_medio = if pagas > 0 {
        receita / pagas as f64
    } else {
        0.0
    };

    Ok(Json(OverviewResponse {
        receita,
        encomendas,
        clientes,
        ticket_medio,
        por_estado: por_estado
            .into_iter()
            .map(|(estado, total)| StateCount {
                estado: estado.as_str().to_string(),
                total,
            })
            .collect(),
        receita_diaria: diaria
            .into_iter()
            .map(|(dia, valor)| RevenuePoint { dia, valor })
            .collect(),
        mais_vendidos: top
            .into_iter()
            .map(|(nome, vendidos)| TopProduct { nome, vendidos })
            .collect(),
    }))
}
