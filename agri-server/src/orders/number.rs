//! Numeração sequencial de encomendas e facturas
//!
//! Formato: `<PREFIXO>-<ano>-<sequência de 5 dígitos>`, por exemplo
//! `AGC-2025-00042`. A sequência reinicia a cada ano civil (fuso do negócio).
//!
//! A geração em si é pura (parse do último número + incremento); a protecção
//! contra corridas entre criações simultâneas é o UNIQUE em `numero` — quem
//! perder a corrida repete a alocação (ver db::repository::order).

use crate::utils::AppError;

/// Prefixo dos números de encomenda
pub const ORDER_PREFIX: &str = "AGC";
/// Prefixo dos números de factura
pub const INVOICE_PREFIX: &str = "FCT";

/// Largura da sequência (zero-padded)
const SEQ_WIDTH: usize = 5;

/// Formata um número sequencial
pub fn format_number(prefix: &str, year: i32, seq: u32) -> String {
    format!("{prefix}-{year}-{seq:0width$}", width = SEQ_WIDTH)
}

/// Extrai a sequência numérica final de um número existente
///
/// Devolve `None` para números que não terminem em `-<dígitos>`.
pub fn parse_sequence(numero: &str) -> Option<u32> {
    numero.rsplit('-').next()?.parse().ok()
}

/// Próximo número para o ano, dado o maior número já existente nesse ano
///
/// Sem número anterior a sequência começa em 1.
pub fn next_number(prefix: &str, year: i32, latest: Option<&str>) -> Result<String, AppError> {
    let seq = match latest {
        None => 1,
        Some(numero) => parse_sequence(numero)
            .ok_or_else(|| {
                AppError::internal(format!("Malformed sequential number in store: {numero}"))
            })?
            .checked_add(1)
            .ok_or_else(|| AppError::internal("Sequential number overflow"))?,
    };
    Ok(format_number(prefix, year, seq))
}

/// Prefixo de pesquisa para todos os números de um ano (`AGC-2025-%`)
pub fn year_prefix(prefix: &str, year: i32) -> String {
    format!("{prefix}-{year}-")
}
