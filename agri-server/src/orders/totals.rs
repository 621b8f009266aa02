//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Regra dos totais:
//!
//! `total = subtotal + taxa_entrega - desconto`

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01 AOA)
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Maximum allowed unit price (Kz 100,000,000)
const MAX_PRICE: f64 = 100_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a monetary amount (finite, non-negative, bounded)
pub fn validate_amount(value: f64, field_name: &str) -> Result<(), AppError> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field_name, MAX_PRICE, value
        )));
    }
    Ok(())
}

/// Validate a line quantity (positive, bounded)
pub fn validate_quantity(quantidade: i64) -> Result<(), AppError> {
    if quantidade <= 0 {
        return Err(AppError::validation(format!(
            "quantidade must be positive, got {}",
            quantidade
        )));
    }
    if quantidade > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantidade exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantidade
        )));
    }
    Ok(())
}

/// Round a decimal to 2 places, half-up
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn to_decimal(value: f64, field_name: &str) -> Result<Decimal, AppError> {
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{} is not representable", field_name)))
}

/// Subtotal de uma linha: `quantidade * preco_unitario`
pub fn line_subtotal(quantidade: i64, preco_unitario: f64) -> Result<f64, AppError> {
    validate_quantity(quantidade)?;
    validate_amount(preco_unitario, "preco_unitario")?;

    let qty = Decimal::from(quantidade);
    let price = to_decimal(preco_unitario, "preco_unitario")?;
    let subtotal = round2(qty * price);
    subtotal
        .to_f64()
        .ok_or_else(|| AppError::internal("line subtotal overflow"))
}

/// Soma dos subtotais das linhas
pub fn order_subtotal(line_subtotals: &[f64]) -> Result<f64, AppError> {
    let mut sum = Decimal::ZERO;
    for (i, value) in line_subtotals.iter().enumerate() {
        sum += to_decimal(*value, &format!("item[{i}].subtotal"))?;
    }
    round2(sum)
        .to_f64()
        .ok_or_else(|| AppError::internal("order subtotal overflow"))
}

/// Total da encomenda: `subtotal + taxa_entrega - desconto`
///
/// O desconto nunca leva o total abaixo de zero.
pub fn order_total(subtotal: f64, taxa_entrega: f64, desconto: f64) -> Result<f64, AppError> {
    validate_amount(subtotal, "subtotal")?;
    validate_amount(taxa_entrega, "taxa_entrega")?;
    validate_amount(desconto, "desconto")?;

    let total = to_decimal(subtotal, "subtotal")?
        + to_decimal(taxa_entrega, "taxa_entrega")?
        - to_decimal(desconto, "desconto")?;
    let total = round2(total.max(Decimal::ZERO));
    total
        .to_f64()
        .ok_or_else(|| AppError::internal("order total overflow"))
}

/// Verifica o invariante dos totais numa encomenda persistida
pub fn totals_consistent(subtotal: f64, taxa_entrega: f64, desconto: f64, total: f64) -> bool {
    match order_total(subtotal, taxa_entrega, desconto) {
        Ok(expected) => (expected - total).abs() <= MONEY_TOLERANCE,
        Err(_) => false,
    }
}
