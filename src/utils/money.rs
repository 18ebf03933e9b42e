//! Redondeo monetario
//!
//! Todos los importes se redondean al centavo, con empates alejándose del cero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Cantidad de decimales de un importe
pub const MONEY_SCALE: u32 = 2;

/// Redondear un importe a 2 decimales (half-up, nunca bancario)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
