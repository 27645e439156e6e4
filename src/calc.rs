use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Arithmetic half-up rounding to a whole grade: 9.5 -> 10, 14.49 -> 14.
///
/// Every published grade in the engine goes through this one function so the
/// calculators and the exam solver can never disagree at a threshold.
pub fn round_half_up(x: Decimal) -> i64 {
    x.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        // Grade arithmetic stays within two-digit magnitudes.
        .unwrap_or(i64::MAX)
}

/// Keep one decimal place, dropping the rest without rounding: 14.68 -> 14.6.
/// Used only by the cohort final score, which never rounds up. The result is
/// rescaled so whole numbers still print with the decimal ("16.0").
pub fn truncate_one_decimal(x: Decimal) -> Decimal {
    let mut d = x.round_dp_with_strategy(1, RoundingStrategy::ToZero);
    d.rescale(1);
    d
}

#[derive(Debug, Clone, Serialize)]
pub struct CalcError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CalcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }
}
