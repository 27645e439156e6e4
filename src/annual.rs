use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::{round_half_up, CalcError};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualComputation {
    pub raw_annual: Option<Decimal>,
    pub annual_grade: Option<i64>,
    /// False while any period still awaits its pauta.
    pub is_complete: bool,
    pub periods_counted: usize,
}

/// Year grade from the period pautas, weighted by the settings' period
/// weights (already validated to sum 100). Unlike the in-period projection,
/// the annual average only exists once every period is in: a year with a
/// missing pauta is "awaiting", never a partial number.
pub fn annual_from_periods(
    pautas: &[Option<i64>],
    weights: &[Decimal],
) -> Result<AnnualComputation, CalcError> {
    if pautas.len() != weights.len() {
        return Err(CalcError {
            code: "period_weights_mismatch".to_string(),
            message: format!(
                "{} periods but {} weights",
                pautas.len(),
                weights.len()
            ),
            details: None,
        });
    }

    if pautas.is_empty() || pautas.iter().any(|p| p.is_none()) {
        return Ok(AnnualComputation {
            raw_annual: None,
            annual_grade: None,
            is_complete: false,
            periods_counted: pautas.iter().filter(|p| p.is_some()).count(),
        });
    }

    let mut sum = Decimal::ZERO;
    for (pauta, weight) in pautas.iter().zip(weights) {
        if let Some(g) = pauta {
            sum += Decimal::from(*g) * *weight;
        }
    }
    let raw = sum / Decimal::ONE_HUNDRED;

    Ok(AnnualComputation {
        raw_annual: Some(raw),
        annual_grade: Some(round_half_up(raw)),
        is_complete: true,
        periods_counted: pautas.len(),
    })
}
