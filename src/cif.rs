use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::round_half_up;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CifComputation {
    pub cif_raw: Option<Decimal>,
    pub cif_grade: Option<i64>,
    pub years_counted: usize,
}

/// Classificação interna final: equal-weight mean of the annual grades the
/// subject has so far. A year without a grade drops out of numerator and
/// denominator alike; it is never read as zero. No grades at all means no
/// CIF yet, which downstream calculators treat as "awaiting".
pub fn cif_from_annuals(annuals: &[Option<i64>]) -> CifComputation {
    let mut sum = Decimal::ZERO;
    let mut count = 0usize;
    for g in annuals.iter().flatten() {
        sum += Decimal::from(*g);
        count += 1;
    }

    if count == 0 {
        return CifComputation {
            cif_raw: None,
            cif_grade: None,
            years_counted: 0,
        };
    }

    let raw = sum / Decimal::from(count);
    CifComputation {
        cif_raw: Some(raw),
        cif_grade: Some(round_half_up(raw)),
        years_counted: count,
    }
}
