use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc::{round_half_up, CalcError};

/// One line of a period's evaluation grid: a test, assignment, attitude
/// entry, whatever the school configured. Weight is a percentage share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    pub weight_percentage: Decimal,
    #[serde(default)]
    pub raw_grade: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComputation {
    pub raw_calculated: Option<Decimal>,
    pub calculated_grade: Option<i64>,
    pub graded_count: usize,
    pub total_count: usize,
    pub is_complete: bool,
    /// True when a grade exists but not every element is in yet.
    pub is_projection: bool,
    /// Sum over all elements, graded or not. 100 when the setup is sane;
    /// reported as-is so the caller can surface a discrepancy.
    pub weight_total: Decimal,
}

/// Weighted average over the graded elements only, normalized by the graded
/// weight share. With every element graded and weights summing 100 this is
/// the plain sum(grade x weight)/100; with a partial grid it projects from
/// what exists instead of treating missing grades as zero.
pub fn evaluate_elements(elements: &[EvaluationElement]) -> PeriodComputation {
    let mut weight_total = Decimal::ZERO;
    let mut graded_weight = Decimal::ZERO;
    let mut graded_sum = Decimal::ZERO;
    let mut graded_count = 0usize;

    for el in elements {
        weight_total += el.weight_percentage;
        if let Some(g) = el.raw_grade {
            graded_weight += el.weight_percentage;
            graded_sum += g * el.weight_percentage;
            graded_count += 1;
        }
    }

    let raw_calculated = if graded_count > 0 && graded_weight > Decimal::ZERO {
        Some(graded_sum / graded_weight)
    } else {
        None
    };
    let calculated_grade = raw_calculated.map(round_half_up);
    let total_count = elements.len();
    let is_complete = total_count > 0 && graded_count == total_count;

    PeriodComputation {
        raw_calculated,
        calculated_grade,
        graded_count,
        total_count,
        is_complete,
        is_projection: calculated_grade.is_some() && !is_complete,
        weight_total,
    }
}

/// A period as the caller stores it. `pauta_grade` is the official grade
/// that leaves the school; it follows `calculated_grade` unless it was
/// entered directly or overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub period_number: u8,
    #[serde(default)]
    pub elements: Vec<EvaluationElement>,
    #[serde(default)]
    pub raw_calculated: Option<Decimal>,
    #[serde(default)]
    pub calculated_grade: Option<i64>,
    #[serde(default)]
    pub pauta_grade: Option<i64>,
    #[serde(default)]
    pub qualitative_grade: Option<String>,
    #[serde(default)]
    pub is_overridden: bool,
    #[serde(default)]
    pub override_reason: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
}

/// Refresh the calculated fields from the element grid. The pauta follows
/// the calculation only when the grid actually produced a grade and no
/// override is in force; a directly entered pauta with no elements behind it
/// stays untouched.
pub fn recalculate(period: &PeriodRecord) -> PeriodRecord {
    let comp = evaluate_elements(&period.elements);
    let mut out = period.clone();
    out.raw_calculated = comp.raw_calculated;
    out.calculated_grade = comp.calculated_grade;
    if !out.is_overridden {
        if let Some(g) = comp.calculated_grade {
            out.pauta_grade = Some(g);
        }
    }
    out
}

fn reject_locked(period: &PeriodRecord) -> Result<(), CalcError> {
    if period.is_locked {
        return Err(CalcError {
            code: "period_locked".to_string(),
            message: format!("period {} is locked", period.period_number),
            details: None,
        });
    }
    Ok(())
}

/// Direct official-grade entry for grids that have no evaluation elements
/// (or where the pauta is keyed straight in). Clears any override.
pub fn enter_pauta(
    period: &PeriodRecord,
    grade: Option<i64>,
    qualitative: Option<String>,
) -> Result<PeriodRecord, CalcError> {
    reject_locked(period)?;
    if grade.is_none() && qualitative.is_none() {
        return Err(CalcError::new(
            "bad_params",
            "pauta entry needs a grade or a qualitative label",
        ));
    }
    let mut out = period.clone();
    out.pauta_grade = grade;
    out.qualitative_grade = qualitative;
    out.is_overridden = false;
    out.override_reason = None;
    Ok(out)
}

/// Manual pauta that diverges from the calculation. The reason is mandatory
/// and travels with the record; recalculation will not touch the grade until
/// the override is cleared.
pub fn apply_override(
    period: &PeriodRecord,
    grade: i64,
    reason: &str,
) -> Result<PeriodRecord, CalcError> {
    reject_locked(period)?;
    if reason.trim().is_empty() {
        return Err(CalcError::new(
            "override_reason_required",
            "an override must carry a non-empty reason",
        ));
    }
    let mut out = period.clone();
    out.pauta_grade = Some(grade);
    out.is_overridden = true;
    out.override_reason = Some(reason.trim().to_string());
    Ok(out)
}

/// Drop the override and let the calculated grade become the pauta again.
pub fn clear_override(period: &PeriodRecord) -> Result<PeriodRecord, CalcError> {
    reject_locked(period)?;
    let mut out = period.clone();
    out.is_overridden = false;
    out.override_reason = None;
    Ok(recalculate(&out))
}
