use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::{round_half_up, CalcError};
use crate::policy;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CfdComputation {
    pub cfd_raw: Decimal,
    pub cfd_grade: i64,
    pub exam_grade: i64,
    pub exam_weight: Decimal,
}

/// National exam raw score (0..=200) to the published 0..=20 grade.
pub fn convert_exam_grade(exam_raw: i64) -> i64 {
    round_half_up(Decimal::from(exam_raw) / Decimal::TEN)
}

pub fn check_exam_raw(exam_raw: i64) -> Result<(), CalcError> {
    if !(0..=200).contains(&exam_raw) {
        return Err(CalcError {
            code: "exam_raw_out_of_range".to_string(),
            message: format!("exam raw score {} outside 0..=200", exam_raw),
            details: None,
        });
    }
    Ok(())
}

/// Provas finais publish a percentage, not a 0..=200 raw.
pub fn check_exam_percentage(percentage: Decimal) -> Result<(), CalcError> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(CalcError {
            code: "exam_raw_out_of_range".to_string(),
            message: format!("prova final percentage {} outside 0..=100", percentage),
            details: None,
        });
    }
    Ok(())
}

/// Classificação final da disciplina for an examined secundário subject:
/// the internal grade blended with the converted exam grade at the weight
/// the regulation assigns. `cif` may be the unrounded CIF or the integer
/// grade; both are legal inputs.
pub fn secundario_cfd(cif: Decimal, exam_raw: i64, exam_weight: Decimal) -> CfdComputation {
    let exam_grade = convert_exam_grade(exam_raw);
    let raw = cif * (Decimal::ONE - exam_weight) + Decimal::from(exam_grade) * exam_weight;
    CfdComputation {
        cfd_raw: raw,
        cfd_grade: round_half_up(raw),
        exam_grade,
        exam_weight,
    }
}

/// 9.º ano prova final: the annual level blended 70/30 with the exam level
/// derived from the percentage bands, clamped back onto 1..=5.
pub fn basico_cfd(annual_level: i64, exam_percentage: Decimal) -> CfdComputation {
    let exam_weight = policy::basico_exam_weight();
    let exam_level = policy::prova_final_level(exam_percentage);
    let raw = Decimal::from(annual_level) * (Decimal::ONE - exam_weight)
        + Decimal::from(exam_level) * exam_weight;
    CfdComputation {
        cfd_raw: raw,
        cfd_grade: round_half_up(raw).clamp(1, 5),
        exam_grade: exam_level,
        exam_weight,
    }
}
