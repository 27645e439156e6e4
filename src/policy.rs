//! Regulation constants, kept as data so an amendment touches one table and
//! nothing else. Everything here is selected by explicit parameters (cohort
//! year, subject duration); the calculators never read a clock.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::round_half_up;

/// First graduation cohort examined under the uniform 25% exam weight
/// (Decreto-Lei 62/2023 transition).
pub const FIRST_UNIFORM_EXAM_WEIGHT_COHORT: i32 = 2023;

/// First graduation cohort whose CFS weights each subject by its duration.
pub const FIRST_WEIGHTED_CFS_COHORT: i32 = 2025;

/// Exam weight for the 9.º ano provas finais: 30% of the final level.
pub fn basico_exam_weight() -> Decimal {
    Decimal::new(30, 2)
}

/// Secundário exam-weight regime, keyed by graduation cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecundarioExamRegulation {
    /// Cohorts up to 2022: 25% for biennial subjects, 30% for the rest
    /// (triennial and annual alike).
    PreReform,
    /// Cohorts from 2023 on: flat 25% regardless of duration.
    // serde's snake_case never splits before digits, so spell the tag out.
    #[serde(rename = "uniform_2023")]
    Uniform2023,
}

impl SecundarioExamRegulation {
    pub fn for_cohort(graduation_cohort_year: Option<i32>) -> Self {
        match graduation_cohort_year {
            Some(y) if y < FIRST_UNIFORM_EXAM_WEIGHT_COHORT => {
                SecundarioExamRegulation::PreReform
            }
            _ => SecundarioExamRegulation::Uniform2023,
        }
    }

    pub fn exam_weight(self, duration_years: u8) -> Decimal {
        match self {
            SecundarioExamRegulation::Uniform2023 => Decimal::new(25, 2),
            SecundarioExamRegulation::PreReform => {
                // The legacy lookup keys on duration 2 alone.
                if duration_years == 2 {
                    Decimal::new(25, 2)
                } else {
                    Decimal::new(30, 2)
                }
            }
        }
    }
}

/// Which mean the cohort final score uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CfsFormula {
    #[serde(rename = "weighted_mean")]
    WeightedMean,
    #[serde(rename = "simple_mean")]
    SimpleMean,
}

pub fn cfs_formula_for_cohort(graduation_cohort_year: Option<i32>) -> CfsFormula {
    match graduation_cohort_year {
        Some(y) if y >= FIRST_WEIGHTED_CFS_COHORT => CfsFormula::WeightedMean,
        _ => CfsFormula::SimpleMean,
    }
}

/// Prova final percentage (0..=100) to a 1..=5 level. The breakpoints
/// partition the whole range; no percentage falls through.
pub fn prova_final_level(percentage: Decimal) -> i64 {
    let bands: [(i64, i64); 4] = [(90, 5), (70, 4), (50, 3), (20, 2)];
    for (floor, level) in bands {
        if percentage >= Decimal::from(floor) {
            return level;
        }
    }
    1
}

/// DGES candidacy score: the 0..=20 cohort final score rescaled onto the
/// 0..=200 seriação scale. A plain x10 today, but isolated here so a future
/// conversion table replaces one function.
pub fn dges_candidacy_score(cfs_value: Decimal) -> i64 {
    round_half_up(cfs_value * Decimal::TEN)
}
