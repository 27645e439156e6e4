use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::AcademicYear;
use crate::curriculum::CourseKey;
use crate::scale::EducationLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Trimestral,
    Semestral,
}

impl Regime {
    pub fn period_count(&self) -> usize {
        match self {
            Regime::Trimestral => 3,
            Regime::Semestral => 2,
        }
    }
}

/// One student-year's grading configuration, exactly as the caller stores
/// it. The engine only ever reads this; problems are reported, nothing is
/// corrected in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSettings {
    pub education_level: EducationLevel,
    pub regime: Regime,
    #[serde(default)]
    pub period_weights: Vec<Decimal>,
    #[serde(default)]
    pub course: Option<CourseKey>,
    #[serde(default)]
    pub graduation_cohort_year: Option<i32>,
    #[serde(default)]
    pub academic_year: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsProblem {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

fn problem(field: &'static str, code: &'static str, message: String) -> SettingsProblem {
    SettingsProblem { field, code, message }
}

/// Structured validation of a settings record. Every problem found is
/// returned; an empty list means the record is usable as-is.
pub fn validate_settings(settings: &GradeSettings) -> Vec<SettingsProblem> {
    let mut problems = Vec::new();

    let expected = settings.regime.period_count();
    if settings.period_weights.len() != expected {
        problems.push(problem(
            "periodWeights",
            "period_count_mismatch",
            format!(
                "{:?} regime needs {} period weights, found {}",
                settings.regime,
                expected,
                settings.period_weights.len()
            ),
        ));
    }
    if settings.period_weights.iter().any(|w| *w <= Decimal::ZERO) {
        problems.push(problem(
            "periodWeights",
            "weight_not_positive",
            "every period weight must be greater than zero".to_string(),
        ));
    }
    let sum: Decimal = settings.period_weights.iter().copied().sum();
    if !settings.period_weights.is_empty() && sum != Decimal::ONE_HUNDRED {
        problems.push(problem(
            "periodWeights",
            "weights_sum_not_100",
            format!("period weights sum to {}, expected 100", sum),
        ));
    }

    if settings.education_level == EducationLevel::Secundario && settings.course.is_none() {
        problems.push(problem(
            "course",
            "course_required",
            "secundário settings need a course for curriculum resolution".to_string(),
        ));
    }

    if let Some(y) = settings.graduation_cohort_year {
        if !(1990..=2100).contains(&y) {
            problems.push(problem(
                "graduationCohortYear",
                "cohort_year_out_of_range",
                format!("cohort year {} outside 1990..=2100", y),
            ));
        }
    }

    if let Some(label) = &settings.academic_year {
        if let Err(e) = AcademicYear::parse(label) {
            problems.push(problem(
                "academicYear",
                "academic_year_invalid",
                e.to_string(),
            ));
        }
    }

    problems
}
