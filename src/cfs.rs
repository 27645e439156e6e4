use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc::{truncate_one_decimal, CalcError};
use crate::cfd;
use crate::cif::cif_from_annuals;
use crate::policy::{self, CfsFormula, SecundarioExamRegulation};
use crate::scale::EducationLevel;

fn default_true() -> bool {
    true
}

fn default_duration() -> u8 {
    1
}

/// One finished subject as the aggregator sees it. `affects_cfs` is false
/// for subjects the regulation keeps out of the average (EMRC, substituted
/// subjects); they are listed but never counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectCfd {
    pub subject: String,
    #[serde(default)]
    pub cfd_grade: Option<i64>,
    #[serde(default = "default_duration")]
    pub duration_years: u8,
    #[serde(default = "default_true")]
    pub affects_cfs: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CfsComputation {
    pub formula: CfsFormula,
    /// Unrounded mean, before the one-decimal truncation.
    pub cfs_raw: Option<Decimal>,
    /// Published score, one decimal, truncated (14.68 -> 14.6).
    pub cfs_value: Option<Decimal>,
    /// The 0..=200 candidacy figure derived from `cfs_value`.
    pub dges_value: Option<i64>,
    pub subjects_counted: usize,
    /// Counted-eligible subjects still missing a CFD.
    pub awaiting: Vec<String>,
    /// Subjects flagged out of the average.
    pub excluded: Vec<String>,
}

/// Classificação final do secundário. Cohorts from the weighted era average
/// each subject's CFD by its duration in years; older cohorts use the plain
/// mean. Either way a subject without a CFD stays out of numerator and
/// denominator, and the published value truncates to one decimal.
pub fn compute_cfs(subjects: &[SubjectCfd], cohort_year: Option<i32>) -> CfsComputation {
    let formula = policy::cfs_formula_for_cohort(cohort_year);

    let mut sum = Decimal::ZERO;
    let mut denom = Decimal::ZERO;
    let mut counted = 0usize;
    let mut awaiting = Vec::new();
    let mut excluded = Vec::new();

    for s in subjects {
        if !s.affects_cfs {
            excluded.push(s.subject.clone());
            continue;
        }
        let Some(cfd) = s.cfd_grade else {
            awaiting.push(s.subject.clone());
            continue;
        };
        let weight = match formula {
            CfsFormula::WeightedMean => Decimal::from(s.duration_years.max(1)),
            CfsFormula::SimpleMean => Decimal::ONE,
        };
        sum += Decimal::from(cfd) * weight;
        denom += weight;
        counted += 1;
    }

    let (cfs_raw, cfs_value, dges_value) = if counted > 0 && denom > Decimal::ZERO {
        let raw = sum / denom;
        let value = truncate_one_decimal(raw);
        let dges = policy::dges_candidacy_score(value);
        (Some(raw), Some(value), Some(dges))
    } else {
        (None, None, None)
    };

    CfsComputation {
        formula,
        cfs_raw,
        cfs_value,
        dges_value,
        subjects_counted: counted,
        awaiting,
        excluded,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CfsSimulation {
    pub baseline: CfsComputation,
    pub simulated: CfsComputation,
    pub cfs_delta: Option<Decimal>,
    pub dges_delta: Option<i64>,
}

/// Re-run the aggregate with one subject's CFD hypothetically replaced.
/// Nothing is mutated; the caller's records stay as they were.
pub fn simulate_cfs(
    subjects: &[SubjectCfd],
    cohort_year: Option<i32>,
    subject: &str,
    hypothetical_cfd: i64,
) -> Result<CfsSimulation, CalcError> {
    if !subjects.iter().any(|s| s.subject == subject) {
        return Err(CalcError {
            code: "not_found".to_string(),
            message: format!("subject {} not in the student's record", subject),
            details: None,
        });
    }

    let baseline = compute_cfs(subjects, cohort_year);
    let patched: Vec<SubjectCfd> = subjects
        .iter()
        .map(|s| {
            let mut s = s.clone();
            if s.subject == subject {
                s.cfd_grade = Some(hypothetical_cfd);
            }
            s
        })
        .collect();
    let simulated = compute_cfs(&patched, cohort_year);

    let cfs_delta = match (simulated.cfs_value, baseline.cfs_value) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };
    let dges_delta = match (simulated.dges_value, baseline.dges_value) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };

    Ok(CfsSimulation {
        baseline,
        simulated,
        cfs_delta,
        dges_delta,
    })
}

/// A subject's multi-year history as the dashboard receives it. Annual
/// grades are positional (10.º, 11.º, 12.º for a triennial); a year still
/// in progress is null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectHistory {
    pub subject: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub annual_grades: Vec<Option<i64>>,
    #[serde(default)]
    pub duration_years: Option<u8>,
    #[serde(default)]
    pub is_exam_candidate: bool,
    /// Secundário: the 0..=200 exam raw. 3.º ciclo: the prova final
    /// percentage (0..=100).
    #[serde(default)]
    pub exam_grade_raw: Option<i64>,
    #[serde(default = "default_true")]
    pub affects_cfs: bool,
    /// 3.º ciclo only: whether the subject sits a prova final at all.
    #[serde(default)]
    pub has_national_exam: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    /// CIF and, where required, the exam are in.
    Final,
    /// CIF closed but the chosen exam has no published score yet.
    AwaitingExam,
    /// Internal grades still incomplete.
    Awaiting,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectFinal {
    pub subject: String,
    pub name: Option<String>,
    pub cif_raw: Option<Decimal>,
    pub cif_grade: Option<i64>,
    pub cfd_raw: Option<Decimal>,
    pub cfd_grade: Option<i64>,
    /// Converted form: 0..=20 for secundário exams, 1..=5 for provas finais.
    pub exam_grade: Option<i64>,
    pub exam_weight: Option<Decimal>,
    pub duration_years: u8,
    pub affects_cfs: bool,
    pub has_national_exam: bool,
    pub status: SubjectStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CfsDashboard {
    pub education_level: EducationLevel,
    /// Null outside secundário; provas finais have one fixed weight.
    pub regulation: Option<SecundarioExamRegulation>,
    pub subjects: Vec<SubjectFinal>,
    pub cfs: CfsComputation,
}

/// Whole-record view: CIF from each subject's annual history, CFD with the
/// exam blended in, then the cohort aggregate over the result. Secundário
/// candidates blend the 0..=200 exam at the regulation weight; 3.º ciclo
/// candidates blend the prova final level at 30%, and only on subjects that
/// carry a national exam. Either blend takes the published (rounded) CIF,
/// which is what the exam solver inverts.
pub fn build_dashboard(
    subjects: &[SubjectHistory],
    cohort_year: Option<i32>,
    level: EducationLevel,
) -> Result<CfsDashboard, CalcError> {
    let regulation = match level {
        EducationLevel::Secundario => Some(SecundarioExamRegulation::for_cohort(cohort_year)),
        EducationLevel::Basico3Ciclo => None,
        other => {
            return Err(CalcError::new(
                "bad_params",
                format!("level {} has no final-grade dashboard", other.as_str()),
            ))
        }
    };
    let mut finals = Vec::with_capacity(subjects.len());

    for s in subjects {
        let tracked_years = s.annual_grades.len().max(1).min(3) as u8;
        let duration = s.duration_years.unwrap_or(tracked_years).clamp(1, 3);
        let cif = cif_from_annuals(&s.annual_grades);

        let mut out = SubjectFinal {
            subject: s.subject.clone(),
            name: s.name.clone(),
            cif_raw: cif.cif_raw,
            cif_grade: cif.cif_grade,
            cfd_raw: None,
            cfd_grade: None,
            exam_grade: None,
            exam_weight: None,
            duration_years: duration,
            affects_cfs: s.affects_cfs,
            has_national_exam: s.has_national_exam,
            status: SubjectStatus::Awaiting,
        };

        if let Some(cif_grade) = cif.cif_grade {
            let exam_applies = match regulation {
                Some(_) => s.is_exam_candidate,
                None => s.is_exam_candidate && s.has_national_exam,
            };
            if exam_applies {
                match s.exam_grade_raw {
                    Some(raw) => {
                        let blended = match regulation {
                            Some(reg) => {
                                cfd::check_exam_raw(raw)?;
                                let weight = reg.exam_weight(duration);
                                cfd::secundario_cfd(Decimal::from(cif_grade), raw, weight)
                            }
                            None => {
                                let pct = Decimal::from(raw);
                                cfd::check_exam_percentage(pct)?;
                                cfd::basico_cfd(cif_grade, pct)
                            }
                        };
                        out.cfd_raw = Some(blended.cfd_raw);
                        out.cfd_grade = Some(blended.cfd_grade);
                        out.exam_grade = Some(blended.exam_grade);
                        out.exam_weight = Some(blended.exam_weight);
                        out.status = SubjectStatus::Final;
                    }
                    None => {
                        out.status = SubjectStatus::AwaitingExam;
                    }
                }
            } else {
                out.cfd_raw = cif.cif_raw;
                out.cfd_grade = Some(cif_grade);
                out.status = SubjectStatus::Final;
            }
        }

        finals.push(out);
    }

    let cfd_rows: Vec<SubjectCfd> = finals
        .iter()
        .map(|f| SubjectCfd {
            subject: f.subject.clone(),
            cfd_grade: f.cfd_grade,
            duration_years: f.duration_years,
            affects_cfs: f.affects_cfs,
        })
        .collect();
    let cfs = compute_cfs(&cfd_rows, cohort_year);

    Ok(CfsDashboard {
        education_level: level,
        regulation,
        subjects: finals,
        cfs,
    })
}
