use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annual::annual_from_periods;
use crate::calc::CalcError;
use crate::period::{self, PeriodRecord};
use crate::scale::{self, GradeValue, ScaleKind};
use crate::settings::{validate_settings, GradeSettings, SettingsProblem};

/// One enrolled subject with its period records, as the caller stores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPeriods {
    pub subject: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub periods: Vec<PeriodRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBoardEntry {
    pub period_number: u8,
    pub raw_calculated: Option<Decimal>,
    pub calculated_grade: Option<i64>,
    pub pauta_grade: Option<i64>,
    pub qualitative_grade: Option<String>,
    pub is_overridden: bool,
    pub is_projection: bool,
    pub is_complete: bool,
    pub weight_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectBoard {
    pub subject: String,
    pub name: Option<String>,
    pub periods: Vec<PeriodBoardEntry>,
    pub raw_annual: Option<Decimal>,
    pub annual_grade: Option<i64>,
    pub annual_complete: bool,
    /// Grade the pass flags were judged on: the annual when complete,
    /// otherwise the latest period standing.
    pub standing_grade: Option<i64>,
    pub standing_label: Option<String>,
    pub is_passing: Option<bool>,
    pub is_near_passing: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTotals {
    pub subjects: usize,
    pub with_annual: usize,
    pub passing: usize,
    pub near_passing: usize,
    pub awaiting: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardModel {
    pub settings_problems: Vec<SettingsProblem>,
    pub subjects: Vec<SubjectBoard>,
    pub totals: BoardTotals,
}

fn standing_of(scale: &scale::GradeScale, subject: &SubjectBoard) -> Option<GradeValue> {
    match scale.kind {
        ScaleKind::Numeric => {
            let grade = if subject.annual_complete {
                subject.annual_grade
            } else {
                subject
                    .periods
                    .iter()
                    .rev()
                    .find_map(|p| p.pauta_grade)
            }?;
            scale.value(grade).ok()
        }
        ScaleKind::Qualitative => {
            let label = subject
                .periods
                .iter()
                .rev()
                .find_map(|p| p.qualitative_grade.clone())?;
            let idx = scale.index_for_label(&label)?;
            scale.value(idx).ok()
        }
    }
}

/// The year-at-a-glance view: every subject's periods recalculated, the
/// annual where it already exists, and pass flags against the settings'
/// scale. Settings problems are echoed instead of blocking the render; a
/// subject whose weights cannot support an annual simply stays "awaiting".
pub fn build_board(
    settings: &GradeSettings,
    subjects: &[SubjectPeriods],
) -> Result<BoardModel, CalcError> {
    let settings_problems = validate_settings(settings);
    let scale = scale::scale_for(settings.education_level);
    let period_count = settings.regime.period_count();
    let weights_usable = settings.period_weights.len() == period_count;

    let mut out_subjects = Vec::with_capacity(subjects.len());
    let mut totals = BoardTotals {
        subjects: subjects.len(),
        with_annual: 0,
        passing: 0,
        near_passing: 0,
        awaiting: 0,
    };

    for s in subjects {
        let mut recalced: Vec<PeriodRecord> = s.periods.iter().map(period::recalculate).collect();
        recalced.sort_by_key(|p| p.period_number);

        let mut pautas: Vec<Option<i64>> = vec![None; period_count];
        for p in &recalced {
            let n = usize::from(p.period_number);
            if (1..=period_count).contains(&n) {
                pautas[n - 1] = p.pauta_grade;
            }
        }

        let (raw_annual, annual_grade, annual_complete) =
            if weights_usable && scale.kind == ScaleKind::Numeric {
                let annual = annual_from_periods(&pautas, &settings.period_weights)?;
                (annual.raw_annual, annual.annual_grade, annual.is_complete)
            } else {
                (None, None, false)
            };

        let periods: Vec<PeriodBoardEntry> = recalced
            .iter()
            .map(|p| {
                let comp = period::evaluate_elements(&p.elements);
                PeriodBoardEntry {
                    period_number: p.period_number,
                    raw_calculated: p.raw_calculated,
                    calculated_grade: p.calculated_grade,
                    pauta_grade: p.pauta_grade,
                    qualitative_grade: p.qualitative_grade.clone(),
                    is_overridden: p.is_overridden,
                    is_projection: comp.is_projection,
                    is_complete: comp.is_complete,
                    weight_total: comp.weight_total,
                }
            })
            .collect();

        let mut subject = SubjectBoard {
            subject: s.subject.clone(),
            name: s.name.clone(),
            periods,
            raw_annual,
            annual_grade,
            annual_complete,
            standing_grade: None,
            standing_label: None,
            is_passing: None,
            is_near_passing: None,
        };

        match standing_of(scale, &subject) {
            Some(value) => {
                match value {
                    GradeValue::Numeric(g) => subject.standing_grade = Some(g),
                    GradeValue::Qualitative(idx) => {
                        subject.standing_grade = Some(idx);
                        subject.standing_label = scale.label_for(value).map(str::to_string);
                    }
                }
                let passing = scale.is_passing(value);
                let near = scale.is_near_passing(value);
                subject.is_passing = Some(passing);
                subject.is_near_passing = Some(near);
                if passing {
                    totals.passing += 1;
                } else if near {
                    totals.near_passing += 1;
                }
            }
            None => totals.awaiting += 1,
        }
        if subject.annual_complete {
            totals.with_annual += 1;
        }

        out_subjects.push(subject);
    }

    Ok(BoardModel {
        settings_problems,
        subjects: out_subjects,
        totals,
    })
}
