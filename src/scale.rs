use serde::{Deserialize, Serialize};

use crate::calc::CalcError;

/// The four stages of the Portuguese school system that carry distinct
/// grading scales. Anything else is rejected at the boundary; handlers never
/// see an unknown level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "basico_1_ciclo")]
    Basico1Ciclo,
    #[serde(rename = "basico_2_ciclo")]
    Basico2Ciclo,
    #[serde(rename = "basico_3_ciclo")]
    Basico3Ciclo,
    #[serde(rename = "secundario")]
    Secundario,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Basico1Ciclo => "basico_1_ciclo",
            EducationLevel::Basico2Ciclo => "basico_2_ciclo",
            EducationLevel::Basico3Ciclo => "basico_3_ciclo",
            EducationLevel::Secundario => "secundario",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Numeric,
    Qualitative,
}

/// Qualitative labels for the 1.º ciclo, in ascending order. Grades on this
/// scale travel as 1-based indexes into this list.
pub const QUALITATIVE_LABELS: &[&str] = &["Insuficiente", "Suficiente", "Bom", "Muito Bom"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeScale {
    pub level: EducationLevel,
    pub kind: ScaleKind,
    pub min: i64,
    pub max: i64,
    pub passing: i64,
    pub labels: &'static [&'static str],
}

const SCALE_BASICO_1: GradeScale = GradeScale {
    level: EducationLevel::Basico1Ciclo,
    kind: ScaleKind::Qualitative,
    min: 1,
    max: 4,
    passing: 2,
    labels: QUALITATIVE_LABELS,
};

const SCALE_BASICO_2: GradeScale = GradeScale {
    level: EducationLevel::Basico2Ciclo,
    kind: ScaleKind::Numeric,
    min: 1,
    max: 5,
    passing: 3,
    labels: &[],
};

const SCALE_BASICO_3: GradeScale = GradeScale {
    level: EducationLevel::Basico3Ciclo,
    kind: ScaleKind::Numeric,
    min: 1,
    max: 5,
    passing: 3,
    labels: &[],
};

const SCALE_SECUNDARIO: GradeScale = GradeScale {
    level: EducationLevel::Secundario,
    kind: ScaleKind::Numeric,
    min: 0,
    max: 20,
    passing: 10,
    labels: &[],
};

pub fn scale_for(level: EducationLevel) -> &'static GradeScale {
    match level {
        EducationLevel::Basico1Ciclo => &SCALE_BASICO_1,
        EducationLevel::Basico2Ciclo => &SCALE_BASICO_2,
        EducationLevel::Basico3Ciclo => &SCALE_BASICO_3,
        EducationLevel::Secundario => &SCALE_SECUNDARIO,
    }
}

/// A grade that knows which shape of scale it came from, so label grades can
/// never be fed into numeric comparisons by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeValue {
    Numeric(i64),
    /// 1-based index into the qualitative label list.
    Qualitative(i64),
}

impl GradeScale {
    /// Admit a raw integer onto this scale, producing the right variant.
    pub fn value(&self, raw: i64) -> Result<GradeValue, CalcError> {
        if raw < self.min || raw > self.max {
            return Err(CalcError {
                code: "grade_out_of_range".to_string(),
                message: format!(
                    "grade {} outside {}..={} for level {}",
                    raw,
                    self.min,
                    self.max,
                    self.level.as_str()
                ),
                details: None,
            });
        }
        Ok(match self.kind {
            ScaleKind::Numeric => GradeValue::Numeric(raw),
            ScaleKind::Qualitative => GradeValue::Qualitative(raw),
        })
    }

    pub fn is_passing(&self, value: GradeValue) -> bool {
        match value {
            GradeValue::Numeric(g) | GradeValue::Qualitative(g) => g >= self.passing,
        }
    }

    /// Failing but within one point of passing. Only meaningful on numeric
    /// scales; a label is either passing or it is not.
    pub fn is_near_passing(&self, value: GradeValue) -> bool {
        match (self.kind, value) {
            (ScaleKind::Numeric, GradeValue::Numeric(g)) => {
                let diff = self.passing - g;
                diff > 0 && diff <= 1
            }
            _ => false,
        }
    }

    pub fn label_for(&self, value: GradeValue) -> Option<&'static str> {
        match value {
            GradeValue::Qualitative(idx) => {
                usize::try_from(idx - self.min).ok().and_then(|i| self.labels.get(i).copied())
            }
            GradeValue::Numeric(_) => None,
        }
    }

    pub fn index_for_label(&self, label: &str) -> Option<i64> {
        self.labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case(label))
            .map(|i| i as i64 + self.min)
    }
}
