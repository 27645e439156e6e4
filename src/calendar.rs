use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A Portuguese school year, named by its civil years: "2025-2026" runs
/// from September 2025 through August 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub start_year: i32,
}

impl AcademicYear {
    pub fn parse(label: &str) -> anyhow::Result<Self> {
        let Some((a, b)) = label.split_once('-') else {
            bail!("academic year must look like 2025-2026, got {:?}", label);
        };
        let start: i32 = match a.trim().parse() {
            Ok(v) => v,
            Err(_) => bail!("bad start year in {:?}", label),
        };
        let end: i32 = match b.trim().parse() {
            Ok(v) => v,
            Err(_) => bail!("bad end year in {:?}", label),
        };
        if end != start + 1 {
            bail!("academic year {:?} does not span consecutive years", label);
        }
        Ok(AcademicYear { start_year: start })
    }

    /// The school year a calendar date falls in, with the September 1 cutoff.
    pub fn for_date(date: NaiveDate) -> Self {
        let start = if date.month() >= 9 {
            date.year()
        } else {
            date.year() - 1
        };
        AcademicYear { start_year: start }
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year())
    }
}

/// The civil year in which this student's 12.º ano ends, given the year
/// they are currently in. This is the cohort key the regulation tables use.
pub fn graduation_cohort_year(year: AcademicYear, grade_level: u8) -> anyhow::Result<i32> {
    if !(1..=12).contains(&grade_level) {
        bail!("grade level {} outside 1..=12", grade_level);
    }
    Ok(year.end_year() + (12 - i32::from(grade_level)))
}
