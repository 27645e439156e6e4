use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::round_half_up;
use crate::cfd::{convert_exam_grade, secundario_cfd};

pub const EXAM_RAW_MIN: i64 = 0;
pub const EXAM_RAW_MAX: i64 = 200;

/// Smallest raw exam score in 0..=200 whose blended final grade reaches
/// `target`. `blend` must be non-decreasing in the raw score, which holds
/// for any fixed-weight average of a non-decreasing conversion; the search
/// is a lower-bound binary search over the 201 raw values. None when even a
/// perfect exam falls short.
pub fn minimum_raw_for_target<F>(blend: F, target: i64) -> Option<i64>
where
    F: Fn(i64) -> i64,
{
    if blend(EXAM_RAW_MAX) < target {
        return None;
    }
    let mut lo = EXAM_RAW_MIN;
    let mut hi = EXAM_RAW_MAX;
    while lo < hi {
        let mid = (lo + hi) / 2;
        if blend(mid) >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeMinimum {
    /// Raw score to aim for; the scale maximum when the target is out of
    /// reach.
    pub exam_raw: i64,
    /// The same score on the published 0..=20 scale.
    pub exam_grade: i64,
    pub target_grade: i64,
    pub resulting_cfd: i64,
    pub achievable: bool,
}

/// "What is the lowest exam score that keeps my final grade at my CIF?"
/// Runs the real CFD calculator inside the search, so the answer can never
/// drift from what the calculator would later publish.
pub fn safe_minimum_exam(cif: Decimal, exam_weight: Decimal) -> SafeMinimum {
    let target = round_half_up(cif);
    let blend = |raw: i64| secundario_cfd(cif, raw, exam_weight).cfd_grade;
    match minimum_raw_for_target(blend, target) {
        Some(raw) => SafeMinimum {
            exam_raw: raw,
            exam_grade: convert_exam_grade(raw),
            target_grade: target,
            resulting_cfd: blend(raw),
            achievable: true,
        },
        None => SafeMinimum {
            exam_raw: EXAM_RAW_MAX,
            exam_grade: convert_exam_grade(EXAM_RAW_MAX),
            target_grade: target,
            resulting_cfd: blend(EXAM_RAW_MAX),
            achievable: false,
        },
    }
}
