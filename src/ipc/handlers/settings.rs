use chrono::NaiveDate;
use serde_json::json;

use crate::calendar::{self, AcademicYear};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{str_param, typed_param, u8_param, HandlerErr};
use crate::ipc::types::Request;
use crate::settings::{validate_settings, GradeSettings};

fn handle_validate(req: &Request) -> serde_json::Value {
    let settings: GradeSettings = match typed_param(&req.params, "settings") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let problems = validate_settings(&settings);
    ok(
        &req.id,
        json!({
            "valid": problems.is_empty(),
            "problems": problems,
        }),
    )
}

/// Resolve a school year (and optionally the graduation cohort) from either
/// an explicit "2025-2026" label or a calendar date.
fn handle_calendar_resolve(req: &Request) -> serde_json::Value {
    let year = if let Some(label) = str_param(&req.params, "academicYear") {
        match AcademicYear::parse(label) {
            Ok(y) => y,
            Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
        }
    } else if let Some(date_str) = str_param(&req.params, "date") {
        match date_str.parse::<NaiveDate>() {
            Ok(d) => AcademicYear::for_date(d),
            Err(e) => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("params.date: {}", e),
                    None,
                )
            }
        }
    } else {
        return HandlerErr::bad_params("missing params.academicYear or params.date")
            .response(&req.id);
    };

    let grade_level = match u8_param(&req.params, "gradeLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let cohort = match grade_level {
        Some(g) => match calendar::graduation_cohort_year(year, g) {
            Ok(c) => Some(c),
            Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
        },
        None => None,
    };

    ok(
        &req.id,
        json!({
            "academicYear": year.label(),
            "startYear": year.start_year,
            "endYear": year.end_year(),
            "graduationCohortYear": cohort,
        }),
    )
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "settings.validate" => Some(handle_validate(req)),
        "calendar.resolve" => Some(handle_calendar_resolve(req)),
        _ => None,
    }
}
