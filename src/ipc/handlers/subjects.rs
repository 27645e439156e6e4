use rust_decimal::Decimal;
use serde_json::json;

use crate::cfd;
use crate::cif;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    calc_err, decimal_param, i32_param, i64_param, opt_typed_param, respond_ok, typed_param,
    u8_param, HandlerErr,
};
use crate::ipc::types::Request;
use crate::policy::SecundarioExamRegulation;
use crate::scale::{self, EducationLevel};
use crate::solver;

fn handle_cif(req: &Request) -> serde_json::Value {
    let annuals: Vec<Option<i64>> = match typed_param(&req.params, "annualGrades") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    for g in annuals.iter().flatten() {
        if let Err(e) = scale::scale_for(EducationLevel::Secundario).value(*g) {
            return calc_err(&req.id, e);
        }
    }
    respond_ok(&req.id, &cif::cif_from_annuals(&annuals))
}

/// Exam weight for one secundário subject: an explicit `examWeight` param
/// wins, otherwise the regulation for the cohort decides from the duration.
fn resolve_exam_weight(
    req: &Request,
) -> Result<(Decimal, SecundarioExamRegulation), HandlerErr> {
    let cohort = i32_param(&req.params, "graduationCohortYear")?;
    let regulation = SecundarioExamRegulation::for_cohort(cohort);
    let duration = u8_param(&req.params, "durationYears")?.unwrap_or(3);
    let weight = match decimal_param(&req.params, "examWeight")? {
        Some(w) => {
            if w < Decimal::ZERO || w >= Decimal::ONE {
                return Err(HandlerErr::bad_params(
                    "params.examWeight must be in [0, 1)",
                ));
            }
            w
        }
        None => regulation.exam_weight(duration),
    };
    Ok((weight, regulation))
}

fn check_cif_range(cif: Decimal) -> Result<(), HandlerErr> {
    if cif < Decimal::ZERO || cif > Decimal::from(20) {
        return Err(HandlerErr::bad_params("params.cif outside 0..=20"));
    }
    Ok(())
}

fn handle_cfd(req: &Request) -> serde_json::Value {
    let level: Option<EducationLevel> = match opt_typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };

    match level.unwrap_or(EducationLevel::Secundario) {
        EducationLevel::Secundario => {
            let cif = match decimal_param(&req.params, "cif") {
                Ok(Some(v)) => v,
                Ok(None) => {
                    return HandlerErr::bad_params("missing params.cif").response(&req.id)
                }
                Err(e) => return e.response(&req.id),
            };
            if let Err(e) = check_cif_range(cif) {
                return e.response(&req.id);
            }
            let Some(exam_raw) = i64_param(&req.params, "examGradeRaw") else {
                return HandlerErr::bad_params("missing params.examGradeRaw").response(&req.id);
            };
            if let Err(e) = cfd::check_exam_raw(exam_raw) {
                return calc_err(&req.id, e);
            }
            let (weight, regulation) = match resolve_exam_weight(req) {
                Ok(v) => v,
                Err(e) => return e.response(&req.id),
            };
            let out = cfd::secundario_cfd(cif, exam_raw, weight);
            ok(
                &req.id,
                json!({
                    "cfdRaw": out.cfd_raw,
                    "cfdGrade": out.cfd_grade,
                    "examGrade": out.exam_grade,
                    "examWeight": out.exam_weight,
                    "regulation": regulation,
                }),
            )
        }
        EducationLevel::Basico3Ciclo => {
            let Some(annual_level) = i64_param(&req.params, "annualLevel") else {
                return HandlerErr::bad_params("missing params.annualLevel").response(&req.id);
            };
            if let Err(e) = scale::scale_for(EducationLevel::Basico3Ciclo).value(annual_level) {
                return calc_err(&req.id, e);
            }
            let pct = match decimal_param(&req.params, "examPercentage") {
                Ok(Some(v)) => v,
                Ok(None) => {
                    return HandlerErr::bad_params("missing params.examPercentage")
                        .response(&req.id)
                }
                Err(e) => return e.response(&req.id),
            };
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return HandlerErr::bad_params("params.examPercentage outside 0..=100")
                    .response(&req.id);
            }
            let out = cfd::basico_cfd(annual_level, pct);
            ok(
                &req.id,
                json!({
                    "cfdRaw": out.cfd_raw,
                    "cfdGrade": out.cfd_grade,
                    "examLevel": out.exam_grade,
                    "examWeight": out.exam_weight,
                }),
            )
        }
        other => HandlerErr {
            code: "bad_params",
            message: format!("level {} has no exam-blended final grade", other.as_str()),
            details: None,
        }
        .response(&req.id),
    }
}

fn handle_safe_minimum(req: &Request) -> serde_json::Value {
    let cif = match decimal_param(&req.params, "cif") {
        Ok(Some(v)) => v,
        Ok(None) => return HandlerErr::bad_params("missing params.cif").response(&req.id),
        Err(e) => return e.response(&req.id),
    };
    if let Err(e) = check_cif_range(cif) {
        return e.response(&req.id);
    }
    let (weight, regulation) = match resolve_exam_weight(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let out = solver::safe_minimum_exam(cif, weight);
    ok(
        &req.id,
        json!({
            "safeMinimum": out,
            "examWeight": weight,
            "regulation": regulation,
        }),
    )
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subject.cif" => Some(handle_cif(req)),
        "subject.cfd" => Some(handle_cfd(req)),
        "subject.safeMinimum" => Some(handle_safe_minimum(req)),
        _ => None,
    }
}
