use serde_json::json;

use crate::annual;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    calc_err, i64_param, opt_typed_param, respond_ok, str_param, typed_param, HandlerErr,
};
use crate::ipc::types::Request;
use crate::period::{self, EvaluationElement, PeriodRecord};
use crate::scale::{self, EducationLevel, ScaleKind};

fn handle_evaluate(req: &Request) -> serde_json::Value {
    let elements: Vec<EvaluationElement> = match typed_param(&req.params, "elements") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    respond_ok(&req.id, &period::evaluate_elements(&elements))
}

fn handle_recalculate(req: &Request) -> serde_json::Value {
    let record: PeriodRecord = match typed_param(&req.params, "period") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let refreshed = period::recalculate(&record);
    let computation = period::evaluate_elements(&refreshed.elements);
    ok(
        &req.id,
        json!({
            "period": refreshed,
            "computation": computation,
        }),
    )
}

/// Validated pauta entry: numeric levels take a grade on their scale,
/// the 1.º ciclo takes one of its labels (stored in canonical casing).
fn handle_enter_pauta(req: &Request) -> serde_json::Value {
    let record: PeriodRecord = match typed_param(&req.params, "period") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let level: EducationLevel = match typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let s = scale::scale_for(level);

    let grade = i64_param(&req.params, "grade");
    let label = str_param(&req.params, "qualitativeGrade");

    let (grade, qualitative) = match (s.kind, grade, label) {
        (ScaleKind::Numeric, Some(g), None) => {
            if let Err(e) = s.value(g) {
                return calc_err(&req.id, e);
            }
            (Some(g), None)
        }
        (ScaleKind::Numeric, _, Some(_)) => {
            return HandlerErr::bad_params("numeric levels take params.grade, not a label")
                .response(&req.id);
        }
        (ScaleKind::Qualitative, None, Some(l)) => {
            let Some(idx) = s.index_for_label(l) else {
                return HandlerErr {
                    code: "bad_params",
                    message: format!("unknown qualitative label {:?}", l),
                    details: Some(json!({ "labels": s.labels })),
                }
                .response(&req.id);
            };
            let canonical = s.labels[(idx - s.min) as usize].to_string();
            (None, Some(canonical))
        }
        (ScaleKind::Qualitative, Some(_), _) => {
            return HandlerErr::bad_params(
                "1.º ciclo takes params.qualitativeGrade, not a numeric grade",
            )
            .response(&req.id);
        }
        (_, None, None) => {
            return HandlerErr::bad_params("missing params.grade or params.qualitativeGrade")
                .response(&req.id);
        }
    };

    match period::enter_pauta(&record, grade, qualitative) {
        Ok(p) => ok(&req.id, json!({ "period": p })),
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_override(req: &Request) -> serde_json::Value {
    let record: PeriodRecord = match typed_param(&req.params, "period") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let level: EducationLevel = match typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(grade) = i64_param(&req.params, "grade") else {
        return HandlerErr::bad_params("missing params.grade").response(&req.id);
    };
    let reason = str_param(&req.params, "reason").unwrap_or_default();

    if let Err(e) = scale::scale_for(level).value(grade) {
        return calc_err(&req.id, e);
    }
    match period::apply_override(&record, grade, reason) {
        Ok(p) => ok(&req.id, json!({ "period": p })),
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_clear_override(req: &Request) -> serde_json::Value {
    let record: PeriodRecord = match typed_param(&req.params, "period") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match period::clear_override(&record) {
        Ok(p) => ok(&req.id, json!({ "period": p })),
        Err(e) => calc_err(&req.id, e),
    }
}

/// Annual average over period pautas. Callers either pass the pauta list
/// straight (past years land this way) or the period records, which are
/// recalculated and slotted by period number first.
fn handle_annual(req: &Request) -> serde_json::Value {
    let weights: Vec<rust_decimal::Decimal> = match typed_param(&req.params, "periodWeights") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };

    let pautas: Option<Vec<Option<i64>>> = match opt_typed_param(&req.params, "pautas") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let pautas = match pautas {
        Some(p) => p,
        None => {
            let periods: Vec<PeriodRecord> = match typed_param(&req.params, "periods") {
                Ok(v) => v,
                Err(_) => {
                    return HandlerErr::bad_params("missing params.pautas or params.periods")
                        .response(&req.id)
                }
            };
            let mut slots: Vec<Option<i64>> = vec![None; weights.len()];
            for p in &periods {
                let refreshed = period::recalculate(p);
                let n = usize::from(refreshed.period_number);
                if (1..=slots.len()).contains(&n) {
                    slots[n - 1] = refreshed.pauta_grade;
                }
            }
            slots
        }
    };

    match annual::annual_from_periods(&pautas, &weights) {
        Ok(out) => respond_ok(&req.id, &out),
        Err(e) => calc_err(&req.id, e),
    }
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "period.evaluate" => Some(handle_evaluate(req)),
        "period.recalculate" => Some(handle_recalculate(req)),
        "period.enterPauta" => Some(handle_enter_pauta(req)),
        "period.override" => Some(handle_override(req)),
        "period.clearOverride" => Some(handle_clear_override(req)),
        "annual.compute" => Some(handle_annual(req)),
        _ => None,
    }
}
