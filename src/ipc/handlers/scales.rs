use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{calc_err, i64_param, opt_typed_param, typed_param, HandlerErr};
use crate::ipc::types::Request;
use crate::scale::{self, EducationLevel};

fn handle_get(req: &Request) -> serde_json::Value {
    let level: Option<EducationLevel> = match opt_typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match level {
        Some(level) => ok(&req.id, json!({ "scale": scale::scale_for(level) })),
        None => {
            let all = [
                scale::scale_for(EducationLevel::Basico1Ciclo),
                scale::scale_for(EducationLevel::Basico2Ciclo),
                scale::scale_for(EducationLevel::Basico3Ciclo),
                scale::scale_for(EducationLevel::Secundario),
            ];
            ok(&req.id, json!({ "scales": all }))
        }
    }
}

fn handle_status(req: &Request) -> serde_json::Value {
    let level: EducationLevel = match typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(grade) = i64_param(&req.params, "grade") else {
        return HandlerErr::bad_params("missing params.grade").response(&req.id);
    };

    let s = scale::scale_for(level);
    let value = match s.value(grade) {
        Ok(v) => v,
        Err(e) => return calc_err(&req.id, e),
    };

    ok(
        &req.id,
        json!({
            "grade": grade,
            "isPassing": s.is_passing(value),
            "isNearPassing": s.is_near_passing(value),
            "label": s.label_for(value),
            "passingThreshold": s.passing,
        }),
    )
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "scales.get" => Some(handle_get(req)),
        "scales.status" => Some(handle_status(req)),
        _ => None,
    }
}
