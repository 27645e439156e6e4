use crate::board::{self, SubjectPeriods};
use crate::ipc::helpers::{calc_err, respond_ok, typed_param};
use crate::ipc::types::Request;
use crate::settings::GradeSettings;

fn handle_summary(req: &Request) -> serde_json::Value {
    let settings: GradeSettings = match typed_param(&req.params, "settings") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let subjects: Vec<SubjectPeriods> = match typed_param(&req.params, "subjects") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match board::build_board(&settings, &subjects) {
        Ok(model) => respond_ok(&req.id, &model),
        Err(e) => calc_err(&req.id, e),
    }
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "board.summary" => Some(handle_summary(req)),
        _ => None,
    }
}
