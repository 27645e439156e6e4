use crate::cfs::{self, SubjectCfd, SubjectHistory};
use crate::ipc::helpers::{
    calc_err, i32_param, i64_param, opt_typed_param, respond_ok, str_param, typed_param,
    HandlerErr,
};
use crate::ipc::types::Request;
use crate::scale::{self, EducationLevel};

fn cohort_param(req: &Request) -> Result<Option<i32>, HandlerErr> {
    i32_param(&req.params, "graduationCohortYear")
}

fn handle_compute(req: &Request) -> serde_json::Value {
    let subjects: Vec<SubjectCfd> = match typed_param(&req.params, "subjects") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let cohort = match cohort_param(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    respond_ok(&req.id, &cfs::compute_cfs(&subjects, cohort))
}

fn handle_simulate(req: &Request) -> serde_json::Value {
    let subjects: Vec<SubjectCfd> = match typed_param(&req.params, "subjects") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let cohort = match cohort_param(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(subject) = str_param(&req.params, "subject") else {
        return HandlerErr::bad_params("missing params.subject").response(&req.id);
    };
    let Some(cfd_grade) = i64_param(&req.params, "cfdGrade") else {
        return HandlerErr::bad_params("missing params.cfdGrade").response(&req.id);
    };
    if let Err(e) = scale::scale_for(EducationLevel::Secundario).value(cfd_grade) {
        return calc_err(&req.id, e);
    }

    match cfs::simulate_cfs(&subjects, cohort, subject, cfd_grade) {
        Ok(out) => respond_ok(&req.id, &out),
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_dashboard(req: &Request) -> serde_json::Value {
    let subjects: Vec<SubjectHistory> = match typed_param(&req.params, "subjects") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let cohort = match cohort_param(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let level: Option<EducationLevel> = match opt_typed_param(&req.params, "educationLevel") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match cfs::build_dashboard(&subjects, cohort, level.unwrap_or(EducationLevel::Secundario)) {
        Ok(out) => respond_ok(&req.id, &out),
        Err(e) => calc_err(&req.id, e),
    }
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "cfs.compute" => Some(handle_compute(req)),
        "cfs.simulate" => Some(handle_simulate(req)),
        "cfs.dashboard" => Some(handle_dashboard(req)),
        _ => None,
    }
}
