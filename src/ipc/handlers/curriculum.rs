use serde_json::json;

use crate::curriculum::{self, CourseKey, LanguageKey};
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    bool_param, calc_err, opt_typed_param, respond_ok, typed_param, u8_param, HandlerErr,
};
use crate::ipc::types::Request;

fn subject_entry(slug: &str) -> serde_json::Value {
    json!({
        "slug": slug,
        "name": curriculum::display_name(slug),
        "durationYears": curriculum::subject_duration_years(slug),
    })
}

fn handle_courses(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "courses": curriculum::all_courses(),
            "anualSecondaryPool": curriculum::ANUAL_SECONDARY_POOL,
            "languages": ["ingles", "frances", "alemao", "espanhol"],
        }),
    )
}

fn course_grade_language(
    req: &Request,
) -> Result<(CourseKey, u8, LanguageKey), HandlerErr> {
    let course: CourseKey = typed_param(&req.params, "course")?;
    let grade = u8_param(&req.params, "gradeLevel")?
        .ok_or_else(|| HandlerErr::bad_params("missing params.gradeLevel"))?;
    let language: LanguageKey = typed_param(&req.params, "language")?;
    Ok((course, grade, language))
}

fn handle_auto_slugs(req: &Request) -> serde_json::Value {
    let (course, grade, language) = match course_grade_language(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match curriculum::auto_slugs(course, grade, language) {
        Ok(slugs) => {
            let subjects: Vec<serde_json::Value> =
                slugs.iter().map(|s| subject_entry(s)).collect();
            ok(&req.id, json!({ "slugs": slugs, "subjects": subjects }))
        }
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_resolve(req: &Request) -> serde_json::Value {
    let (course, grade, language) = match course_grade_language(req) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let bienais: Vec<String> = match opt_typed_param(&req.params, "bienais") {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e.response(&req.id),
    };
    let anuais: Vec<String> = match opt_typed_param(&req.params, "anuais") {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => return e.response(&req.id),
    };
    let include_emrc = bool_param(&req.params, "includeEmrc").unwrap_or(false);

    match curriculum::resolve_selected_slugs(course, grade, language, &bienais, &anuais, include_emrc)
    {
        Ok(resolved) => {
            let subjects: Vec<serde_json::Value> =
                resolved.slugs.iter().map(|s| subject_entry(s)).collect();
            ok(
                &req.id,
                json!({
                    "slugs": resolved.slugs,
                    "ignored": resolved.ignored,
                    "subjects": subjects,
                }),
            )
        }
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_validate_anuais(req: &Request) -> serde_json::Value {
    let course: CourseKey = match typed_param(&req.params, "course") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let choices: Vec<String> = match typed_param(&req.params, "choices") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    respond_ok(&req.id, &curriculum::validate_anuais_selection(course, &choices))
}

fn handle_validate_bienais(req: &Request) -> serde_json::Value {
    let course: CourseKey = match typed_param(&req.params, "course") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let choices: Vec<String> = match typed_param(&req.params, "choices") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    respond_ok(&req.id, &curriculum::validate_bienais_selection(course, &choices))
}

pub fn try_handle(req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "curriculum.courses" => Some(handle_courses(req)),
        "curriculum.autoSlugs" => Some(handle_auto_slugs(req)),
        "curriculum.resolve" => Some(handle_resolve(req)),
        "curriculum.validateAnuais" => Some(handle_validate_anuais(req)),
        "curriculum.validateBienais" => Some(handle_validate_bienais(req)),
        _ => None,
    }
}
