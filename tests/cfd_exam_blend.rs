use rust_decimal::Decimal;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::str::FromStr;

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_pautad");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn pautad");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().expect("result payload")
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .expect("error code")
}

fn dec_field(result: &serde_json::Value, key: &str) -> Decimal {
    let s = result
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("{} missing or not a string in {}", key, result));
    Decimal::from_str(s).unwrap_or_else(|_| panic!("{} not a decimal: {}", key, s))
}

#[test]
fn uniform_cohort_blends_at_a_quarter() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "graduationCohortYear": 2026 }),
    );
    assert_eq!(result.get("examGrade").and_then(|v| v.as_i64()), Some(16));
    assert_eq!(dec_field(&result, "cfdRaw"), Decimal::from_str("14.5").unwrap());
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(15));
    assert_eq!(dec_field(&result, "examWeight"), Decimal::from_str("0.25").unwrap());
    assert_eq!(
        result.get("regulation").and_then(|v| v.as_str()),
        Some("uniform_2023")
    );

    // A weak exam pulls the grade under the CIF.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 80, "graduationCohortYear": 2026 }),
    );
    assert_eq!(result.get("examGrade").and_then(|v| v.as_i64()), Some(8));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(13));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn pre_reform_cohort_weights_triennials_heavier() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "graduationCohortYear": 2022, "durationYears": 3 }),
    );
    assert_eq!(dec_field(&result, "examWeight"), Decimal::from_str("0.30").unwrap());
    assert_eq!(dec_field(&result, "cfdRaw"), Decimal::from_str("14.6").unwrap());
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(15));
    assert_eq!(
        result.get("regulation").and_then(|v| v.as_str()),
        Some("pre_reform")
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "graduationCohortYear": 2022, "durationYears": 2 }),
    );
    assert_eq!(dec_field(&result, "examWeight"), Decimal::from_str("0.25").unwrap());

    // The legacy rule keys on duration 2 alone; an annual subject blends at 30%.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "graduationCohortYear": 2022, "durationYears": 1 }),
    );
    assert_eq!(dec_field(&result, "examWeight"), Decimal::from_str("0.30").unwrap());
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(15));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn blend_uses_the_published_exam_grade_not_the_raw() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // 115/10 rounds to 12, 114/10 to 11; one raw point moves the CFD.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({ "cif": 10, "examGradeRaw": 115, "graduationCohortYear": 2026 }),
    );
    assert_eq!(result.get("examGrade").and_then(|v| v.as_i64()), Some(12));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(11));

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 10, "examGradeRaw": 114, "graduationCohortYear": 2026 }),
    );
    assert_eq!(result.get("examGrade").and_then(|v| v.as_i64()), Some(11));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(10));

    // Fractional CIF straight from the internal average.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subject.cfd",
        json!({ "cif": "13.5", "examGradeRaw": 120, "graduationCohortYear": 2026 }),
    );
    assert_eq!(dec_field(&result, "cfdRaw"), Decimal::from_str("13.125").unwrap());
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(13));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn explicit_weight_param_overrides_the_regulation() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "examWeight": "0.4" }),
    );
    assert_eq!(dec_field(&result, "cfdRaw"), Decimal::from_str("14.8").unwrap());
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(15));

    let value = request(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 160, "examWeight": 1 }),
    );
    assert_eq!(error_code(&value), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn out_of_range_inputs_are_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let value = request(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 250 }),
    );
    assert_eq!(error_code(&value), "exam_raw_out_of_range");

    let value = request(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": -5 }),
    );
    assert_eq!(error_code(&value), "exam_raw_out_of_range");

    let value = request(
        &mut stdin,
        &mut reader,
        "3",
        "subject.cfd",
        json!({ "cif": 25, "examGradeRaw": 100 }),
    );
    assert_eq!(error_code(&value), "bad_params");

    let value = request(
        &mut stdin,
        &mut reader,
        "4",
        "subject.cfd",
        json!({ "examGradeRaw": 100 }),
    );
    assert_eq!(error_code(&value), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn basico_blends_the_prova_final_level() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    // 15% is level 1: 3*0.7 + 1*0.3 = 2.4 -> 2.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.cfd",
        json!({
            "educationLevel": "basico_3_ciclo",
            "annualLevel": 3,
            "examPercentage": 15
        }),
    );
    assert_eq!(result.get("examLevel").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(2));

    // 55% is level 3, which keeps the annual level.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({
            "educationLevel": "basico_3_ciclo",
            "annualLevel": 3,
            "examPercentage": 55
        }),
    );
    assert_eq!(result.get("examLevel").and_then(|v| v.as_i64()), Some(3));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(3));

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subject.cfd",
        json!({
            "educationLevel": "basico_3_ciclo",
            "annualLevel": 5,
            "examPercentage": "91.5"
        }),
    );
    assert_eq!(result.get("examLevel").and_then(|v| v.as_i64()), Some(5));
    assert_eq!(result.get("cfdGrade").and_then(|v| v.as_i64()), Some(5));

    let value = request(
        &mut stdin,
        &mut reader,
        "4",
        "subject.cfd",
        json!({
            "educationLevel": "basico_3_ciclo",
            "annualLevel": 6,
            "examPercentage": 50
        }),
    );
    assert_eq!(error_code(&value), "grade_out_of_range");

    let value = request(
        &mut stdin,
        &mut reader,
        "5",
        "subject.cfd",
        json!({
            "educationLevel": "basico_3_ciclo",
            "annualLevel": 3,
            "examPercentage": 120
        }),
    );
    assert_eq!(error_code(&value), "bad_params");

    // 2.º ciclo has no national exam to blend.
    let value = request(
        &mut stdin,
        &mut reader,
        "6",
        "subject.cfd",
        json!({ "educationLevel": "basico_2_ciclo", "annualLevel": 4 }),
    );
    assert_eq!(error_code(&value), "bad_params");

    drop(stdin);
    let _ = child.wait();
}
