use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

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

fn safe_minimum(result: &serde_json::Value) -> &serde_json::Value {
    result.get("safeMinimum").expect("safeMinimum payload")
}

#[test]
fn threshold_for_an_average_cif() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.safeMinimum",
        json!({ "cif": 14, "graduationCohortYear": 2026 }),
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("achievable").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(min.get("targetGrade").and_then(|v| v.as_i64()), Some(14));
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(115));
    assert_eq!(min.get("examGrade").and_then(|v| v.as_i64()), Some(12));
    assert_eq!(min.get("resultingCfd").and_then(|v| v.as_i64()), Some(14));

    // One raw point less and the CFD drops below the CIF.
    let below = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 14, "examGradeRaw": 114, "graduationCohortYear": 2026 }),
    );
    assert_eq!(below.get("cfdGrade").and_then(|v| v.as_i64()), Some(13));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn heavier_exam_weight_raises_the_bar() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.safeMinimum",
        json!({ "cif": 14, "graduationCohortYear": 2022, "durationYears": 3 }),
    );
    assert_eq!(
        result.get("regulation").and_then(|v| v.as_str()),
        Some("pre_reform")
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(125));
    assert_eq!(min.get("examGrade").and_then(|v| v.as_i64()), Some(13));
    assert_eq!(min.get("resultingCfd").and_then(|v| v.as_i64()), Some(14));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn fractional_cif_targets_its_rounded_grade() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.safeMinimum",
        json!({ "cif": "11.5", "graduationCohortYear": 2026 }),
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("targetGrade").and_then(|v| v.as_i64()), Some(12));
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(115));
    assert_eq!(min.get("examGrade").and_then(|v| v.as_i64()), Some(12));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn edge_cifs_stay_achievable() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.safeMinimum",
        json!({ "cif": 0, "graduationCohortYear": 2026 }),
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(0));
    assert_eq!(min.get("achievable").and_then(|v| v.as_bool()), Some(true));

    // A perfect CIF only needs 17.5 rounded: 20*0.75 + 18*0.25 = 19.5.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.safeMinimum",
        json!({ "cif": 20, "graduationCohortYear": 2026 }),
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(175));
    assert_eq!(min.get("examGrade").and_then(|v| v.as_i64()), Some(18));
    assert_eq!(min.get("resultingCfd").and_then(|v| v.as_i64()), Some(20));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn explicit_weight_is_respected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subject.safeMinimum",
        json!({ "cif": 18, "examWeight": "0.25" }),
    );
    let min = safe_minimum(&result);
    assert_eq!(min.get("examRaw").and_then(|v| v.as_i64()), Some(155));
    assert_eq!(min.get("examGrade").and_then(|v| v.as_i64()), Some(16));
    assert_eq!(min.get("resultingCfd").and_then(|v| v.as_i64()), Some(18));

    // Cross-check both sides of the boundary through the calculator.
    let at = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subject.cfd",
        json!({ "cif": 18, "examGradeRaw": 155, "examWeight": "0.25" }),
    );
    assert_eq!(at.get("cfdGrade").and_then(|v| v.as_i64()), Some(18));
    let below = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subject.cfd",
        json!({ "cif": 18, "examGradeRaw": 154, "examWeight": "0.25" }),
    );
    assert_eq!(below.get("cfdGrade").and_then(|v| v.as_i64()), Some(17));

    drop(stdin);
    let _ = child.wait();
}
