use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
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
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
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
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn list_ids(result: &serde_json::Value) -> Vec<String> {
    result
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.get("id").and_then(|v| v.as_str()).map(|s| s.to_string()))
        .collect()
}

#[test]
fn filter_by_search_and_form_preserves_registration_order() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let seed = [
        ("JO100", "Alice Banda", 2),
        ("S200", "Johnson Phiri", 2),
        ("S300", "Jolene Mwale", 3),
        ("S400", "Brian Tembo", 2),
        ("S500", "Majory Zulu", 2),
    ];
    for (i, (sid, name, form)) in seed.iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("seed-{i}"),
            "students.register",
            json!({
                "studentId": sid,
                "name": name,
                "gender": "M",
                "age": "14",
                "form": form
            }),
        );
    }

    let both = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.list",
        json!({ "search": "jo", "form": "2" }),
    );
    assert_eq!(list_ids(&both), vec!["JO100", "S200", "S500"]);
    assert_eq!(both.get("total").and_then(|v| v.as_u64()), Some(5));

    let search_only = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "search": "  JO ", "form": "" }),
    );
    assert_eq!(list_ids(&search_only), vec!["JO100", "S200", "S300", "S500"]);

    let form_only = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.list",
        json!({ "form": 3 }),
    );
    assert_eq!(list_ids(&form_only), vec!["S300"]);

    let none = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.list",
        json!({ "search": "xyz" }),
    );
    assert!(list_ids(&none).is_empty());
    assert_eq!(none.get("empty").and_then(|v| v.as_bool()), Some(true));

    let bad = request(
        &mut stdin,
        &mut reader,
        "5",
        "students.list",
        json!({ "form": 9 }),
    );
    assert_eq!(error_code(&bad), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn list_rows_carry_overall_average_display() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.register",
        json!({ "studentId": "R1", "name": "Rita", "gender": "F", "age": "13", "form": 1 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "performance.upsert",
        json!({
            "studentId": "R1",
            "form": "1",
            "subjects": { "math": 70, "english": 71, "science": 72, "social": 76 }
        }),
    );

    let list = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    let row = list
        .get("students")
        .and_then(|v| v.as_array())
        .and_then(|rows| rows.first())
        .cloned()
        .expect("row");
    assert_eq!(row.get("overallAverage").and_then(|v| v.as_f64()), Some(72.25));
    assert_eq!(row.get("averageDisplay").and_then(|v| v.as_str()), Some("72.3%"));
    assert_eq!(row.get("form").and_then(|v| v.as_i64()), Some(1));

    drop(stdin);
    let _ = child.wait();
}
