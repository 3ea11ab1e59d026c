use crate::calc;
use crate::ipc::error::{ok, roster_err};
use crate::ipc::helpers::req_str;
use crate::ipc::types::{AppState, Request};
use crate::roster::{normalize_id, RosterError};
use serde_json::json;

/// Profile card plus one row per performance record, in recorded order.
fn handle_student_profile(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match req_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    let Some(student) = state.roster.find(id) else {
        return roster_err(&req.id, &RosterError::StudentNotFound(normalize_id(id)));
    };

    let records: Vec<serde_json::Value> = student
        .performance
        .iter()
        .map(|p| {
            let avg = calc::record_average(p);
            json!({
                "form": p.form,
                "math": p.subjects.math,
                "english": p.subjects.english,
                "science": p.subjects.science,
                "social": p.subjects.social,
                "average": avg,
                "averageDisplay": calc::average_display(Some(avg)),
            })
        })
        .collect();
    let overall = calc::overall_average(student);

    ok(
        &req.id,
        json!({
            "studentId": student.id,
            "name": student.name,
            "gender": student.gender,
            "age": student.age,
            "form": student.form,
            "records": records,
            "hasRecords": !student.performance.is_empty(),
            "overallAverage": overall,
            "averageDisplay": calc::average_display(overall),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.studentProfile" => Some(handle_student_profile(state, req)),
        _ => None,
    }
}
