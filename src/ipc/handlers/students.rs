use crate::calc;
use crate::ipc::error::{ok, roster_err};
use crate::ipc::helpers::{opt_form_filter, req_form, req_str, req_text};
use crate::ipc::types::{AppState, Request};
use crate::roster::{normalize_id, Form, NewStudent, RosterError, Student};
use serde_json::json;

fn student_json(student: &Student) -> serde_json::Value {
    let avg = calc::overall_average(student);
    json!({
        "id": student.id,
        "name": student.name,
        "gender": student.gender,
        "age": student.age,
        "form": student.form,
        "performance": student.performance,
        "overallAverage": avg,
        "averageDisplay": calc::average_display(avg),
    })
}

fn roster_row(student: &Student) -> serde_json::Value {
    let avg = calc::overall_average(student);
    json!({
        "id": student.id,
        "name": student.name,
        "form": student.form,
        "overallAverage": avg,
        "averageDisplay": calc::average_display(avg),
    })
}

type RegisterParams<'a> = (&'a str, &'a str, &'a str, String, Form);

fn parse_register(p: &serde_json::Value) -> Result<RegisterParams<'_>, RosterError> {
    Ok((
        req_str(p, "studentId")?,
        req_str(p, "name")?,
        req_str(p, "gender")?,
        req_text(p, "age")?,
        req_form(p, "form")?,
    ))
}

fn handle_students_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, name, gender, age, form) = match parse_register(&req.params) {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };

    match state.roster.register(NewStudent {
        id,
        name,
        gender,
        age: &age,
        form,
    }) {
        Ok(student) => {
            tracing::info!(student_id = %student.id, form = student.form.get(), "student registered");
            ok(&req.id, json!({ "student": student_json(student) }))
        }
        Err(e) => {
            tracing::debug!(error = %e, "register rejected");
            roster_err(&req.id, &e)
        }
    }
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match req_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    match state.roster.find(id) {
        Some(student) => ok(&req.id, json!({ "student": student_json(student) })),
        None => roster_err(
            &req.id,
            &RosterError::StudentNotFound(normalize_id(id)),
        ),
    }
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let search = req
        .params
        .get("search")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let form = match opt_form_filter(&req.params, "form") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };

    let rows: Vec<serde_json::Value> = state
        .roster
        .filter(search, form)
        .into_iter()
        .map(roster_row)
        .collect();
    ok(
        &req.id,
        json!({
            "empty": rows.is_empty(),
            "total": state.roster.len(),
            "students": rows,
        }),
    )
}

fn handle_students_promote(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match req_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    match state.roster.promote(id) {
        Ok(student) => {
            tracing::info!(student_id = %student.id, form = student.form.get(), "student promoted");
            ok(&req.id, json!({ "student": student_json(student) }))
        }
        Err(e) => {
            tracing::debug!(error = %e, "promote rejected");
            roster_err(&req.id, &e)
        }
    }
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match req_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    let deleted = state.roster.delete(id);
    let student_id = normalize_id(id);
    if deleted {
        tracing::info!(student_id = %student_id, "student deleted");
    }
    ok(
        &req.id,
        json!({ "studentId": student_id, "deleted": deleted }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.register" => Some(handle_students_register(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.list" => Some(handle_students_list(state, req)),
        "students.promote" => Some(handle_students_promote(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        _ => None,
    }
}
