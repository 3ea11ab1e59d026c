use crate::calc;
use crate::ipc::error::{ok, roster_err};
use crate::ipc::helpers::{req_form, req_str, req_subjects};
use crate::ipc::types::{AppState, Request};
use crate::roster::{normalize_id, RosterError, Upsert};
use serde_json::json;

fn handle_performance_upsert(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = &req.params;
    let parsed = req_str(p, "studentId").and_then(|id| {
        let form = req_form(p, "form")?;
        let subjects = req_subjects(p)?;
        Ok((id, form, subjects))
    });
    let (id, form, subjects) = match parsed {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };

    match state.roster.upsert_performance(id, form, subjects) {
        Ok((student, outcome)) => {
            let record_avg = student.record_for(form).map(calc::record_average);
            let overall = calc::overall_average(student);
            tracing::info!(
                student_id = %student.id,
                form = form.get(),
                created = outcome == Upsert::Created,
                "performance recorded"
            );
            ok(
                &req.id,
                json!({
                    "studentId": student.id,
                    "form": form,
                    "created": outcome == Upsert::Created,
                    "recordAverage": record_avg,
                    "overallAverage": overall,
                    "averageDisplay": calc::average_display(overall),
                }),
            )
        }
        Err(e) => {
            tracing::debug!(error = %e, "performance upsert rejected");
            roster_err(&req.id, &e)
        }
    }
}

fn handle_calc_record_average(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = &req.params;
    let parsed = req_str(p, "studentId").and_then(|id| Ok((id, req_form(p, "form")?)));
    let (id, form) = match parsed {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    let Some(student) = state.roster.find(id) else {
        return roster_err(&req.id, &RosterError::StudentNotFound(normalize_id(id)));
    };
    let avg = student.record_for(form).map(calc::record_average);
    ok(
        &req.id,
        json!({
            "studentId": student.id,
            "form": form,
            "average": avg,
            "display": calc::average_display(avg),
        }),
    )
}

fn handle_calc_overall_average(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match req_str(&req.params, "studentId") {
        Ok(v) => v,
        Err(e) => return roster_err(&req.id, &e),
    };
    let Some(student) = state.roster.find(id) else {
        return roster_err(&req.id, &RosterError::StudentNotFound(normalize_id(id)));
    };
    let avg = calc::overall_average(student);
    ok(
        &req.id,
        json!({
            "studentId": student.id,
            "average": avg,
            "display": calc::average_display(avg),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "performance.upsert" => Some(handle_performance_upsert(state, req)),
        "calc.recordAverage" => Some(handle_calc_record_average(state, req)),
        "calc.overallAverage" => Some(handle_calc_overall_average(state, req)),
        _ => None,
    }
}
