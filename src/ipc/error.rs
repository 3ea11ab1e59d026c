use serde_json::json;

use crate::roster::RosterError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn roster_err(id: &str, e: &RosterError) -> serde_json::Value {
    let details = match e {
        RosterError::DuplicateId(sid)
        | RosterError::StudentNotFound(sid)
        | RosterError::AlreadyAtMaxForm(sid) => Some(json!({ "studentId": sid })),
        RosterError::InvalidForm(v) => Some(json!({ "form": v })),
        RosterError::InvalidScore { subject, value } => {
            Some(json!({ "subject": subject, "value": value }))
        }
        RosterError::MissingField(_) => None,
    };
    err(id, e.code(), e.to_string(), details)
}
