use crate::roster::{Form, RosterError, Subjects};

pub type ParamResult<T> = Result<T, RosterError>;

pub fn req_str<'a>(params: &'a serde_json::Value, key: &'static str) -> ParamResult<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or(RosterError::MissingField(key))
}

/// Strings pass through; numbers are rendered as text (e.g. `age: 15`).
pub fn req_text(params: &serde_json::Value, key: &'static str) -> ParamResult<String> {
    match params.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(RosterError::MissingField(key)),
    }
}

/// Accepts a JSON integer or a numeric string such as `"2"`.
fn as_int(v: &serde_json::Value) -> Option<i64> {
    match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn req_form(params: &serde_json::Value, key: &'static str) -> ParamResult<Form> {
    let raw = params.get(key).ok_or(RosterError::MissingField(key))?;
    let v = as_int(raw).ok_or(RosterError::MissingField(key))?;
    Form::new(v)
}

/// Missing, null, empty string and "ALL" all mean "no form filter".
pub fn opt_form_filter(params: &serde_json::Value, key: &'static str) -> ParamResult<Option<Form>> {
    let Some(raw) = params.get(key) else {
        return Ok(None);
    };
    match raw {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s)
            if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") =>
        {
            Ok(None)
        }
        other => {
            let v = as_int(other).ok_or(RosterError::MissingField(key))?;
            Form::new(v).map(Some)
        }
    }
}

pub fn req_subjects(params: &serde_json::Value) -> ParamResult<Subjects> {
    let raw = params
        .get("subjects")
        .filter(|v| v.is_object())
        .ok_or(RosterError::MissingField("subjects"))?;
    let score = |key: &'static str| -> ParamResult<i64> {
        raw.get(key)
            .and_then(as_int)
            .ok_or(RosterError::MissingField(key))
    };
    Subjects::new(
        score("math")?,
        score("english")?,
        score("science")?,
        score("social")?,
    )
}
