use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Canonical form: RFC 3339, UTC, millisecond precision, `Z` suffix.
pub fn format(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now() -> String {
    format(Utc::now())
}

/// Rewrite the `timestamp` field of a stored document into its string form.
///
/// Strings pass through untouched. Epoch milliseconds and extended-JSON
/// `{"$date": ...}` values are formatted canonically. Anything else falls
/// back to the current time instead of failing the read.
pub fn normalize_document(doc: &mut Value) {
    let Some(obj) = doc.as_object_mut() else {
        return;
    };
    let normalized = normalize(obj.get("timestamp"));
    obj.insert("timestamp".to_string(), Value::String(normalized));
}

pub fn normalize(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => canonical(other).unwrap_or_else(now),
        None => now(),
    }
}

fn canonical(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(format)
        }
        Value::Object(map) => match map.get("$date") {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| format(dt.with_timezone(&Utc))),
            Some(inner) => canonical(inner),
            None => map
                .get("$numberLong")?
                .as_str()?
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .map(format),
        },
        _ => None,
    }
}
