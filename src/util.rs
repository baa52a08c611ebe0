//! Helpers shared by request builders and response parsers.

use serde_json::Value;

/// Read a Solr named list.
///
/// Named lists arrive either as JSON objects (`{"a": 1}`) or, with
/// `json.nl=flat`, as flat arrays of alternating names and values
/// (`["a", 1]`). `null` names become empty strings.
pub(crate) fn named_list(value: &Value) -> Option<Vec<(String, &Value)>> {
    match value {
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Value::Array(items) => Some(
            items
                .chunks(2)
                .filter(|pair| pair.len() == 2)
                .map(|pair| (value_to_string(&pair[0]), &pair[1]))
                .collect(),
        ),
        _ => None,
    }
}

/// Read a named list of counts, skipping entries whose value is not a count.
pub(crate) fn count_list(value: &Value) -> Option<Vec<(String, u64)>> {
    let entries = named_list(value)?;
    Some(
        entries
            .into_iter()
            .filter_map(|(name, count)| as_u64(count).map(|count| (name, count)))
            .collect(),
    )
}

pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Render a scalar JSON value as text. `null` renders as an empty string.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format Solr local parameters, e.g. `{!key=cat ex=a,b}`.
///
/// Entries with empty values are skipped; no entries yields an empty string.
pub(crate) fn local_params(entries: &[(&str, String)]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name}={}", quote_local_value(value)))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{!{}}}", parts.join(" "))
    }
}

fn quote_local_value(value: &str) -> String {
    if value.contains([' ', '}', '\'']) {
        format!("'{}'", value.replace('\'', "\\'"))
    } else {
        value.to_string()
    }
}
