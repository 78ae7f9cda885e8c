//! Error envelope returned by the rental API (RFC 7807 Problem Details, ASP.NET flavour).

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// RFC 7807 Problem Details as produced by the backend.
///
/// Validation failures carry an `errors` object keyed by field name, each
/// holding one or more messages. Other failures usually set `message`,
/// `title` or `detail`. Every field is optional because the backend is not
/// consistent about which ones it fills in, and a field of an unexpected
/// type reads as absent instead of failing the whole body.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_type: Option<String>,

    /// A short, human-readable summary of the problem type.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The HTTP status code.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// A human-readable explanation specific to this occurrence.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Application-level message, sent by controllers that bypass ProblemDetails.
    #[serde(
        default,
        alias = "Message",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,

    /// Field-level validation messages.
    #[serde(
        default,
        deserialize_with = "field_errors",
        skip_serializing_if = "Option::is_none"
    )]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ProblemDetails {
    /// Validation messages, one line per field: `Field: first, second`.
    ///
    /// Returns `None` when the body carried no usable field map.
    pub fn validation_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|e| !e.is_empty())?;

        let lines: Vec<String> = errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();

        Some(lines.join("\n"))
    }
}

/// `Some` when the value has the expected type, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Accepts `{field: [msg, ...]}` and `{field: msg}`; anything else becomes `None`.
fn field_errors<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let Some(Value::Object(map)) = value else {
        return Ok(None);
    };

    let mut errors = BTreeMap::new();
    for (field, messages) in map {
        let messages = match messages {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Value::String(s) => vec![s],
            Value::Null => continue,
            other => vec![other.to_string()],
        };
        errors.insert(field, messages);
    }

    Ok(Some(errors))
}
