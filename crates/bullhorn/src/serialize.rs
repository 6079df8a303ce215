//! Renders error values as JSON text for structured log sinks.

use backtrace::Backtrace;
use serde::Serialize;
use serde_json::{json, Value};
use tracing_core::Level;

/// Serializes an error value to JSON text.
///
/// `None` yields `None` — the absent marker, never the string `"null"`.
/// The JSON object always carries the error's short type name under
/// `name` and its `Display` rendering under `message`; the `source()`
/// chain is included under `chain` when the error has one. A captured
/// stack is included under `stack` only at the highest verbosity, so
/// internals do not leak into logs in normal operation.
pub fn serialize_error<E>(error: Option<&E>, verbosity: Level) -> Option<String>
where
    E: std::error::Error,
{
    let error = error?;
    let mut fields = serde_json::Map::new();
    fields.insert(
        "name".to_string(),
        Value::String(short_type_name::<E>().to_string()),
    );
    fields.insert("message".to_string(), Value::String(error.to_string()));
    let chain = source_chain(error);
    if !chain.is_empty() {
        fields.insert("chain".to_string(), json!(chain));
    }
    if verbosity == Level::TRACE {
        fields.insert(
            "stack".to_string(),
            Value::String(format!("{:?}", Backtrace::new())),
        );
    }
    Some(Value::Object(fields).to_string())
}

/// Serializes a non-error value to JSON text, unchanged.
///
/// Only `None` input yields `None`; a value whose `Serialize` impl fails
/// yields a JSON object describing the failure instead, so a rendering
/// failure is never mistaken for absent input.
pub fn serialize_value<T: Serialize>(value: Option<&T>) -> Option<String> {
    let value = value?;
    let rendered = match serde_json::to_value(value) {
        Ok(rendered) => rendered,
        Err(error) => json!({
            "name": "SerializationFailure",
            "message": error.to_string(),
        }),
    };
    Some(rendered.to_string())
}

fn source_chain(error: &dyn std::error::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use std::io;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tracing_core::Level;

    use super::{serialize_error, serialize_value};

    #[derive(Debug, thiserror::Error)]
    #[error("could not fetch media metadata")]
    struct FetchError {
        #[source]
        source: io::Error,
    }

    #[test]
    fn absent_input_yields_the_absent_marker() {
        let serialized = serialize_error::<io::Error>(None, Level::INFO);
        assert_eq!(serialized, None);
    }

    #[test]
    fn it_includes_name_and_message() {
        let error = io::Error::other("x");
        let serialized = serialize_error(Some(&error), Level::INFO).unwrap();
        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed["name"], json!("Error"));
        assert_eq!(parsed["message"], json!("x"));
    }

    #[test]
    fn it_omits_the_stack_below_the_highest_level() {
        let error = io::Error::other("x");
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG] {
            let serialized = serialize_error(Some(&error), level).unwrap();
            let parsed: Value = serde_json::from_str(&serialized).unwrap();
            assert!(parsed.get("stack").is_none());
        }
    }

    #[test]
    fn it_captures_a_stack_at_the_highest_level() {
        let error = io::Error::other("x");
        let serialized = serialize_error(Some(&error), Level::TRACE).unwrap();
        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert!(parsed["stack"].as_str().is_some());
    }

    #[test]
    fn it_includes_the_source_chain() {
        let error = FetchError {
            source: io::Error::other("connection reset"),
        };
        let serialized = serialize_error(Some(&error), Level::INFO).unwrap();
        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed["name"], json!("FetchError"));
        assert_eq!(parsed["chain"], json!(["connection reset"]));
    }

    #[test]
    fn non_error_values_pass_through_unchanged() {
        let value = json!({ "mediaId": "m-1", "durationMs": 42 });
        let serialized = serialize_value(Some(&value)).unwrap();
        let reparsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn absent_values_yield_the_absent_marker() {
        let serialized = serialize_value::<Value>(None);
        assert_eq!(serialized, None);
    }

    #[test]
    fn a_rendering_failure_is_not_the_absent_marker() {
        struct Unrenderable;

        impl serde::Serialize for Unrenderable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cannot render"))
            }
        }

        let serialized = serialize_value(Some(&Unrenderable)).unwrap();
        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed["name"], json!("SerializationFailure"));
        assert_eq!(parsed["message"], json!("cannot render"));
    }
}
