use std::cell::RefCell;
use std::rc::Rc;

use chrono::SecondsFormat;
use overlog_protocol::FormatTag;
use serde_json::Value;

use crate::CIRCULAR_MARKER;
use crate::value::LogValue;

/// Assigns a value exactly one format tag.
///
/// Total and deterministic over all inputs; the test order mirrors the
/// script-side type checks (primitives first, then object subtypes, with
/// generic structured data falling back to `Json`).
pub fn classify(value: &LogValue) -> FormatTag {
    match value {
        LogValue::Undefined => FormatTag::Undefined,
        LogValue::Null => FormatTag::Null,
        LogValue::Str(_) => FormatTag::String,
        LogValue::Bool(_) => FormatTag::Boolean,
        LogValue::Int(_) | LogValue::Float(_) | LogValue::BigInt(_) => FormatTag::Number,
        LogValue::Function(_) => FormatTag::Function,
        LogValue::Symbol(_) => FormatTag::String,
        LogValue::Error { .. } => FormatTag::Error,
        LogValue::Array(_) => FormatTag::Json,
        LogValue::Date(_) => FormatTag::Date,
        LogValue::Html(_) => FormatTag::Html,
        LogValue::Map(_) => FormatTag::Map,
        LogValue::Set(_) => FormatTag::Set,
        LogValue::Regex(_) => FormatTag::RegExp,
        LogValue::Object(_) => FormatTag::Json,
        LogValue::Shared(node) => classify_shared(node),
    }
}

/// Follows alias nodes to their target's tag.
///
/// A degenerate chain of alias nodes that loops back on itself (or a node
/// that is currently mutably borrowed) classifies as `Json`.
fn classify_shared(node: &Rc<RefCell<LogValue>>) -> FormatTag {
    let mut seen: Vec<*const RefCell<LogValue>> = Vec::new();
    let mut current = Rc::clone(node);
    loop {
        let ptr = Rc::as_ptr(&current);
        if seen.contains(&ptr) {
            return FormatTag::Json;
        }
        seen.push(ptr);

        let next = match current.try_borrow() {
            Ok(inner) => match &*inner {
                LogValue::Shared(next) => Rc::clone(next),
                other => return classify(other),
            },
            Err(_) => return FormatTag::Json,
        };
        current = next;
    }
}

/// Renders a value to its display string for the given tag.
///
/// Never fails: any internal error degrades to a placeholder naming the
/// value's primitive type.
pub fn serialize(value: &LogValue, format: FormatTag) -> String {
    match try_serialize(value, format) {
        Some(text) => text,
        None => format!("[Error serializing: {}]", value.type_name()),
    }
}

fn try_serialize(value: &LogValue, format: FormatTag) -> Option<String> {
    // Resolve alias nodes to their target for every tag except `Json`, whose
    // rendering tracks the nodes itself for cycle protection.
    if matches!(value, LogValue::Shared(_)) && format != FormatTag::Json {
        return serialize_aliased(value, format);
    }

    let text = match format {
        FormatTag::Undefined => "undefined".to_owned(),
        FormatTag::Null => "null".to_owned(),
        FormatTag::String => match value {
            LogValue::Str(s) | LogValue::Symbol(s) => s.clone(),
            other => reserialize(other)?,
        },
        FormatTag::Boolean => match value {
            LogValue::Bool(b) => b.to_string(),
            other => reserialize(other)?,
        },
        FormatTag::Number => match value {
            LogValue::Int(n) => n.to_string(),
            LogValue::Float(n) => float_to_string(*n),
            LogValue::BigInt(n) => n.to_string(),
            other => reserialize(other)?,
        },
        FormatTag::Function => match value {
            LogValue::Function(src) => src.clone(),
            other => reserialize(other)?,
        },
        FormatTag::Error => match value {
            LogValue::Error { message, stack } => stack
                .clone()
                .unwrap_or_else(|| format!("Error: {message}")),
            other => reserialize(other)?,
        },
        FormatTag::Date => match value {
            LogValue::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
            other => reserialize(other)?,
        },
        FormatTag::Html => match value {
            LogValue::Html(markup) => markup.clone(),
            other => reserialize(other)?,
        },
        FormatTag::RegExp => match value {
            LogValue::Regex(pattern) => pattern.clone(),
            other => reserialize(other)?,
        },
        FormatTag::Map => match value {
            LogValue::Map(entries) => {
                let mut seen = Vec::new();
                let items: Vec<Value> = entries
                    .iter()
                    .map(|(k, v)| {
                        Some(Value::Array(vec![
                            to_json(k, &mut seen)?,
                            to_json(v, &mut seen)?,
                        ]))
                    })
                    .collect::<Option<_>>()?;
                serde_json::to_string_pretty(&Value::Array(items)).ok()?
            }
            other => reserialize(other)?,
        },
        FormatTag::Set => match value {
            LogValue::Set(values) => {
                let mut seen = Vec::new();
                let items: Vec<Value> = values
                    .iter()
                    .map(|v| to_json(v, &mut seen))
                    .collect::<Option<_>>()?;
                serde_json::to_string_pretty(&Value::Array(items)).ok()?
            }
            other => reserialize(other)?,
        },
        FormatTag::Json => {
            let mut seen = Vec::new();
            let json = to_json(value, &mut seen)?;
            serde_json::to_string_pretty(&json).ok()?
        }
    };
    Some(text)
}

/// Re-renders a value whose tag does not match its shape, using its natural
/// tag instead. Callers passing tags produced by [`classify`] never hit this.
fn reserialize(value: &LogValue) -> Option<String> {
    try_serialize(value, classify(value))
}

/// Follows a chain of alias nodes and renders the target.
///
/// Fails on a chain that loops back on itself or a node that is currently
/// mutably borrowed.
fn serialize_aliased(value: &LogValue, format: FormatTag) -> Option<String> {
    let LogValue::Shared(node) = value else {
        return try_serialize(value, format);
    };

    let mut seen: Vec<*const RefCell<LogValue>> = Vec::new();
    let mut current = Rc::clone(node);
    loop {
        let ptr = Rc::as_ptr(&current);
        if seen.contains(&ptr) {
            return None;
        }
        seen.push(ptr);

        let next = {
            let inner = current.try_borrow().ok()?;
            match &*inner {
                LogValue::Shared(next) => Rc::clone(next),
                other => return try_serialize(other, format),
            }
        };
        current = next;
    }
}

/// JS-style float rendering: integral floats print without a fraction and
/// non-finite values print as `NaN` / `Infinity`.
fn float_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else {
        n.to_string()
    }
}

/// Converts a value to JSON for structured rendering.
///
/// `seen` holds every alias node already visited during this serialization
/// call; a repeat visit renders the circular marker instead of recursing.
/// Returns `None` when an alias node is currently mutably borrowed.
fn to_json(value: &LogValue, seen: &mut Vec<*const RefCell<LogValue>>) -> Option<Value> {
    let json = match value {
        LogValue::Undefined | LogValue::Null => Value::Null,
        LogValue::Bool(b) => Value::Bool(*b),
        LogValue::Int(n) => Value::Number((*n).into()),
        LogValue::Float(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        LogValue::BigInt(n) => Value::String(n.to_string()),
        LogValue::Str(s) | LogValue::Symbol(s) | LogValue::Html(s) => Value::String(s.clone()),
        LogValue::Function(src) => Value::String(src.clone()),
        LogValue::Error { message, .. } => Value::String(message.clone()),
        LogValue::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        LogValue::Regex(pattern) => Value::String(pattern.clone()),
        LogValue::Map(entries) => Value::Array(
            entries
                .iter()
                .map(|(k, v)| {
                    Some(Value::Array(vec![
                        to_json(k, seen)?,
                        to_json(v, seen)?,
                    ]))
                })
                .collect::<Option<_>>()?,
        ),
        LogValue::Set(values) | LogValue::Array(values) => Value::Array(
            values
                .iter()
                .map(|v| to_json(v, seen))
                .collect::<Option<_>>()?,
        ),
        LogValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| Some((k.clone(), to_json(v, seen)?)))
                .collect::<Option<_>>()?,
        ),
        LogValue::Shared(node) => {
            let ptr = Rc::as_ptr(node);
            if seen.contains(&ptr) {
                Value::String(CIRCULAR_MARKER.to_owned())
            } else {
                seen.push(ptr);
                let inner = node.try_borrow().ok()?;
                to_json(&inner, seen)?
            }
        }
    };
    Some(json)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn classify_primitives() {
        assert_eq!(classify(&LogValue::Undefined), FormatTag::Undefined);
        assert_eq!(classify(&LogValue::Null), FormatTag::Null);
        assert_eq!(classify(&LogValue::from("hi")), FormatTag::String);
        assert_eq!(classify(&LogValue::from(true)), FormatTag::Boolean);
        assert_eq!(classify(&LogValue::from(42)), FormatTag::Number);
        assert_eq!(classify(&LogValue::from(1.5)), FormatTag::Number);
        assert_eq!(classify(&LogValue::BigInt(1)), FormatTag::Number);
        assert_eq!(
            classify(&LogValue::Function("() => {}".into())),
            FormatTag::Function
        );
        assert_eq!(
            classify(&LogValue::Symbol("Symbol(id)".into())),
            FormatTag::String
        );
    }

    #[test]
    fn classify_object_subtypes() {
        assert_eq!(
            classify(&LogValue::Error {
                message: "boom".into(),
                stack: None
            }),
            FormatTag::Error
        );
        assert_eq!(classify(&LogValue::Array(vec![])), FormatTag::Json);
        assert_eq!(
            classify(&LogValue::Date(Utc::now())),
            FormatTag::Date
        );
        assert_eq!(classify(&LogValue::Html("<div/>".into())), FormatTag::Html);
        assert_eq!(classify(&LogValue::Map(vec![])), FormatTag::Map);
        assert_eq!(classify(&LogValue::Set(vec![])), FormatTag::Set);
        assert_eq!(
            classify(&LogValue::Regex("/\\d+/".into())),
            FormatTag::RegExp
        );
        assert_eq!(classify(&LogValue::Object(vec![])), FormatTag::Json);
    }

    #[test]
    fn classify_is_deterministic() {
        let value = LogValue::Object(vec![("k".into(), LogValue::from(1))]);
        assert_eq!(classify(&value), classify(&value));
    }

    #[test]
    fn classify_shared_follows_target() {
        let node = LogValue::shared(LogValue::from("aliased"));
        assert_eq!(classify(&LogValue::Shared(node)), FormatTag::String);
    }

    #[test]
    fn classify_self_aliasing_chain_falls_back_to_json() {
        let node = LogValue::shared(LogValue::Null);
        *node.borrow_mut() = LogValue::Shared(Rc::clone(&node));
        assert_eq!(classify(&LogValue::Shared(Rc::clone(&node))), FormatTag::Json);
    }

    #[test]
    fn serialize_primitives() {
        assert_eq!(
            serialize(&LogValue::Undefined, FormatTag::Undefined),
            "undefined"
        );
        assert_eq!(serialize(&LogValue::Null, FormatTag::Null), "null");
        assert_eq!(serialize(&LogValue::from("hi"), FormatTag::String), "hi");
        assert_eq!(serialize(&LogValue::from(true), FormatTag::Boolean), "true");
        assert_eq!(serialize(&LogValue::from(42), FormatTag::Number), "42");
        assert_eq!(serialize(&LogValue::from(1.5), FormatTag::Number), "1.5");
        assert_eq!(
            serialize(&LogValue::Float(f64::NAN), FormatTag::Number),
            "NaN"
        );
        assert_eq!(
            serialize(&LogValue::Float(f64::INFINITY), FormatTag::Number),
            "Infinity"
        );
    }

    #[test]
    fn serialize_error_prefers_stack() {
        let with_stack = LogValue::Error {
            message: "boom".into(),
            stack: Some("Error: boom\n    at main".into()),
        };
        assert_eq!(
            serialize(&with_stack, FormatTag::Error),
            "Error: boom\n    at main"
        );

        let without_stack = LogValue::Error {
            message: "boom".into(),
            stack: None,
        };
        assert_eq!(serialize(&without_stack, FormatTag::Error), "Error: boom");
    }

    #[test]
    fn serialize_date_iso8601_millis() {
        let date = Utc.with_ymd_and_hms(2026, 8, 23, 12, 30, 0).unwrap();
        assert_eq!(
            serialize(&LogValue::Date(date), FormatTag::Date),
            "2026-08-23T12:30:00.000Z"
        );
    }

    #[test]
    fn serialize_map_as_entry_pairs() {
        let map = LogValue::Map(vec![
            (LogValue::from("hp"), LogValue::from(100)),
            (LogValue::from("mp"), LogValue::from(50)),
        ]);
        let text = serialize(&map, FormatTag::Map);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!([["hp", 100], ["mp", 50]]));
        // Indented structured text, not a single line.
        assert!(text.contains('\n'));
    }

    #[test]
    fn serialize_set_as_value_list() {
        let set = LogValue::Set(vec![LogValue::from(1), LogValue::from(2)]);
        let text = serialize(&set, FormatTag::Set);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!([1, 2]));
    }

    #[test]
    fn serialize_json_object() {
        let value = LogValue::Object(vec![
            ("name".into(), LogValue::from("player")),
            ("hp".into(), LogValue::from(100)),
        ]);
        let text = serialize(&value, FormatTag::Json);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!({"name": "player", "hp": 100}));
    }

    #[test]
    fn serialize_cycle_renders_circular_marker_once_per_occurrence() {
        // root.self = root
        let root = LogValue::shared(LogValue::Object(vec![(
            "name".into(),
            LogValue::from("root"),
        )]));
        {
            let mut inner = root.borrow_mut();
            let LogValue::Object(fields) = &mut *inner else {
                unreachable!();
            };
            fields.push(("own".into(), LogValue::Shared(Rc::clone(&root))));
        }

        let value = LogValue::Shared(Rc::clone(&root));
        let text = serialize(&value, FormatTag::Json);
        assert_eq!(text.matches(CIRCULAR_MARKER).count(), 1);

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["own"], Value::String(CIRCULAR_MARKER.into()));
    }

    #[test]
    fn serialize_shared_dag_marks_repeat_reference() {
        // Two fields aliasing the same node: the second occurrence is marked.
        let shared = LogValue::shared(LogValue::from("payload"));
        let value = LogValue::Object(vec![
            ("a".into(), LogValue::Shared(Rc::clone(&shared))),
            ("b".into(), LogValue::Shared(Rc::clone(&shared))),
        ]);
        let text = serialize(&value, FormatTag::Json);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["a"], Value::String("payload".into()));
        assert_eq!(parsed["b"], Value::String(CIRCULAR_MARKER.into()));
    }

    #[test]
    fn serialize_seen_set_not_persisted_across_calls() {
        let shared = LogValue::shared(LogValue::from("payload"));
        let value = LogValue::Shared(Rc::clone(&shared));

        let first = serialize(&value, FormatTag::Json);
        let second = serialize(&value, FormatTag::Json);
        assert_eq!(first, second);
        assert!(!second.contains(CIRCULAR_MARKER));
    }

    #[test]
    fn serialize_borrowed_node_degrades_to_placeholder() {
        let node = LogValue::shared(LogValue::from(1));
        let value = LogValue::Array(vec![LogValue::Shared(Rc::clone(&node))]);

        let _guard = node.borrow_mut();
        assert_eq!(
            serialize(&value, FormatTag::Json),
            "[Error serializing: object]"
        );
    }

    #[test]
    fn serialize_alias_to_primitive_uses_target() {
        let node = LogValue::shared(LogValue::from("aliased"));
        let value = LogValue::Shared(Rc::clone(&node));
        assert_eq!(serialize(&value, classify(&value)), "aliased");
    }

    #[test]
    fn serialize_self_aliasing_chain_degrades_to_placeholder() {
        let node = LogValue::shared(LogValue::Null);
        *node.borrow_mut() = LogValue::Shared(Rc::clone(&node));
        let value = LogValue::Shared(Rc::clone(&node));
        assert_eq!(
            serialize(&value, FormatTag::String),
            "[Error serializing: object]"
        );
    }

    #[test]
    fn serialize_mismatched_tag_uses_natural_form() {
        // A tag that does not match the value's shape falls back to the
        // value's own rendering instead of failing.
        assert_eq!(serialize(&LogValue::from(42), FormatTag::String), "42");
        assert_eq!(serialize(&LogValue::from("x"), FormatTag::Number), "x");
    }
}
